//! Building blocks for unit generator graphs.
//!
//! A synth is written as a tree of graph elements ([`graph::GE`]): constants, UGen
//! instances and groups of channels. Building a graph expands that tree depth first into
//! a flat, ordered list of nodes with single-channel inputs and consistent rates, ready
//! to be sent to a synthesis server.
//!
//! ```
//! use ugengraph::{config::GraphConfig, graph::{GE, SynthGraph}, extra::builtin::{Out, Pan2, SinOsc}};
//!
//! let tone: GE = SinOsc::ar().freq(GE::seq([440.0, 442.0])).into();
//! let graph = SynthGraph::build(
//!     GraphConfig::default(),
//!     &[Out::ar().input(Pan2::ar().input(tone * 0.1)).into()],
//! )
//! .unwrap();
//! //Two oscillators, two multiplications, two panners and two stereo outputs
//! assert_eq!(graph.len(), 8);
//! assert_eq!(graph.nodes()[7].inputs.len(), 3);
//! ```
#![warn(missing_docs)]

pub mod config;
pub mod extra;
pub mod graph;
pub mod serial;
pub mod types;
pub mod ugen;
