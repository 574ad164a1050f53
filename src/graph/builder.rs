//! The node list of one graph construction pass.

use std::{collections::HashMap, rc::Rc};

use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::trace;

use super::{GraphError, UGenIn, UGenOutRef, GE};
use crate::{config::GraphConfig, types::Rate, ugen::Flags, ugen::UGenSource};

/// One emitted UGen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UGenNode {
    /// Server-side name of the UGen.
    pub name: String,

    /// Calculation rate.
    pub rate: Rate,

    /// Operator selector for operator UGens, zero otherwise.
    pub special_index: i16,

    /// Flat scalar inputs. Output references only point at earlier nodes.
    pub inputs: Vec<UGenIn>,

    /// Rate of every output visible to consumers.
    pub outputs: Vec<Rate>,

    /// Side effect, done flag and individuality.
    pub flags: Flags,
}

impl UGenNode {
    /// Index of the extra done-flag output, if the node has one.
    ///
    /// The done output sits right after the ordinary outputs and is not counted in
    /// `outputs`.
    pub fn done_output(&self) -> Option<usize> {
        self.flags.done_flag.then_some(self.outputs.len())
    }
}

/// Structural identity of a node, used for sharing.
#[derive(PartialEq, Eq, Hash)]
struct NodeKey {
    name: String,
    rate: Rate,
    special_index: i16,
    inputs: Vec<KeyIn>,
    outputs: Vec<Rate>,
}

#[derive(PartialEq, Eq, Hash)]
enum KeyIn {
    Constant(OrderedFloat<f32>),
    Output(usize, usize),
}

impl NodeKey {
    fn new(node: &UGenNode) -> Self {
        NodeKey {
            name: node.name.clone(),
            rate: node.rate,
            special_index: node.special_index,
            inputs: node
                .inputs
                .iter()
                .map(|i| match i {
                    UGenIn::Constant(c) => KeyIn::Constant(OrderedFloat(*c)),
                    UGenIn::Output(r) => KeyIn::Output(r.node, r.index),
                })
                .collect(),
            outputs: node.outputs.clone(),
        }
    }
}

/// Builder context of one graph construction pass.
///
/// Owns the append-only node list. Every pass starts with an empty list; nothing is
/// shared between builders.
pub struct SynthGraphBuilder {
    config: GraphConfig,
    nodes: Vec<UGenNode>,
    common: HashMap<NodeKey, usize>,
    //Keyed by Rc address; the Rc is kept so the address stays unique
    visited: HashMap<usize, (Rc<UGenSource>, GE)>,
}

impl SynthGraphBuilder {
    /// Create a builder with an empty node list.
    pub fn new(config: GraphConfig) -> Self {
        SynthGraphBuilder {
            config,
            nodes: Vec::new(),
            common: HashMap::new(),
            visited: HashMap::new(),
        }
    }

    /// Options of this pass.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Nodes emitted so far.
    pub fn nodes(&self) -> &[UGenNode] {
        &self.nodes
    }

    /// Expand a graph element, see [`GE::expand()`].
    pub fn expand(&mut self, ge: &GE) -> Result<GE, GraphError> {
        ge.expand(self)
    }

    /// Expand a source once per pass. Later visits of the same `Rc` get the outputs of
    /// the first expansion.
    pub(crate) fn visit(&mut self, src: &Rc<UGenSource>) -> Result<GE, GraphError> {
        let key = Rc::as_ptr(src) as usize;
        if let Some((_, ge)) = self.visited.get(&key) {
            return Ok(ge.clone());
        }
        let ge = src.expand(self)?;
        self.visited.insert(key, (src.clone(), ge.clone()));
        Ok(ge)
    }

    /// Append a node and return one reference per output.
    ///
    /// Nothing about the inputs is validated here. When sharing is enabled and the node
    /// is neither individual nor side-effecting, a structurally identical earlier node is
    /// reused instead.
    pub fn emit(&mut self, node: UGenNode) -> Vec<UGenOutRef> {
        let shareable =
            self.config.share_common && !node.flags.individual && !node.flags.side_effect;
        if shareable {
            let key = NodeKey::new(&node);
            if let Some(&index) = self.common.get(&key) {
                trace!(ugen = %node.name, index = index, "sharing identical node");
                return Self::refs(index, &self.nodes[index]);
            }
            self.common.insert(key, self.nodes.len());
        }
        let index = self.nodes.len();
        trace!(ugen = %node.name, index = index, rate = %node.rate, inputs = node.inputs.len(), "emit");
        let refs = Self::refs(index, &node);
        self.nodes.push(node);
        refs
    }

    fn refs(index: usize, node: &UGenNode) -> Vec<UGenOutRef> {
        node.outputs
            .iter()
            .enumerate()
            .map(|(i, &rate)| UGenOutRef {
                node: index,
                index: i,
                rate,
            })
            .collect()
    }

    /// Reference to the done-flag output of a node.
    pub fn done_ref(&self, node: usize) -> Option<UGenOutRef> {
        let done = self.nodes.get(node)?.done_output()?;
        Some(UGenOutRef {
            node,
            index: done,
            rate: Rate::Control,
        })
    }

    /// End the pass and return the graph.
    pub fn finish(self) -> SynthGraph {
        #[allow(unused_mut)]
        let mut graph = SynthGraph { nodes: self.nodes };
        #[cfg(feature = "extra")]
        if self.config.prune_unused {
            crate::extra::prune::prune(&mut graph);
        }
        graph
    }
}

/// Flat, ordered list of emitted nodes.
///
/// A node only references outputs of nodes before it, so the list order is a
/// topological order of the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SynthGraph {
    pub(crate) nodes: Vec<UGenNode>,
}

impl SynthGraph {
    /// Expand `roots` in order in a fresh builder.
    ///
    /// ```
    /// # use ugengraph::{config::GraphConfig, graph::SynthGraph, extra::builtin::{Out, SinOsc}};
    /// let graph = SynthGraph::build(
    ///     GraphConfig::default(),
    ///     &[Out::ar().bus(0).input(SinOsc::ar().freq(440)).into()],
    /// )
    /// .unwrap();
    /// let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
    /// assert_eq!(names, ["SinOsc", "Out"]);
    /// ```
    pub fn build(config: GraphConfig, roots: &[GE]) -> Result<SynthGraph, GraphError> {
        let mut builder = SynthGraphBuilder::new(config);
        for root in roots {
            builder.expand(root)?;
        }
        Ok(builder.finish())
    }

    /// Nodes in emission order.
    pub fn nodes(&self) -> &[UGenNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, inputs: Vec<UGenIn>, flags: Flags) -> UGenNode {
        UGenNode {
            name: name.to_owned(),
            rate: Rate::Audio,
            special_index: 0,
            inputs,
            outputs: vec![Rate::Audio],
            flags,
        }
    }

    #[test]
    fn emission_is_append_only() {
        let mut b = SynthGraphBuilder::new(GraphConfig::default());
        let a = b.emit(node("SinOsc", vec![UGenIn::Constant(440.0)], Flags::NONE));
        let c = b.emit(node("SinOsc", vec![UGenIn::Constant(220.0)], Flags::NONE));
        assert_eq!(a[0].node, 0);
        assert_eq!(c[0].node, 1);
        assert_eq!(b.nodes().len(), 2);
    }

    #[test]
    fn identical_nodes_are_shared() {
        let mut b = SynthGraphBuilder::new(GraphConfig::default());
        let a = b.emit(node("SinOsc", vec![UGenIn::Constant(440.0)], Flags::NONE));
        let c = b.emit(node("SinOsc", vec![UGenIn::Constant(440.0)], Flags::NONE));
        assert_eq!(a, c);
        assert_eq!(b.finish().len(), 1);
    }

    #[test]
    fn sharing_can_be_disabled() {
        let conf = GraphConfig {
            share_common: false,
            ..GraphConfig::default()
        };
        let mut b = SynthGraphBuilder::new(conf);
        b.emit(node("SinOsc", vec![UGenIn::Constant(440.0)], Flags::NONE));
        b.emit(node("SinOsc", vec![UGenIn::Constant(440.0)], Flags::NONE));
        assert_eq!(b.finish().len(), 2);
    }

    #[test]
    fn individual_and_side_effect_nodes_are_never_shared() {
        let mut b = SynthGraphBuilder::new(GraphConfig::default());
        let individual = Flags {
            individual: true,
            ..Flags::NONE
        };
        let side_effect = Flags {
            side_effect: true,
            ..Flags::NONE
        };
        let a = b.emit(node("WhiteNoise", vec![], individual));
        let c = b.emit(node("WhiteNoise", vec![], individual));
        assert_ne!(a[0].node, c[0].node);
        let d = b.emit(node("Out", vec![UGenIn::Constant(0.0)], side_effect));
        let e = b.emit(node("Out", vec![UGenIn::Constant(0.0)], side_effect));
        assert_ne!(d[0].node, e[0].node);
        assert_eq!(b.finish().len(), 4);
    }

    #[test]
    fn done_output_follows_ordinary_outputs() {
        let mut b = SynthGraphBuilder::new(GraphConfig::default());
        let flags = Flags {
            done_flag: true,
            ..Flags::NONE
        };
        let mut n = node("PlayBuf", vec![UGenIn::Constant(0.0)], flags);
        n.outputs = vec![Rate::Audio, Rate::Audio];
        let refs = b.emit(n);
        //Consumers only see the two ordinary outputs
        assert_eq!(refs.len(), 2);
        let done = b.done_ref(0).unwrap();
        assert_eq!(done.index, 2);
        assert_eq!(done.rate, Rate::Control);
        assert!(b.done_ref(1).is_none());
    }

    #[test]
    fn no_done_ref_without_flag() {
        let mut b = SynthGraphBuilder::new(GraphConfig::default());
        b.emit(node("SinOsc", vec![], Flags::NONE));
        assert!(b.done_ref(0).is_none());
    }
}
