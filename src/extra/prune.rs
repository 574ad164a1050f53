//! Dead-code elimination.

use tracing::debug;

use crate::graph::{SynthGraph, UGenIn};

/// Remove nodes whose outputs nobody reads and that have no side effect. Returns the
/// number of removed nodes.
///
/// Kept nodes keep their relative order and references are renumbered.
///
/// ```
/// # use ugengraph::{config::GraphConfig, graph::{GE, SynthGraph}, extra::{builtin::{Out, SinOsc}, prune::prune}};
/// let unused: GE = SinOsc::ar().freq(1).into();
/// let out: GE = Out::ar().input(SinOsc::ar()).into();
/// let mut graph = SynthGraph::build(GraphConfig::default(), &[unused, out]).unwrap();
/// assert_eq!(prune(&mut graph), 1);
/// assert_eq!(graph.len(), 2);
/// ```
pub fn prune(graph: &mut SynthGraph) -> usize {
    let nodes = &graph.nodes;
    let mut live = vec![false; nodes.len()];
    //Inputs only point backwards, so one reverse sweep is enough
    for i in (0..nodes.len()).rev() {
        if nodes[i].flags.side_effect {
            live[i] = true;
        }
        if live[i] {
            for input in &nodes[i].inputs {
                if let UGenIn::Output(r) = input {
                    live[r.node] = true;
                }
            }
        }
    }

    let mut renumber = vec![usize::MAX; nodes.len()];
    let mut next = 0;
    for (i, &alive) in live.iter().enumerate() {
        if alive {
            renumber[i] = next;
            next += 1;
        }
    }

    let before = graph.nodes.len();
    let mut index = 0;
    graph.nodes.retain(|_| {
        let keep = live[index];
        index += 1;
        keep
    });
    for node in &mut graph.nodes {
        for input in &mut node.inputs {
            if let UGenIn::Output(r) = input {
                r.node = renumber[r.node];
            }
        }
    }
    let removed = before - graph.nodes.len();
    debug!(removed = removed, kept = graph.nodes.len(), "pruned graph");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GraphConfig,
        extra::builtin::{Line, Out, Poll, SinOsc, WhiteNoise},
        graph::{UGenOutRef, GE},
        types::Rate,
    };

    #[test]
    fn references_are_renumbered() {
        let dead: GE = WhiteNoise::ar().into();
        let osc = SinOsc::ar().freq(Line::kr().start(100).end(200));
        let mut graph =
            SynthGraph::build(GraphConfig::default(), &[dead, Out::ar().input(osc).into()]).unwrap();
        assert_eq!(graph.len(), 4);
        assert_eq!(prune(&mut graph), 1);
        let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Line", "SinOsc", "Out"]);
        assert_eq!(
            graph.nodes()[1].inputs[0],
            UGenIn::Output(UGenOutRef {
                node: 0,
                index: 0,
                rate: Rate::Control
            })
        );
    }

    #[test]
    fn side_effects_survive_without_readers() {
        let mut graph =
            SynthGraph::build(GraphConfig::default(), &[Poll::kr().input(SinOsc::kr()).into()]).unwrap();
        assert_eq!(prune(&mut graph), 0);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn pruning_on_finish() {
        let conf = GraphConfig {
            prune_unused: true,
            ..GraphConfig::default()
        };
        let graph = SynthGraph::build(conf, &[SinOsc::ar().into()]).unwrap();
        assert!(graph.is_empty());
    }
}
