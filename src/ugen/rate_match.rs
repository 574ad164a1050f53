//! Rate promotion of flat argument vectors.
//!
//! Some UGens only accept audio-rate signals at certain inputs when they run at audio
//! rate. Matching wraps a slower input in a conversion UGen so the input reaches the
//! required rate. Inputs are never brought down to a slower rate: an input that is
//! already faster, or that runs on demand, is passed through unchanged (or rejected
//! with strict rate checking).

use tracing::{debug, warn};

use super::{conv, RateMatch, UGenDef};
use crate::{
    graph::{GraphError, SynthGraphBuilder, UGenIn, UGenNode},
    types::Rate,
};

/// Bring the input at `pos` to the `required` rate.
///
/// Constants count as scalar rate. A position past the end is ignored.
///
/// ```
/// # use ugengraph::{config::GraphConfig, graph::{SynthGraphBuilder, UGenIn}, types::Rate, ugen::rate_match::match_rate};
/// let mut builder = SynthGraphBuilder::new(GraphConfig::default());
/// let args = match_rate(&mut builder, vec![UGenIn::Constant(1.0)], 0, Rate::Audio).unwrap();
/// assert_eq!(args[0].rate(), Rate::Audio);
/// assert_eq!(builder.nodes()[0].name, "K2A");
/// ```
pub fn match_rate(
    builder: &mut SynthGraphBuilder,
    mut args: Vec<UGenIn>,
    pos: usize,
    required: Rate,
) -> Result<Vec<UGenIn>, GraphError> {
    if let Some(input) = args.get(pos).copied() {
        args[pos] = promote(builder, "", pos, input, required, false)?;
    }
    Ok(args)
}

/// [`match_rate()`] applied to every position from `start` to the end.
pub fn match_rate_from(
    builder: &mut SynthGraphBuilder,
    mut args: Vec<UGenIn>,
    start: usize,
    required: Rate,
) -> Result<Vec<UGenIn>, GraphError> {
    for pos in start..args.len() {
        args[pos] = promote(builder, "", pos, args[pos], required, false)?;
    }
    Ok(args)
}

/// Trigger variant of [`match_rate()`]. Scalar inputs and constants are left alone, a
/// control-rate trigger at an audio-rate position is converted so that single-block
/// impulses survive as single-sample impulses.
pub fn match_rate_t(
    builder: &mut SynthGraphBuilder,
    mut args: Vec<UGenIn>,
    pos: usize,
    required: Rate,
) -> Result<Vec<UGenIn>, GraphError> {
    if let Some(input) = args.get(pos).copied() {
        args[pos] = promote(builder, "", pos, input, required, true)?;
    }
    Ok(args)
}

/// Apply the promotions a definition declares. Only audio-rate instances are matched.
pub(crate) fn apply(
    builder: &mut SynthGraphBuilder,
    def: &UGenDef,
    rate: Rate,
    mut args: Vec<UGenIn>,
) -> Result<Vec<UGenIn>, GraphError> {
    if rate != Rate::Audio {
        return Ok(args);
    }
    for matcher in def.matching {
        let (range, trigger) = match *matcher {
            RateMatch::Single(pos) => (pos..pos + 1, false),
            RateMatch::From(pos) => (pos..args.len(), false),
            RateMatch::Trigger(pos) => (pos..pos + 1, true),
        };
        for pos in range {
            let Some(input) = args.get(pos).copied() else {
                break;
            };
            args[pos] = promote(builder, def.name, pos, input, Rate::Audio, trigger)?;
        }
    }
    Ok(args)
}

fn promote(
    builder: &mut SynthGraphBuilder,
    ugen: &str,
    pos: usize,
    input: UGenIn,
    required: Rate,
    trigger: bool,
) -> Result<UGenIn, GraphError> {
    let found = input.rate();
    if found == required {
        return Ok(input);
    }
    if !found.is_below(required) {
        if builder.config().strict_rates {
            return Err(GraphError::RateMismatch {
                ugen: ugen.to_owned(),
                position: pos,
                found,
                required,
            });
        }
        warn!(ugen = ugen, position = pos, %found, %required, "input rate cannot be matched, passing it through");
        return Ok(input);
    }

    let node = match (required, trigger) {
        (_, true) if found == Rate::Scalar => return Ok(input),
        (Rate::Audio, true) => conversion(&conv::T2A::DEF, required, vec![input, UGenIn::Constant(0.0)]),
        (Rate::Audio, false) => conversion(&conv::K2A::DEF, required, vec![input]),
        _ => conversion(&conv::DC::DEF, required, vec![input]),
    };
    debug!(ugen = ugen, position = pos, via = %node.name, %found, %required, "promoting input");
    let refs = builder.emit(node);
    Ok(refs.first().copied().map_or(input, UGenIn::Output))
}

fn conversion(def: &UGenDef, rate: Rate, inputs: Vec<UGenIn>) -> UGenNode {
    UGenNode {
        name: def.name.to_owned(),
        rate,
        special_index: 0,
        inputs,
        outputs: vec![rate],
        flags: def.flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GraphConfig, graph::UGenOutRef};

    fn builder() -> SynthGraphBuilder {
        SynthGraphBuilder::new(GraphConfig::default())
    }

    fn strict() -> SynthGraphBuilder {
        SynthGraphBuilder::new(GraphConfig {
            strict_rates: true,
            ..GraphConfig::default()
        })
    }

    fn signal(node: usize, rate: Rate) -> UGenIn {
        UGenIn::Output(UGenOutRef {
            node,
            index: 0,
            rate,
        })
    }

    #[test]
    fn control_input_gets_one_conversion() {
        let mut b = builder();
        let kr = signal(7, Rate::Control);
        let args = match_rate(&mut b, vec![kr], 0, Rate::Audio).unwrap();
        assert_eq!(b.nodes().len(), 1);
        assert_eq!(b.nodes()[0].name, "K2A");
        assert_eq!(b.nodes()[0].inputs, vec![kr]);
        assert_eq!(b.nodes()[0].outputs, vec![Rate::Audio]);
        assert_eq!(args, vec![signal(0, Rate::Audio)]);
    }

    #[test]
    fn matching_rate_is_identity() {
        let mut b = builder();
        let ar = signal(0, Rate::Audio);
        let args = match_rate(&mut b, vec![ar, UGenIn::Constant(1.0)], 0, Rate::Audio).unwrap();
        assert_eq!(args, vec![ar, UGenIn::Constant(1.0)]);
        assert!(b.nodes().is_empty());
    }

    #[test]
    fn control_target_uses_dc() {
        let mut b = builder();
        let args = match_rate(&mut b, vec![UGenIn::Constant(3.0)], 0, Rate::Control).unwrap();
        assert_eq!(b.nodes()[0].name, "DC");
        assert_eq!(args[0].rate(), Rate::Control);
    }

    #[test]
    fn faster_inputs_are_never_downsampled() {
        let mut b = builder();
        let ar = signal(0, Rate::Audio);
        let args = match_rate(&mut b, vec![ar], 0, Rate::Control).unwrap();
        assert_eq!(args, vec![ar]);
        assert!(b.nodes().is_empty());
    }

    #[test]
    fn strict_mode_rejects_unmatchable_inputs() {
        let mut b = strict();
        let err = match_rate(&mut b, vec![signal(0, Rate::Demand)], 0, Rate::Audio).unwrap_err();
        assert_eq!(
            err,
            GraphError::RateMismatch {
                ugen: String::new(),
                position: 0,
                found: Rate::Demand,
                required: Rate::Audio
            }
        );
    }

    #[test]
    fn out_of_range_position_is_ignored() {
        let mut b = builder();
        let args = match_rate(&mut b, vec![UGenIn::Constant(1.0)], 3, Rate::Audio).unwrap();
        assert_eq!(args, vec![UGenIn::Constant(1.0)]);
        assert!(b.nodes().is_empty());
    }

    #[test]
    fn from_position_to_end() {
        let mut b = builder();
        let args = vec![
            UGenIn::Constant(0.0),
            signal(5, Rate::Control),
            signal(6, Rate::Audio),
            UGenIn::Constant(2.0),
        ];
        let args = match_rate_from(&mut b, args, 1, Rate::Audio).unwrap();
        assert_eq!(args[0], UGenIn::Constant(0.0));
        assert!(args[1..].iter().all(|a| a.rate() == Rate::Audio));
        //One conversion each for the control signal and the trailing constant
        assert_eq!(b.nodes().len(), 2);
    }

    #[test]
    fn triggers_leave_scalars_alone() {
        let mut b = builder();
        let args = match_rate_t(&mut b, vec![UGenIn::Constant(1.0)], 0, Rate::Audio).unwrap();
        assert_eq!(args, vec![UGenIn::Constant(1.0)]);
        assert!(b.nodes().is_empty());

        let kr = signal(4, Rate::Control);
        let args = match_rate_t(&mut b, vec![kr], 0, Rate::Audio).unwrap();
        assert_eq!(b.nodes()[0].name, "T2A");
        assert_eq!(b.nodes()[0].inputs, vec![kr, UGenIn::Constant(0.0)]);
        assert_eq!(args, vec![signal(0, Rate::Audio)]);
    }

    #[test]
    fn declared_matching_runs_only_at_audio_rate() {
        use crate::extra::builtin::{Out, SinOsc};
        use crate::graph::SynthGraph;

        let graph = SynthGraph::build(
            GraphConfig::default(),
            &[Out::kr().bus(0).input(SinOsc::kr()).into()],
        )
        .unwrap();
        assert_eq!(graph.len(), 2);

        let graph = SynthGraph::build(
            GraphConfig::default(),
            &[Out::ar().bus(0).input(SinOsc::kr()).into()],
        )
        .unwrap();
        let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["SinOsc", "K2A", "Out"]);
        //The bus index is not matched
        assert_eq!(graph.nodes()[2].inputs[0], UGenIn::Constant(0.0));
    }
}
