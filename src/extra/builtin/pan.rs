//! Panners and crossfaders.

use crate::{graph::GE, ugen};

ugen! {
    /// Equal power stereo panner.
    Pan2 {
        rate: [ar, kr],
        outputs: 2,
        inputs: {
            /// Mono signal.
            input: ge = 0,
            /// Position, -1 (left) to 1 (right).
            pos: ge = 0,
            /// Output amplitude.
            level: ge = 1
        }
    }
}

ugen! {
    /// Linear stereo panner.
    LinPan2 {
        rate: [ar, kr],
        outputs: 2,
        inputs: {
            /// Mono signal.
            input: ge = 0,
            /// Position, -1 (left) to 1 (right).
            pos: ge = 0,
            /// Output amplitude.
            level: ge = 1
        }
    }
}

ugen! {
    /// Stereo balance.
    Balance2 {
        rate: [ar, kr],
        outputs: 2,
        inputs: {
            /// Left channel.
            left: ge = 0,
            /// Right channel.
            right: ge = 0,
            /// Balance, -1 (left) to 1 (right).
            pos: ge = 0,
            /// Output amplitude.
            level: ge = 1
        }
    }
}

ugen! {
    /// Equal power four channel panner. Outputs are left front, right front, left back
    /// and right back.
    Pan4 {
        rate: [ar, kr],
        outputs: 4,
        inputs: {
            /// Mono signal.
            input: ge = 0,
            /// Horizontal position, -1 to 1.
            xpos: ge = 0,
            /// Vertical position, -1 (back) to 1 (front).
            ypos: ge = 0,
            /// Output amplitude.
            level: ge = 1
        }
    }
}

ugen! {
    /// Azimuth panner over any number of speakers placed in a circle.
    PanAz {
        rate: [ar, kr],
        outputs: channels,
        inputs: {
            /// Number of speakers.
            num_channels: channels = 2,
            /// Mono signal.
            input: ge = 0,
            /// Position, moving by one speaker distance per 2 / `num_channels`.
            pos: ge = 0,
            /// Output amplitude.
            level: ge = 1,
            /// Number of speakers the signal is spread over.
            width: ge = 2,
            /// Position of the first speaker, in speaker distances.
            orientation: ge = 0.5
        }
    }
}

ugen! {
    /// Equal power crossfade between two signals.
    XFade2 {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// First signal.
            in_a: ge = 0,
            /// Second signal.
            in_b: ge = 0,
            /// Position, -1 (only `in_a`) to 1 (only `in_b`).
            pan: ge = 0,
            /// Output amplitude.
            level: ge = 1
        }
    }
}

ugen! {
    /// Linear crossfade between two signals.
    LinXFade2 {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// First signal.
            in_a: ge = 0,
            /// Second signal.
            in_b: ge = 0,
            /// Position, -1 (only `in_a`) to 1 (only `in_b`).
            pan: ge = 0,
            /// Output amplitude.
            level: ge = 1
        }
    }
}

/// Sum all channels of `ge` into one.
///
/// ```
/// # use ugengraph::{config::GraphConfig, graph::{GE, SynthGraph}, extra::builtin::{mix, Pan2, SinOsc}};
/// let mono = mix(Pan2::ar().input(SinOsc::ar()).into(), 2);
/// let graph = SynthGraph::build(GraphConfig::default(), &[mono]).unwrap();
/// assert_eq!(graph.nodes().last().unwrap().name, "BinaryOpUGen");
/// ```
pub fn mix(ge: GE, channels: usize) -> GE {
    (1..channels).fold(ge.clone().channel(0), |acc, i| acc + ge.clone().channel(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GraphConfig,
        extra::builtin::SinOsc,
        graph::{SynthGraphBuilder, UGenOutRef},
        types::Rate,
    };

    #[test]
    fn fixed_outputs_form_a_composite() {
        let mut b = SynthGraphBuilder::new(GraphConfig::default());
        let ge: GE = Pan2::ar().input(SinOsc::ar()).into();
        let out = b.expand(&ge).unwrap();
        assert_eq!(
            out,
            GE::Composite(vec![
                GE::Output(UGenOutRef {
                    node: 1,
                    index: 0,
                    rate: Rate::Audio
                }),
                GE::Output(UGenOutRef {
                    node: 1,
                    index: 1,
                    rate: Rate::Audio
                }),
            ])
        );
    }

    #[test]
    fn multichannel_input_gives_nested_outputs() {
        let mut b = SynthGraphBuilder::new(GraphConfig::default());
        let ge: GE = Pan2::ar().input(GE::seq([1.0, 2.0])).pos(0.3).into();
        let out = b.expand(&ge).unwrap();
        //Two panners with two outputs each
        assert_eq!(out.outputs().unwrap().len(), 4);
        let GE::Composite(replicas) = out else {
            panic!("composite expected")
        };
        assert_eq!(replicas.len(), 2);
    }

    #[test]
    fn mix_selects_shared_channels() {
        let pan: GE = Pan4::kr().input(1).into();
        let graph = crate::graph::SynthGraph::build(GraphConfig::default(), &[mix(pan, 4)]).unwrap();
        //One panner shared by every channel selection, three additions
        assert_eq!(graph.len(), 4);
    }
}
