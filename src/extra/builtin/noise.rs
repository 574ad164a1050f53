//! Noise and random values.
//!
//! Every generator has its own random state, so two instances with equal inputs are
//! still two nodes.

use crate::ugen;

macro_rules! plain_noise {
    ( $( $(#[$meta:meta])* $name:ident ),+ $(,)? ) => {
        $(
            ugen! {
                $(#[$meta])*
                $name {
                    rate: [ar, kr],
                    outputs: one,
                    flags: [individual],
                    inputs: {}
                }
            }
        )+
    };
}

plain_noise! {
    /// Flat spectrum.
    WhiteNoise,
    /// Spectrum falling 3 dB per octave.
    PinkNoise,
    /// Spectrum falling 6 dB per octave.
    BrownNoise,
    /// Randomly -1 or 1.
    ClipNoise,
    /// Random bit flips of an integer.
    GrayNoise,
}

ugen! {
    /// Random impulses from 0 to 1.
    Dust {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        inputs: {
            /// Average number of impulses per second.
            density: ge = 0
        }
    }
}

ugen! {
    /// Random impulses from -1 to 1.
    Dust2 {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        inputs: {
            /// Average number of impulses per second.
            density: ge = 0
        }
    }
}

ugen! {
    /// Chaotic noise from a quadratic map.
    Crackle {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        inputs: {
            /// Usually between 1 and 2.
            chaos_param: ge = 1.5
        }
    }
}

ugen! {
    /// Step noise: a new random value at each step.
    LFNoise0 {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        inputs: {
            /// Steps per second.
            freq: ge = 500
        }
    }
}

ugen! {
    /// Ramp noise: lines between random values.
    LFNoise1 {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        inputs: {
            /// Random values per second.
            freq: ge = 500
        }
    }
}

ugen! {
    /// Quadratic noise: curves between random values.
    LFNoise2 {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        inputs: {
            /// Random values per second.
            freq: ge = 500
        }
    }
}

ugen! {
    /// Uniform random value picked when the synth starts.
    Rand {
        rate: ir,
        outputs: one,
        flags: [individual],
        inputs: {
            /// Lower bound.
            lo: ge = 0,
            /// Upper bound.
            hi: ge = 1
        }
    }
}

ugen! {
    /// Random integer picked when the synth starts.
    IRand {
        rate: ir,
        outputs: one,
        flags: [individual],
        inputs: {
            /// Lower bound.
            lo: ge = 0,
            /// Upper bound, inclusive.
            hi: ge = 127
        }
    }
}

ugen! {
    /// Exponentially distributed random value picked when the synth starts. Both bounds
    /// must have the same sign.
    ExpRand {
        rate: ir,
        outputs: one,
        flags: [individual],
        inputs: {
            /// Lower bound.
            lo: ge = 0.01,
            /// Upper bound.
            hi: ge = 1
        }
    }
}

ugen! {
    /// Uniform random value picked on each trigger.
    TRand {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        matching: [Trigger(2)],
        inputs: {
            /// Lower bound.
            lo: ge = 0,
            /// Upper bound.
            hi: ge = 1,
            /// Trigger.
            trig: ge = 0
        }
    }
}

ugen! {
    /// Passes each trigger with a probability.
    CoinGate {
        rate: [ar, kr],
        outputs: one,
        flags: [individual],
        matching: [Trigger(1)],
        inputs: {
            /// Probability, 0 to 1.
            prob: ge = 0.5,
            /// Trigger.
            input: ge = 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GraphConfig, graph::SynthGraph};

    #[test]
    fn equal_generators_stay_apart() {
        let graph = SynthGraph::build(
            GraphConfig::default(),
            &[Rand::ir().into(), Rand::ir().into(), LFNoise1::kr().into(), LFNoise1::kr().into()],
        )
        .unwrap();
        assert_eq!(graph.len(), 4);
        assert!(graph.nodes().iter().all(|n| n.flags.individual));
    }

    #[test]
    fn generators_without_inputs() {
        assert!(PinkNoise::def().params.is_empty());
        assert_eq!(PinkNoise::def().arity(), 1);
    }
}
