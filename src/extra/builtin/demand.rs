//! Demand-rate sequencing.
//!
//! Demand-rate UGens produce a value each time their reader pulls one. Their state is
//! advanced by the reader, so they are never shared.

use crate::{graph::GE, ugen};

ugen! {
    /// Plays a list of values, `repeats` times.
    Dseq {
        rate: dr,
        outputs: one,
        flags: [individual],
        inputs: {
            /// Number of passes over the list.
            repeats: ge = 1,
            /// Values, each of which may be another demand UGen.
            seq: spread = 0
        }
    }
}

ugen! {
    /// Uniform random values.
    Dwhite {
        rate: dr,
        outputs: one,
        flags: [individual],
        inputs: {
            /// Number of values.
            length: ge = f32::INFINITY,
            /// Lower bound.
            lo: ge = 0,
            /// Upper bound.
            hi: ge = 1
        }
    }
}

ugen! {
    /// Arithmetic series.
    Dseries {
        rate: dr,
        outputs: one,
        flags: [individual],
        inputs: {
            /// Number of values.
            length: ge = f32::INFINITY,
            /// First value.
            start: ge = 1,
            /// Increment.
            step: ge = 1
        }
    }
}

ugen! {
    /// Pulls a value from `level` after every duration pulled from `dur`.
    Duty {
        rate: [ar, kr],
        outputs: one,
        flags: [done_flag],
        inputs: {
            /// Time to the next value, may be a demand UGen.
            dur: ge = 1,
            /// Resets `dur` and `level` on a trigger.
            reset: ge = 0,
            /// Action taken when `dur` runs out.
            done_action: ge = 0,
            /// Value source, usually a demand UGen.
            level: ge = 1
        }
    }
}

ugen! {
    /// Pulls one value from each source on every trigger.
    Demand {
        rate: [ar, kr],
        outputs: channels,
        matching: [Trigger(0)],
        inputs: {
            /// Number of sources.
            num_channels: channels = 1,
            /// Pulls new values.
            trig: ge = 0,
            /// Resets the sources.
            reset: ge = 0,
            /// Demand sources, one output each.
            src: spread = GE::empty()
        }
    }
}
