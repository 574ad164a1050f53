//! Bus input and output.

use crate::{graph::GE, ugen};

ugen! {
    /// Writes channels to consecutive buses, mixing with what is already there.
    Out {
        rate: [ar, kr],
        outputs: zero,
        flags: [side_effect],
        matching: [From(1)],
        inputs: {
            /// First bus.
            bus: ge = 0,
            /// Channels to write.
            input: spread = GE::empty()
        }
    }
}

ugen! {
    /// Writes channels to consecutive buses, replacing what is already there.
    ReplaceOut {
        rate: [ar, kr],
        outputs: zero,
        flags: [side_effect],
        matching: [From(1)],
        inputs: {
            /// First bus.
            bus: ge = 0,
            /// Channels to write.
            input: spread = GE::empty()
        }
    }
}

ugen! {
    /// Writes channels to consecutive buses with sample-accurate onset.
    OffsetOut {
        rate: [ar],
        outputs: zero,
        flags: [side_effect],
        matching: [From(1)],
        inputs: {
            /// First bus.
            bus: ge = 0,
            /// Channels to write.
            input: spread = GE::empty()
        }
    }
}

ugen! {
    /// Crossfades channels into consecutive buses.
    XOut {
        rate: [ar, kr],
        outputs: zero,
        flags: [side_effect],
        matching: [From(2)],
        inputs: {
            /// First bus.
            bus: ge = 0,
            /// 0 keeps the bus content, 1 replaces it.
            xfade: ge = 1,
            /// Channels to write.
            input: spread = GE::empty()
        }
    }
}

ugen! {
    /// Reads channels from consecutive buses.
    In {
        rate: [ar, kr],
        outputs: channels,
        inputs: {
            /// Number of buses to read.
            num_channels: channels = 1,
            /// First bus.
            bus: ge = 0
        }
    }
}

ugen! {
    /// Reads audio buses, including signals written later in the previous cycle.
    InFeedback {
        rate: [ar],
        outputs: channels,
        inputs: {
            /// Number of buses to read.
            num_channels: channels = 1,
            /// First bus.
            bus: ge = 0
        }
    }
}

ugen! {
    /// Reads channels written by [`LocalOut`] in the previous block.
    LocalIn {
        rate: [ar, kr],
        outputs: channels,
        inputs: {
            /// Number of channels.
            num_channels: channels = 1,
            /// Value of the first block.
            default: spread = 0
        }
    }
}

ugen! {
    /// Writes channels to buses private to the synth.
    LocalOut {
        rate: [ar, kr],
        outputs: zero,
        flags: [side_effect],
        matching: [From(0)],
        inputs: {
            /// Channels to write.
            input: spread = GE::empty()
        }
    }
}
