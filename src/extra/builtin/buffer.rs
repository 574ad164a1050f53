//! Buffer players, recorders and lookups.

use crate::{graph::GE, ugen};

ugen! {
    /// Plays back a sample buffer.
    PlayBuf {
        rate: [ar, kr],
        outputs: channels,
        flags: [done_flag],
        inputs: {
            /// Number of channels of the buffer. Fixed when the graph is built.
            num_channels: channels = 1,
            /// Buffer index.
            buf: ge = 0,
            /// Playback speed, 1 is the buffer's own sample rate.
            rate: ge = 1,
            /// Jumps to `start_pos` on a trigger.
            trig: ge = 1,
            /// Start position in frames.
            start_pos: ge = 0,
            /// 1 to loop, 0 to stop at the end.
            looping: ge = 0,
            /// Action taken at the end of a non-looping buffer.
            done_action: ge = 0
        }
    }
}

ugen! {
    /// Reads a buffer at a phase given as a signal.
    BufRd {
        rate: [ar, kr],
        outputs: channels,
        matching: [Single(1)],
        inputs: {
            /// Number of channels of the buffer.
            num_channels: channels = 1,
            /// Buffer index.
            buf: ge = 0,
            /// Frame index.
            phase: ge = 0,
            /// 1 to wrap the phase around the buffer.
            looping: ge = 1,
            /// 1 none, 2 linear, 4 cubic.
            interp: ge = 2
        }
    }
}

ugen! {
    /// Writes a signal to a buffer at a phase given as a signal. Passes the input
    /// through.
    BufWr {
        rate: [ar, kr],
        outputs: one,
        flags: [side_effect],
        matching: [Single(1)],
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Frame index.
            phase: ge = 0,
            /// 1 to wrap the phase around the buffer.
            looping: ge = 1,
            /// Channels to write.
            input: spread = GE::empty()
        }
    }
}

ugen! {
    /// Records a signal into a buffer, mixing it with the previous content.
    RecordBuf {
        rate: [ar, kr],
        outputs: one,
        flags: [side_effect, done_flag],
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Start frame.
            offset: ge = 0,
            /// Amplitude of the new signal.
            rec_level: ge = 1,
            /// Amplitude of the previous content.
            pre_level: ge = 0,
            /// Recording pauses while this is zero or less.
            run: ge = 1,
            /// 1 to loop.
            looping: ge = 1,
            /// Jumps back to `offset` on a trigger.
            trig: ge = 1,
            /// Action taken at the end of a non-looping buffer.
            done_action: ge = 0,
            /// Channels to record.
            input: spread = GE::empty()
        }
    }
}

ugen! {
    /// Reads a buffer as a table, truncating the index.
    Index {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Table index, clipped to the table.
            input: ge = 0
        }
    }
}

ugen! {
    /// Reads a buffer as a table, interpolating linearly.
    IndexL {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Table index, clipped to the table.
            input: ge = 0
        }
    }
}

ugen! {
    /// Reads a buffer as a table, wrapping the index.
    WrapIndex {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Table index, wrapped around the table.
            input: ge = 0
        }
    }
}

ugen! {
    /// Reads a buffer as a table, folding the index.
    FoldIndex {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Table index, folded into the table.
            input: ge = 0
        }
    }
}

ugen! {
    /// Fractional index of a value in a sorted table.
    IndexInBetween {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Value to look up.
            input: ge = 0
        }
    }
}

ugen! {
    /// Index of a value in a table, -1 if absent.
    DetectIndex {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Value to look up.
            input: ge = 0
        }
    }
}

ugen! {
    /// Number of frames of a buffer.
    BufFrames {
        rate: [ir, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0
        }
    }
}

ugen! {
    /// Duration of a buffer in seconds.
    BufDur {
        rate: [ir, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0
        }
    }
}

ugen! {
    /// Sample rate of a buffer.
    BufSampleRate {
        rate: [ir, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0
        }
    }
}

ugen! {
    /// Ratio of a buffer's sample rate to the server's.
    BufRateScale {
        rate: [ir, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0
        }
    }
}

ugen! {
    /// Number of channels of a buffer.
    BufChannels {
        rate: [ir, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0
        }
    }
}

ugen! {
    /// Buffer allocated for the lifetime of the synth. Outputs its index.
    LocalBuf {
        rate: ir,
        outputs: one,
        flags: [individual],
        inputs: {
            /// Number of channels.
            num_channels: ge = 1,
            /// Number of frames.
            num_frames: ge = 1
        }
    }
}

ugen! {
    /// Streams a signal to a sound file opened in a buffer. Outputs the number of
    /// frames written.
    DiskOut {
        rate: ar,
        outputs: one,
        flags: [side_effect],
        matching: [From(1)],
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Channels to write.
            input: spread = GE::empty()
        }
    }
}
