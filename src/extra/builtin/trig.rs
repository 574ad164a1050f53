//! Triggers, counters and reporting.
//!
//! A trigger is a transition from a non-positive to a positive value. At audio rate,
//! control-rate triggers are converted with `T2A` so that they stay single-sample
//! impulses.

use super::Impulse;
use crate::{graph::GE, ugen};

ugen! {
    /// Outputs the trigger value for `dur` seconds after each trigger.
    Trig {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger.
            input: ge = 0,
            /// Hold time in seconds.
            dur: ge = 0.1
        }
    }
}

ugen! {
    /// Outputs 1 for `dur` seconds after each trigger.
    Trig1 {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger.
            input: ge = 0,
            /// Hold time in seconds.
            dur: ge = 0.1
        }
    }
}

ugen! {
    /// Delays triggers.
    TDelay {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger.
            input: ge = 0,
            /// Delay in seconds.
            dur: ge = 0.1
        }
    }
}

ugen! {
    /// Sample and hold.
    Latch {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(1)],
        inputs: {
            /// Signal to sample.
            input: ge = 0,
            /// Trigger.
            trig: ge = 0
        }
    }
}

ugen! {
    /// Passes the input while the gate is open, holds the last value otherwise.
    Gate {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(1)],
        inputs: {
            /// Signal to pass.
            input: ge = 0,
            /// Gate.
            trig: ge = 0
        }
    }
}

ugen! {
    /// Counts triggers.
    PulseCount {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger to count.
            trig: ge = 0,
            /// Resets the count to zero.
            reset: ge = 0
        }
    }
}

ugen! {
    /// Wrapping counter.
    Stepper {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger to count.
            trig: ge = 0,
            /// Resets the count to `reset_val`.
            reset: ge = 0,
            /// Lowest value.
            min: ge = 0,
            /// Highest value.
            max: ge = 7,
            /// Increment per trigger.
            step: ge = 1,
            /// Value after a reset.
            reset_val: ge = 0
        }
    }
}

ugen! {
    /// Flip-flop toggling between 0 and 1 on each trigger.
    ToggleFF {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger.
            trig: ge = 0
        }
    }
}

ugen! {
    /// Flip-flop set to 1 by one trigger and to 0 by another.
    SetResetFF {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0), Trigger(1)],
        inputs: {
            /// Sets the output to 1.
            trig: ge = 0,
            /// Sets the output to 0.
            reset: ge = 0
        }
    }
}

ugen! {
    /// Time between the last two triggers.
    Timer {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger.
            trig: ge = 0
        }
    }
}

ugen! {
    /// Linear ramp started from zero by each trigger.
    Sweep {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Trigger.
            trig: ge = 0,
            /// Increment per second.
            rate: ge = 1
        }
    }
}

ugen! {
    /// Resettable wrapping ramp.
    Phasor {
        rate: [ar, kr],
        outputs: one,
        matching: [Trigger(0)],
        inputs: {
            /// Jumps to `reset_pos`.
            trig: ge = 0,
            /// Increment per sample.
            rate: ge = 1,
            /// Start of the range.
            start: ge = 0,
            /// End of the range, exclusive.
            end: ge = 1,
            /// Value jumped to on a trigger.
            reset_pos: ge = 0
        }
    }
}

ugen! {
    /// Sends a `/tr` message to clients on each trigger.
    SendTrig {
        rate: [ar, kr],
        outputs: zero,
        flags: [side_effect],
        inputs: {
            /// Trigger.
            input: ge = 0,
            /// Id sent with the message.
            id: ge = 0,
            /// Value sent with the message.
            value: ge = 0
        }
    }
}

ugen! {
    /// Sends a message with any number of values to clients on each trigger.
    SendReply {
        rate: [ar, kr],
        outputs: zero,
        flags: [side_effect],
        inputs: {
            /// Trigger.
            trig: ge = 0,
            /// Id sent with the message.
            reply_id: ge = -1,
            /// Command name of the message.
            cmd_name: text = "/reply",
            /// Values sent with the message.
            values: spread = GE::empty()
        }
    }
}

ugen! {
    /// Prints the input on each trigger. Passes the input through.
    Poll {
        rate: [ar, kr],
        outputs: one,
        flags: [side_effect],
        inputs: {
            /// Trigger. A constant fires once at start, see [`Poll::every()`] for
            /// printing at a fixed frequency.
            trig: ge = 1,
            /// Signal to print.
            input: ge = 0,
            /// Id of the `/tr` message sent along, -1 for none.
            trig_id: ge = -1,
            /// Label printed before the value.
            label: text = "UGen"
        }
    }
}

impl Poll {
    /// Print `freq` times per second, triggered by an [`Impulse`] running at the rate of
    /// this instance.
    ///
    /// ```
    /// # use ugengraph::{config::GraphConfig, graph::SynthGraph, extra::builtin::{Poll, SinOsc}};
    /// let poll = Poll::kr().every(10).input(SinOsc::kr());
    /// let graph = SynthGraph::build(GraphConfig::default(), &[poll.into()]).unwrap();
    /// let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
    /// assert_eq!(names, ["Impulse", "SinOsc", "Poll"]);
    /// ```
    pub fn every(self, freq: impl Into<GE>) -> Self {
        let trig = Impulse::with_rate(self.calc_rate).freq(freq);
        self.trig(trig)
    }
}

ugen! {
    /// Frees a node on a trigger.
    Free {
        rate: kr,
        outputs: one,
        flags: [side_effect],
        inputs: {
            /// Trigger.
            trig: ge = 0,
            /// Node to free.
            node_id: ge = 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GraphConfig,
        extra::builtin::{Impulse, SinOsc},
        graph::{SynthGraph, UGenIn},
        types::Rate,
    };

    fn names(graph: &SynthGraph) -> Vec<&str> {
        graph.nodes().iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn control_trigger_is_converted_at_audio_rate() {
        let latch = Latch::ar().input(SinOsc::ar()).trig(Impulse::kr().freq(4));
        let graph = SynthGraph::build(GraphConfig::default(), &[latch.into()]).unwrap();
        assert_eq!(names(&graph), ["SinOsc", "Impulse", "T2A", "Latch"]);
        assert_eq!(graph.nodes()[3].inputs[1].rate(), Rate::Audio);
    }

    #[test]
    fn constant_trigger_is_kept() {
        let graph = SynthGraph::build(GraphConfig::default(), &[Trig1::ar().input(1).into()]).unwrap();
        assert_eq!(names(&graph), ["Trig1"]);
        assert_eq!(graph.nodes()[0].inputs[0], UGenIn::Constant(1.0));
    }

    #[test]
    fn control_rate_instances_are_not_matched() {
        let graph = SynthGraph::build(
            GraphConfig::default(),
            &[SetResetFF::kr().trig(Impulse::kr()).reset(Impulse::kr().freq(3)).into()],
        )
        .unwrap();
        assert_eq!(names(&graph), ["Impulse", "Impulse", "SetResetFF"]);
    }

    #[test]
    fn reporting_nodes_are_never_shared() {
        let poll = || GE::from(Poll::kr().input(SinOsc::kr()));
        let graph = SynthGraph::build(GraphConfig::default(), &[poll(), poll()]).unwrap();
        //The oscillators are shared, the polls are not
        assert_eq!(names(&graph), ["SinOsc", "Poll", "Poll"]);
    }

    #[test]
    fn periodic_poll_gets_an_impulse() {
        let poll = Poll::ar().every(4).input(SinOsc::ar());
        let graph = SynthGraph::build(GraphConfig::default(), &[poll.into()]).unwrap();
        assert_eq!(names(&graph), ["Impulse", "SinOsc", "Poll"]);
        assert_eq!(graph.nodes()[0].rate, Rate::Audio);
        assert_eq!(graph.nodes()[0].inputs[0], UGenIn::Constant(4.0));
        assert_eq!(graph.nodes()[2].inputs[0].rate(), Rate::Audio);
    }

    #[test]
    fn reply_command_precedes_values() {
        let reply = SendReply::kr().trig(1).cmd_name("/a").values(GE::seq([5.0, 6.0]));
        let graph = SynthGraph::build(GraphConfig::default(), &[reply.into()]).unwrap();
        let inputs: Vec<f32> = graph.nodes()[0]
            .inputs
            .iter()
            .map(|i| match i {
                UGenIn::Constant(c) => *c,
                UGenIn::Output(_) => f32::NAN,
            })
            .collect();
        assert_eq!(inputs, vec![1.0, -1.0, 2.0, 47.0, 97.0, 5.0, 6.0]);
        assert!(graph.nodes()[0].outputs.is_empty());
    }
}
