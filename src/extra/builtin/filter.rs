//! Filters, lags and range limiters.

use crate::ugen;

macro_rules! simple_filter {
    ( $( $(#[$meta:meta])* $name:ident ),+ => $inputs:tt ) => {
        $(
            ugen! {
                $(#[$meta])*
                $name {
                    rate: [ar, kr],
                    outputs: one,
                    inputs: $inputs
                }
            }
        )+
    };
}

simple_filter! {
    /// Second order Butterworth lowpass.
    LPF,
    /// Second order Butterworth highpass.
    HPF
    => {
        /// Signal to filter.
        input: ge = 0,
        /// Cutoff frequency in Hz.
        freq: ge = 440
    }
}

simple_filter! {
    /// Second order Butterworth bandpass.
    BPF,
    /// Second order Butterworth band reject.
    BRF,
    /// Resonant lowpass.
    RLPF,
    /// Resonant highpass.
    RHPF
    => {
        /// Signal to filter.
        input: ge = 0,
        /// Center or cutoff frequency in Hz.
        freq: ge = 440,
        /// Reciprocal of Q.
        rq: ge = 1
    }
}

simple_filter! {
    /// Two pole resonant filter with constant gain at zero frequency.
    Resonz
    => {
        /// Signal to filter.
        input: ge = 0,
        /// Resonant frequency in Hz.
        freq: ge = 440,
        /// Bandwidth ratio, bandwidth divided by frequency.
        bwr: ge = 1
    }
}

simple_filter! {
    /// Exponential lag.
    Lag,
    /// Two exponential lags in series.
    Lag2
    => {
        /// Signal to smooth.
        input: ge = 0,
        /// Time to reach 60 dB below the target, in seconds.
        time: ge = 0.1
    }
}

simple_filter! {
    /// Exponential decay of each input sample.
    Decay
    => {
        /// Signal, usually impulses.
        input: ge = 0,
        /// Time to decay by 60 dB, in seconds.
        time: ge = 1
    }
}

simple_filter! {
    /// Exponential attack and decay of each input sample.
    Decay2
    => {
        /// Signal, usually impulses.
        input: ge = 0,
        /// Time to rise, in seconds.
        attack_time: ge = 0.01,
        /// Time to decay by 60 dB, in seconds.
        decay_time: ge = 1
    }
}

simple_filter! {
    /// Leaky integrator.
    Integrator,
    /// Removes a DC offset.
    LeakDC
    => {
        /// Signal to filter.
        input: ge = 0,
        /// Leak coefficient.
        coef: ge = 0.995
    }
}

simple_filter! {
    /// Clips to a range.
    ///
    /// An instance running at control rate outputs 0 for its first sample regardless of
    /// its input. This is the behavior of the server and is kept as is.
    Clip,
    /// Wraps into a range.
    Wrap,
    /// Folds into a range.
    Fold
    => {
        /// Signal to limit.
        input: ge = 0,
        /// Lower bound.
        lo: ge = 0,
        /// Upper bound.
        hi: ge = 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GraphConfig,
        extra::builtin::{Impulse, Saw},
        graph::SynthGraph,
        types::Rate,
    };

    #[test]
    fn filter_chain_emits_in_order() {
        let chain = Lag::kr().input(RLPF::ar().input(Saw::ar()).freq(Decay2::kr().input(Impulse::kr())));
        let graph = SynthGraph::build(GraphConfig::default(), &[chain.into()]).unwrap();
        let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Saw", "Impulse", "Decay2", "RLPF", "Lag"]);
        //No rate matching for filters: the control-rate lag reads audio directly
        assert_eq!(graph.nodes()[4].inputs[0].rate(), Rate::Audio);
    }

    #[test]
    fn range_limiters_share_parameters() {
        assert_eq!(Clip::def().params, Fold::def().params);
        assert_eq!(Clip::def().arity(), 4);
    }
}
