//! Oscillators.

use crate::{graph::GE, ugen};

ugen! {
    /// Sine oscillator using a wavetable lookup.
    SinOsc {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Phase offset in radians.
            phase: ge = 0
        }
    }
}

ugen! {
    /// Very fast sine oscillator built on a ringing filter. The frequency cannot be
    /// modulated.
    FSinOsc {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Initial phase in radians.
            iphase: ge = 0
        }
    }
}

ugen! {
    /// Sine oscillator with phase modulation feedback.
    SinOscFB {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Amount of output fed back into the phase.
            feedback: ge = 0
        }
    }
}

ugen! {
    /// Band-limited sawtooth.
    Saw {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440
        }
    }
}

ugen! {
    /// Band-limited pulse wave.
    Pulse {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Pulse width, 0 to 1.
            width: ge = 0.5
        }
    }
}

ugen! {
    /// Band-limited impulse train.
    Blip {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Number of harmonics.
            num_harm: ge = 200
        }
    }
}

ugen! {
    /// Non band-limited sawtooth, ramping from -1 to 1.
    LFSaw {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Initial phase, 0 to 2.
            iphase: ge = 0
        }
    }
}

ugen! {
    /// Non band-limited pulse, oscillating between 0 and 1.
    LFPulse {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Initial phase, 0 to 1.
            iphase: ge = 0,
            /// Pulse width, 0 to 1.
            width: ge = 0.5
        }
    }
}

ugen! {
    /// Non band-limited triangle.
    LFTri {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Initial phase, 0 to 4.
            iphase: ge = 0
        }
    }
}

ugen! {
    /// Sine-like shape made of two cubic pieces.
    LFCub {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Initial phase, 0 to 2.
            iphase: ge = 0
        }
    }
}

ugen! {
    /// Variable-duty sawtooth.
    VarSaw {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz.
            freq: ge = 440,
            /// Initial phase, 0 to 1.
            iphase: ge = 0,
            /// Duty cycle, 0 to 1.
            width: ge = 0.5
        }
    }
}

ugen! {
    /// Single-sample impulses at a given frequency.
    Impulse {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Frequency in Hz. Zero gives a single impulse.
            freq: ge = 440,
            /// Phase offset, 0 to 1.
            phase: ge = 0
        }
    }
}

ugen! {
    /// Interpolating wavetable oscillator reading a buffer in wavetable format.
    Osc {
        rate: [ar, kr],
        outputs: one,
        inputs: {
            /// Buffer index.
            buf: ge = 0,
            /// Frequency in Hz.
            freq: ge = 440,
            /// Phase offset in radians.
            phase: ge = 0
        }
    }
}

ugen! {
    /// Bank of fixed-frequency sine oscillators. The partials come from an array built
    /// with [`klang_spec()`].
    Klang {
        rate: ar,
        outputs: one,
        inputs: {
            /// Scale factor applied to every frequency.
            freq_scale: ge = 1,
            /// Offset added to every frequency.
            freq_offset: ge = 0,
            /// Frequency, amplitude and phase of every partial.
            specs: spread = GE::empty()
        }
    }
}

ugen! {
    /// Bank of fixed-frequency resonators. The resonators come from an array built with
    /// [`klank_spec()`].
    Klank {
        rate: ar,
        outputs: one,
        inputs: {
            /// Excitation signal.
            input: ge = 0,
            /// Scale factor applied to every frequency.
            freq_scale: ge = 1,
            /// Offset added to every frequency.
            freq_offset: ge = 0,
            /// Scale factor applied to every ring time.
            decay_scale: ge = 1,
            /// Frequency, amplitude and ring time of every resonator.
            specs: spread = GE::empty()
        }
    }
}

fn interleave(freqs: &[f32], second: &[f32], third: &[f32], defaults: (f32, f32)) -> GE {
    GE::seq(freqs.iter().enumerate().flat_map(|(i, &f)| {
        [
            f,
            second.get(i).copied().unwrap_or(defaults.0),
            third.get(i).copied().unwrap_or(defaults.1),
        ]
    }))
}

/// Partials for [`Klang`]. Missing amplitudes are 1, missing phases 0.
///
/// ```
/// # use ugengraph::{graph::GE, extra::builtin::klang_spec};
/// assert_eq!(klang_spec(&[100.0, 200.0], &[0.5], &[]), GE::seq([100.0, 0.5, 0.0, 200.0, 1.0, 0.0]));
/// ```
pub fn klang_spec(freqs: &[f32], amps: &[f32], phases: &[f32]) -> GE {
    interleave(freqs, amps, phases, (1.0, 0.0))
}

/// Resonators for [`Klank`]. Missing amplitudes and ring times are 1.
pub fn klank_spec(freqs: &[f32], amps: &[f32], ring_times: &[f32]) -> GE {
    interleave(freqs, amps, ring_times, (1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GraphConfig, graph::{SynthGraph, UGenIn}};

    #[test]
    fn klank_splices_every_resonator() {
        let bank = Klank::ar()
            .input(Impulse::ar().freq(2))
            .specs(klank_spec(&[800.0, 1071.0], &[0.3], &[1.0, 0.5]));
        let graph = SynthGraph::build(GraphConfig::default(), &[bank.into()]).unwrap();
        let klank = &graph.nodes()[1];
        assert_eq!(klank.name, "Klank");
        //Four scalar inputs, then three values per resonator
        assert_eq!(klank.inputs.len(), 4 + 6);
        assert_eq!(klank.inputs[5], UGenIn::Constant(0.3));
        assert_eq!(klank.inputs[8], UGenIn::Constant(1.0));
    }

    #[test]
    fn partial_array_does_not_expand_klang() {
        let graph = SynthGraph::build(
            GraphConfig::default(),
            &[Klang::ar().specs(klang_spec(&[440.0, 550.0, 660.0], &[], &[])).into()],
        )
        .unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.nodes()[0].inputs.len(), 2 + 9);
    }
}
