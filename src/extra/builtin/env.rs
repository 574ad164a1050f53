//! Envelopes, lines and done-flag consumers.

use crate::{graph::GE, ugen};

ugen! {
    /// Line from one value to another.
    Line {
        rate: [ar, kr],
        outputs: one,
        flags: [done_flag],
        inputs: {
            /// Starting value.
            start: ge = 0,
            /// Ending value.
            end: ge = 1,
            /// Duration in seconds.
            dur: ge = 1,
            /// Action taken when the line ends.
            done_action: ge = 0
        }
    }
}

ugen! {
    /// Exponential curve from one value to another.
    ///
    /// `start` and `end` must be non-zero and have the same sign. This is not checked, a
    /// line crossing zero is emitted as written.
    XLine {
        rate: [ar, kr],
        outputs: one,
        flags: [done_flag],
        inputs: {
            /// Starting value.
            start: ge = 1,
            /// Ending value.
            end: ge = 2,
            /// Duration in seconds.
            dur: ge = 1,
            /// Action taken when the line ends.
            done_action: ge = 0
        }
    }
}

ugen! {
    /// Envelope generator. The breakpoints come from an [`Env`].
    EnvGen {
        rate: [ar, kr],
        outputs: one,
        flags: [done_flag],
        inputs: {
            /// Gate. A transition to a positive value starts the envelope, to zero
            /// releases it.
            gate: ge = 1,
            /// Scale factor of every level.
            level_scale: ge = 1,
            /// Offset added to every level.
            level_bias: ge = 0,
            /// Scale factor of every duration.
            time_scale: ge = 1,
            /// Action taken when the envelope ends.
            done_action: ge = 0,
            /// Flattened envelope.
            envelope: spread = Env::default()
        }
    }
}

ugen! {
    /// Trapezoid envelope.
    Linen {
        rate: kr,
        outputs: one,
        flags: [done_flag],
        inputs: {
            /// Gate.
            gate: ge = 1,
            /// Attack time in seconds.
            attack_time: ge = 0.01,
            /// Sustain level.
            sus_level: ge = 1,
            /// Release time in seconds.
            release_time: ge = 1,
            /// Action taken when the envelope ends.
            done_action: ge = 0
        }
    }
}

ugen! {
    /// Outputs 1 once the source has finished, 0 before.
    Done {
        rate: kr,
        outputs: one,
        inputs: {
            /// UGen with a done flag.
            src: done = GE::empty()
        }
    }
}

ugen! {
    /// Frees the enclosing synth once the source has finished.
    FreeSelfWhenDone {
        rate: kr,
        outputs: one,
        flags: [side_effect],
        inputs: {
            /// UGen with a done flag.
            src: done = GE::empty()
        }
    }
}

ugen! {
    /// Pauses the enclosing synth once the source has finished.
    PauseSelfWhenDone {
        rate: kr,
        outputs: one,
        flags: [side_effect],
        inputs: {
            /// UGen with a done flag.
            src: done = GE::empty()
        }
    }
}

ugen! {
    /// Frees the enclosing synth on a trigger.
    FreeSelf {
        rate: kr,
        outputs: one,
        flags: [side_effect],
        inputs: {
            /// Trigger.
            trig: ge = 0
        }
    }
}

/// Shape of one envelope segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    /// Jump to the end value at the start of the segment.
    Step,
    /// Straight line.
    Lin,
    /// Exponential. Levels may not cross or touch zero.
    Exp,
    /// Half sine.
    Sine,
    /// Quarter sine.
    Welch,
    /// Curvature value. Positive bends towards the end, negative towards the start.
    Parametric(f32),
    /// Squared.
    Squared,
    /// Cubed.
    Cubed,
    /// Keep the start value until the end of the segment.
    Hold,
}

impl Curve {
    fn shape(self) -> f32 {
        match self {
            Curve::Step => 0.0,
            Curve::Lin => 1.0,
            Curve::Exp => 2.0,
            Curve::Sine => 3.0,
            Curve::Welch => 4.0,
            Curve::Parametric(_) => 5.0,
            Curve::Squared => 6.0,
            Curve::Cubed => 7.0,
            Curve::Hold => 8.0,
        }
    }

    fn value(self) -> f32 {
        match self {
            Curve::Parametric(v) => v,
            _ => 0.0,
        }
    }
}

/// Breakpoint envelope for [`EnvGen`].
///
/// Flattens to the level of the first breakpoint, the segment count, the release and
/// loop nodes (-99 for none) and then four values per segment: target level, duration,
/// curve shape and curve value.
#[derive(Clone, Debug, PartialEq)]
pub struct Env {
    levels: Vec<GE>,
    times: Vec<GE>,
    curves: Vec<Curve>,
    release_node: Option<usize>,
    loop_node: Option<usize>,
}

impl Default for Env {
    fn default() -> Self {
        Env::new([0.0, 1.0, 1.0, 0.0], [0.01, 1.0, 1.0], [Curve::Lin])
    }
}

impl Env {
    /// Envelope through `levels`, with `times[i]` seconds between level `i` and `i + 1`.
    /// Curves wrap around if there are fewer curves than segments.
    pub fn new<L: Into<GE>, T: Into<GE>>(
        levels: impl IntoIterator<Item = L>,
        times: impl IntoIterator<Item = T>,
        curves: impl IntoIterator<Item = Curve>,
    ) -> Self {
        Env {
            levels: levels.into_iter().map(Into::into).collect(),
            times: times.into_iter().map(Into::into).collect(),
            curves: curves.into_iter().collect(),
            release_node: None,
            loop_node: None,
        }
    }

    /// Attack and decay, no sustain.
    pub fn perc(attack: impl Into<GE>, release: impl Into<GE>, level: impl Into<GE>, curve: f32) -> Self {
        let times: [GE; 2] = [attack.into(), release.into()];
        Env::new(
            [GE::from(0), level.into(), GE::from(0)],
            times,
            [Curve::Parametric(curve)],
        )
    }

    /// Attack to `level`, held until the gate closes, then release.
    pub fn asr(attack: impl Into<GE>, level: impl Into<GE>, release: impl Into<GE>, curve: f32) -> Self {
        let times: [GE; 2] = [attack.into(), release.into()];
        Env::new(
            [GE::from(0), level.into(), GE::from(0)],
            times,
            [Curve::Parametric(curve)],
        )
        .with_release_node(1)
    }

    /// Attack, decay to `sustain * peak`, held until the gate closes, then release.
    pub fn adsr(
        attack: impl Into<GE>,
        decay: impl Into<GE>,
        sustain: impl Into<GE>,
        release: impl Into<GE>,
        peak: impl Into<GE>,
        curve: f32,
    ) -> Self {
        let peak: GE = peak.into();
        let times: [GE; 3] = [attack.into(), decay.into(), release.into()];
        Env::new(
            [GE::from(0), peak.clone(), peak * sustain, GE::from(0)],
            times,
            [Curve::Parametric(curve)],
        )
        .with_release_node(2)
    }

    /// Attack, fixed sustain and release.
    pub fn linen(attack: impl Into<GE>, sustain: impl Into<GE>, release: impl Into<GE>, level: impl Into<GE>) -> Self {
        let level: GE = level.into();
        let times: [GE; 3] = [attack.into(), sustain.into(), release.into()];
        Env::new([GE::from(0), level.clone(), level, GE::from(0)], times, [Curve::Lin])
    }

    /// Hold at this breakpoint until the gate closes.
    pub fn with_release_node(mut self, node: usize) -> Self {
        self.release_node = Some(node);
        self
    }

    /// Jump back to this breakpoint when reaching the release node.
    pub fn with_loop_node(mut self, node: usize) -> Self {
        self.loop_node = Some(node);
        self
    }

    /// Number of segments.
    pub fn segments(&self) -> usize {
        self.levels.len().saturating_sub(1).min(self.times.len())
    }
}

impl From<Env> for GE {
    fn from(env: Env) -> GE {
        let node = |n: Option<usize>| n.map_or(GE::from(-99), |n| GE::from(n as i32));
        let segments = env.segments();
        let mut items = Vec::with_capacity(4 + 4 * segments);
        items.push(env.levels.first().cloned().unwrap_or(GE::Constant(0.0)));
        items.push(GE::from(segments as i32));
        items.push(node(env.release_node));
        items.push(node(env.loop_node));
        for i in 0..segments {
            let curve = match env.curves.len() {
                0 => Curve::Lin,
                n => env.curves[i % n],
            };
            items.push(env.levels[i + 1].clone());
            items.push(env.times[i].clone());
            items.push(GE::from(curve.shape()));
            items.push(GE::from(curve.value()));
        }
        GE::Composite(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GraphConfig,
        graph::{SynthGraph, UGenIn},
    };

    fn constants(ge: GE) -> Vec<f32> {
        ge.outputs()
            .unwrap()
            .into_iter()
            .map(|i| match i {
                UGenIn::Constant(c) => c,
                UGenIn::Output(_) => panic!("constant expected"),
            })
            .collect()
    }

    #[test]
    fn perc_flattens() {
        let env = Env::perc(0.01, 1, 1, -4.0);
        assert_eq!(
            constants(env.into()),
            vec![0.0, 2.0, -99.0, -99.0, 1.0, 0.01, 5.0, -4.0, 0.0, 1.0, 5.0, -4.0]
        );
    }

    #[test]
    fn curves_wrap_around_segments() {
        let env = Env::new([0.0, 1.0, 0.5, 0.0], [1.0, 2.0, 3.0], [Curve::Step, Curve::Exp])
            .with_release_node(2)
            .with_loop_node(0);
        let flat = constants(env.into());
        assert_eq!(&flat[..4], &[0.0, 3.0, 2.0, 0.0]);
        let shapes: Vec<f32> = flat[4..].chunks(4).map(|s| s[2]).collect();
        assert_eq!(shapes, vec![0.0, 2.0, 0.0]);
    }

    #[test]
    fn envgen_splices_its_envelope() {
        let env = EnvGen::kr().envelope(Env::asr(0.1, 1, 0.5, -4.0)).done_action(2);
        let graph = SynthGraph::build(GraphConfig::default(), &[env.into()]).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.nodes()[0].inputs.len(), 5 + 4 + 2 * 4);
        assert_eq!(graph.nodes()[0].done_output(), Some(1));
    }

    #[test]
    fn multichannel_level_expands_envgen() {
        let env = Env::new([GE::from(0), GE::seq([1.0, 2.0]), GE::from(0)], [1, 1], [Curve::Lin]);
        let graph = SynthGraph::build(GraphConfig::default(), &[EnvGen::kr().envelope(env).into()]).unwrap();
        assert_eq!(graph.len(), 2);
        for (node, level) in graph.nodes().iter().zip([1.0, 2.0]) {
            //Five plain inputs, four header values, four values per segment
            assert_eq!(node.inputs.len(), 5 + 4 + 2 * 4);
            assert_eq!(node.inputs[6], UGenIn::Constant(2.0));
            assert_eq!(node.inputs[9], UGenIn::Constant(level));
            assert_eq!(node.inputs[10], UGenIn::Constant(1.0));
        }
    }

    #[test]
    fn adsr_sustain_is_relative_to_peak() {
        let env: GE = Env::adsr(0.01, 0.3, 0.5, 1, 1, -4.0).into();
        let graph = SynthGraph::build(GraphConfig::default(), &[env]).unwrap();
        //peak * sustain
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.nodes()[0].name, "BinaryOpUGen");
    }

    #[test]
    fn xline_accepts_a_sign_change() {
        let line = XLine::kr().start(-1).end(1);
        let graph = SynthGraph::build(GraphConfig::default(), &[line.into()]).unwrap();
        assert_eq!(graph.nodes()[0].inputs[0], UGenIn::Constant(-1.0));
        assert_eq!(graph.nodes()[0].inputs[1], UGenIn::Constant(1.0));
    }

    #[test]
    fn free_self_when_done_reads_done_output() {
        let graph = SynthGraph::build(
            GraphConfig::default(),
            &[FreeSelfWhenDone::kr().src(Line::kr()).into()],
        )
        .unwrap();
        assert!(graph.nodes()[1].flags.side_effect);
        assert_eq!(graph.nodes()[1].inputs[0].rate(), crate::types::Rate::Control);
    }
}
