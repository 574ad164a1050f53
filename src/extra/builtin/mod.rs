//! Catalog of ready-made UGens.
//!
//! Every UGen here is a [`ugen!`](crate::ugen!) declaration, so adding one only takes a
//! parameter list. [`defs()`] lists all table entries, which is what
//! [`UGenRegistry::builtin()`](crate::serial::UGenRegistry::builtin()) registers.

mod buffer;
mod chaos;
mod demand;
mod env;
mod filter;
mod io;
mod noise;
mod osc;
mod pan;
mod trig;

pub use buffer::*;
pub use chaos::*;
pub use demand::*;
pub use env::*;
pub use filter::*;
pub use io::*;
pub use noise::*;
pub use osc::*;
pub use pan::*;
pub use trig::*;

use crate::ugen::UGenDef;

/// Table entries of the whole catalog.
pub fn defs() -> Vec<&'static UGenDef> {
    vec![
        //osc
        SinOsc::def(),
        FSinOsc::def(),
        SinOscFB::def(),
        Saw::def(),
        Pulse::def(),
        Blip::def(),
        LFSaw::def(),
        LFPulse::def(),
        LFTri::def(),
        LFCub::def(),
        VarSaw::def(),
        Impulse::def(),
        Osc::def(),
        Klang::def(),
        Klank::def(),
        //env
        Line::def(),
        XLine::def(),
        EnvGen::def(),
        Linen::def(),
        Done::def(),
        FreeSelfWhenDone::def(),
        PauseSelfWhenDone::def(),
        FreeSelf::def(),
        //pan
        Pan2::def(),
        LinPan2::def(),
        Balance2::def(),
        Pan4::def(),
        PanAz::def(),
        XFade2::def(),
        LinXFade2::def(),
        //trig
        Trig::def(),
        Trig1::def(),
        TDelay::def(),
        Latch::def(),
        Gate::def(),
        PulseCount::def(),
        Stepper::def(),
        ToggleFF::def(),
        SetResetFF::def(),
        Timer::def(),
        Sweep::def(),
        Phasor::def(),
        SendTrig::def(),
        SendReply::def(),
        Poll::def(),
        Free::def(),
        //chaos
        LorenzL::def(),
        HenonN::def(),
        HenonL::def(),
        HenonC::def(),
        GbmanN::def(),
        GbmanL::def(),
        StandardN::def(),
        StandardL::def(),
        CuspN::def(),
        CuspL::def(),
        QuadN::def(),
        QuadL::def(),
        QuadC::def(),
        LinCongN::def(),
        LinCongL::def(),
        LinCongC::def(),
        LatoocarfianN::def(),
        LatoocarfianL::def(),
        LatoocarfianC::def(),
        FBSineN::def(),
        FBSineL::def(),
        FBSineC::def(),
        //buffer
        PlayBuf::def(),
        BufRd::def(),
        BufWr::def(),
        RecordBuf::def(),
        Index::def(),
        IndexL::def(),
        WrapIndex::def(),
        FoldIndex::def(),
        IndexInBetween::def(),
        DetectIndex::def(),
        BufFrames::def(),
        BufDur::def(),
        BufSampleRate::def(),
        BufRateScale::def(),
        BufChannels::def(),
        LocalBuf::def(),
        DiskOut::def(),
        //io
        Out::def(),
        ReplaceOut::def(),
        OffsetOut::def(),
        XOut::def(),
        In::def(),
        InFeedback::def(),
        LocalIn::def(),
        LocalOut::def(),
        //noise
        WhiteNoise::def(),
        PinkNoise::def(),
        BrownNoise::def(),
        ClipNoise::def(),
        GrayNoise::def(),
        Dust::def(),
        Dust2::def(),
        Crackle::def(),
        LFNoise0::def(),
        LFNoise1::def(),
        LFNoise2::def(),
        Rand::def(),
        IRand::def(),
        ExpRand::def(),
        TRand::def(),
        CoinGate::def(),
        //demand
        Dseq::def(),
        Dwhite::def(),
        Dseries::def(),
        Duty::def(),
        Demand::def(),
        //filter
        LPF::def(),
        HPF::def(),
        BPF::def(),
        BRF::def(),
        RLPF::def(),
        RHPF::def(),
        Resonz::def(),
        Lag::def(),
        Lag2::def(),
        Decay::def(),
        Decay2::def(),
        Integrator::def(),
        LeakDC::def(),
        Clip::def(),
        Wrap::def(),
        Fold::def(),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ugen::{Outputs, ParamKind, RateSpec};

    #[test]
    fn names_are_unique() {
        let all = defs();
        let names: HashSet<_> = all.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn channel_outputs_declare_a_count() {
        for def in defs() {
            let has_count = def.params.iter().any(|p| p.kind == ParamKind::Channels);
            assert_eq!(def.outputs == Outputs::Channels, has_count, "{}", def.name);
        }
    }

    #[test]
    fn matching_positions_are_inputs() {
        for def in defs() {
            let inputs = def
                .params
                .iter()
                .filter(|p| !matches!(p.kind, ParamKind::Channels | ParamKind::Special))
                .count();
            for m in def.matching {
                let (crate::ugen::RateMatch::Single(pos)
                | crate::ugen::RateMatch::From(pos)
                | crate::ugen::RateMatch::Trigger(pos)) = *m;
                assert!(pos < inputs, "{}", def.name);
            }
        }
    }

    #[test]
    fn demand_generators_have_fixed_rate() {
        for def in [Dseq::def(), Dwhite::def(), Dseries::def()] {
            assert_eq!(def.rate, RateSpec::Fixed(crate::types::Rate::Demand));
            assert!(def.flags.individual);
        }
    }
}
