//! Chaotic generators.
//!
//! Suffixes give the interpolation between iterations: `N` none, `L` linear, `C` cubic.
//! `freq` is the iteration frequency; at the sample rate every sample is a new
//! iteration.

use crate::ugen;

macro_rules! chaos_family {
    ( $( $(#[$meta:meta])* $name:ident ),+ => $inputs:tt ) => {
        $(
            ugen! {
                $(#[$meta])*
                $name {
                    rate: [ar],
                    outputs: one,
                    inputs: $inputs
                }
            }
        )+
    };
}

chaos_family! {
    /// Lorenz attractor, x coordinate, linear interpolation.
    LorenzL
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Prandtl number.
        s: ge = 10,
        /// Rayleigh number.
        r: ge = 28,
        /// Geometry factor.
        b: ge = 2.667,
        /// Integration time step.
        h: ge = 0.05,
        /// Initial x.
        xi: ge = 0.1,
        /// Initial y.
        yi: ge = 0,
        /// Initial z.
        zi: ge = 0
    }
}

chaos_family! {
    /// Hénon map, no interpolation.
    HenonN,
    /// Hénon map, linear interpolation.
    HenonL,
    /// Hénon map, cubic interpolation.
    HenonC
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Parameter a.
        a: ge = 1.4,
        /// Parameter b.
        b: ge = 0.3,
        /// Initial value of x.
        x0: ge = 0,
        /// Second initial value of x.
        x1: ge = 0
    }
}

chaos_family! {
    /// Gingerbreadman map, no interpolation.
    GbmanN,
    /// Gingerbreadman map, linear interpolation.
    GbmanL
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Initial x.
        xi: ge = 1.2,
        /// Initial y.
        yi: ge = 2.1
    }
}

chaos_family! {
    /// Standard map, no interpolation.
    StandardN,
    /// Standard map, linear interpolation.
    StandardL
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Perturbation amount.
        k: ge = 1,
        /// Initial x.
        xi: ge = 0.5,
        /// Initial y.
        yi: ge = 0
    }
}

chaos_family! {
    /// Cusp map, no interpolation.
    CuspN,
    /// Cusp map, linear interpolation.
    CuspL
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Parameter a.
        a: ge = 1,
        /// Parameter b.
        b: ge = 1.9,
        /// Initial x.
        xi: ge = 0
    }
}

chaos_family! {
    /// General quadratic map, no interpolation.
    QuadN,
    /// General quadratic map, linear interpolation.
    QuadL,
    /// General quadratic map, cubic interpolation.
    QuadC
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Parameter a.
        a: ge = 1,
        /// Parameter b.
        b: ge = -1,
        /// Parameter c.
        c: ge = -0.75,
        /// Initial x.
        xi: ge = 0
    }
}

chaos_family! {
    /// Linear congruential generator, no interpolation.
    LinCongN,
    /// Linear congruential generator, linear interpolation.
    LinCongL,
    /// Linear congruential generator, cubic interpolation.
    LinCongC
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Multiplier.
        a: ge = 1.1,
        /// Increment.
        c: ge = 0.13,
        /// Modulus.
        m: ge = 1,
        /// Initial x.
        xi: ge = 0
    }
}

chaos_family! {
    /// Latoocarfian map, no interpolation.
    LatoocarfianN,
    /// Latoocarfian map, linear interpolation.
    LatoocarfianL,
    /// Latoocarfian map, cubic interpolation.
    LatoocarfianC
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Parameter a.
        a: ge = 1,
        /// Parameter b.
        b: ge = 3,
        /// Parameter c.
        c: ge = 0.5,
        /// Parameter d.
        d: ge = 0.5,
        /// Initial x.
        xi: ge = 0.5,
        /// Initial y.
        yi: ge = 0.5
    }
}

chaos_family! {
    /// Feedback sine with chaotic phase indexing, no interpolation.
    FBSineN,
    /// Feedback sine with chaotic phase indexing, linear interpolation.
    FBSineL,
    /// Feedback sine with chaotic phase indexing, cubic interpolation.
    FBSineC
    => {
        /// Iteration frequency in Hz.
        freq: ge = 22050,
        /// Index multiplier.
        im: ge = 1,
        /// Feedback amount.
        fb: ge = 0.1,
        /// Phase multiplier.
        a: ge = 1.1,
        /// Phase increment.
        c: ge = 0.5,
        /// Initial x.
        xi: ge = 0.1,
        /// Initial y.
        yi: ge = 0.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_share_parameters() {
        assert_eq!(HenonN::def().params, HenonC::def().params);
        assert_eq!(LorenzL::def().arity(), 9);
        assert_ne!(QuadN::def().name, QuadL::def().name);
    }

    #[test]
    fn parameters_keep_declared_order() {
        let names: Vec<_> = LatoocarfianC::def().params.iter().map(|p| p.name).collect();
        assert_eq!(names, ["freq", "a", "b", "c", "d", "xi", "yi"]);
    }
}
