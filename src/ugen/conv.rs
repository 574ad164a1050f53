//! Rate conversion and operator UGens.
//!
//! These are part of the core because rate matching and the arithmetic operators on
//! [`GE`](crate::graph::GE) emit them directly.

use crate::ugen;

ugen! {
    /// Control to audio rate converter, interpolating linearly over one block.
    K2A {
        rate: ar,
        outputs: one,
        inputs: {
            /// Signal to convert.
            input: ge = 0
        }
    }
}

ugen! {
    /// Control rate trigger to audio rate trigger. A non-positive to positive transition
    /// becomes a single-sample impulse.
    T2A {
        rate: ar,
        outputs: one,
        inputs: {
            /// Trigger to convert.
            input: ge = 0,
            /// Sample offset of the impulse within the block.
            offset: ge = 0
        }
    }
}

ugen! {
    /// Constant signal, used to lift a scalar to control rate.
    DC {
        rate: [kr, ar],
        outputs: one,
        inputs: {
            /// Value to output.
            input: ge = 0
        }
    }
}

ugen! {
    /// Binary operator. The operator is stored as the special index.
    BinaryOpUGen {
        rate: maybe_max,
        outputs: one,
        inputs: {
            /// Operator, see [`BinaryOp`].
            op: special = 0,
            /// Left operand.
            a: ge = 0,
            /// Right operand.
            b: ge = 0
        }
    }
}

ugen! {
    /// Unary operator. The operator is stored as the special index.
    UnaryOpUGen {
        rate: maybe_max,
        outputs: one,
        inputs: {
            /// Operator, see [`UnaryOp`].
            op: special = 0,
            /// Operand.
            a: ge = 0
        }
    }
}

/// Selectors of [`BinaryOpUGen`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum BinaryOp {
    #[allow(missing_docs)]
    Plus = 0,
    #[allow(missing_docs)]
    Minus = 1,
    #[allow(missing_docs)]
    Times = 2,
    /// Float division.
    Div = 4,
    #[allow(missing_docs)]
    Mod = 5,
    #[allow(missing_docs)]
    Min = 12,
    #[allow(missing_docs)]
    Max = 13,
    #[allow(missing_docs)]
    Pow = 25,
}

/// Selectors of [`UnaryOpUGen`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum UnaryOp {
    #[allow(missing_docs)]
    Neg = 0,
    #[allow(missing_docs)]
    Abs = 5,
    #[allow(missing_docs)]
    Squared = 12,
    #[allow(missing_docs)]
    Sqrt = 14,
    /// Midi note to frequency.
    MidiCps = 17,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GraphConfig,
        graph::{SynthGraph, GE},
        types::Rate,
        ugen::RateSpec,
    };

    #[test]
    fn conversions_have_fixed_rates() {
        assert_eq!(K2A::def().rate, RateSpec::Fixed(Rate::Audio));
        assert_eq!(T2A::def().arity(), 2);
        assert_eq!(DC::def().arity(), 2);
    }

    #[test]
    fn operator_index_is_not_an_input() {
        let ge = GE::from(-1.5).madd(2, 0.5);
        let graph = SynthGraph::build(GraphConfig::default(), &[ge]).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes()[0].special_index, BinaryOp::Times as i16);
        assert_eq!(graph.nodes()[1].special_index, BinaryOp::Plus as i16);
        assert_eq!(graph.nodes()[0].inputs.len(), 2);
    }

    #[test]
    fn negation() {
        let GE::Source(src) = -GE::Constant(1.0) else {
            panic!("negation did not build a source")
        };
        let expected = UnaryOpUGen::new().a(1.0).op(UnaryOp::Neg as i32).into_source();
        assert_eq!(*src, expected);
    }
}
