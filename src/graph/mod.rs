//! Graph elements - the expression type user code builds synth graphs from.
//!
//! A [`GE`] stands for zero or more signal channels. Constants and output references are
//! already scalar, a composite groups channels side by side, and a source is a UGen
//! definition that still has to be expanded. Expansion happens against a
//! [`SynthGraphBuilder`], which owns the list of emitted nodes.

pub mod builder;

use std::{ops, rc::Rc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    types::Rate,
    ugen::{conv, UGenSource},
};
pub use builder::{SynthGraph, SynthGraphBuilder, UGenNode};

/// Errors that can be encountered while expanding a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An input does not meet the rate required at a matched position and cannot be
    /// promoted. Only raised when strict rate checking is enabled.
    #[error("{ugen}: input {position} runs at {found} rate, {required} rate is required")]
    RateMismatch {
        /// Name of the UGen being emitted.
        ugen: String,
        /// Position in the flat argument vector.
        position: usize,
        /// Rate of the offending input.
        found: Rate,
        /// Rate the position requires.
        required: Rate,
    },

    /// A parameter that reads the done flag of another UGen is bound to something
    /// without a done flag.
    #[error("{ugen}: parameter `{param}` needs a UGen with a done flag")]
    MissingDoneFlag {
        /// Name of the UGen being expanded.
        ugen: String,
        /// Name of the parameter.
        param: &'static str,
    },

    /// An operator id does not fit into a special index.
    #[error("{ugen}: special index {value} is out of range")]
    SpecialIndexRange {
        /// Name of the UGen being expanded.
        ugen: String,
        /// Value bound to the parameter.
        value: i32,
    },

    /// An argument value does not fit the kind its parameter is declared with.
    #[error("{ugen}: parameter `{param}` got a value of the wrong kind")]
    ArgumentKind {
        /// Name of the UGen being expanded.
        ugen: String,
        /// Name of the parameter.
        param: &'static str,
    },
}

/// Reference to one output channel of an emitted node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UGenOutRef {
    /// Index of the producing node in emission order.
    pub node: usize,

    /// Output channel of the producing node.
    pub index: usize,

    /// Rate of that output.
    pub rate: Rate,
}

/// A scalar input of an emitted node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UGenIn {
    /// Literal value.
    Constant(f32),

    /// Output of an earlier node.
    Output(UGenOutRef),
}

impl UGenIn {
    /// Rate of the input. Constants count as scalar rate.
    pub fn rate(&self) -> Rate {
        match self {
            UGenIn::Constant(_) => Rate::Scalar,
            UGenIn::Output(r) => r.rate,
        }
    }
}

/// Graph element.
///
/// Expansion turns every variant into constants, output references and composites of
/// those; see [`GE::expand()`].
#[derive(Clone, Debug, PartialEq)]
pub enum GE {
    /// Literal value, adopts the rate of whatever consumes it.
    Constant(f32),

    /// Output of a node that has already been emitted.
    Output(UGenOutRef),

    /// Channels side by side. The channel count is the sum of the members' counts.
    Composite(Vec<GE>),

    /// UGen definition awaiting expansion.
    ///
    /// The same `Rc` appearing several times in one graph is expanded only once.
    Source(Rc<UGenSource>),

    /// One channel of another element. The index wraps around the channel count.
    Channel(Box<GE>, usize),
}

impl GE {
    /// Element with no channels.
    pub fn empty() -> GE {
        GE::Composite(Vec::new())
    }

    /// Group several elements into a multichannel element.
    ///
    /// ```
    /// # use ugengraph::graph::GE;
    /// let ge = GE::seq([220.0, 330.0, 440.0]);
    /// assert_eq!(ge, GE::Composite(vec![GE::Constant(220.0), GE::Constant(330.0), GE::Constant(440.0)]));
    /// ```
    pub fn seq<T: Into<GE>>(items: impl IntoIterator<Item = T>) -> GE {
        GE::Composite(items.into_iter().map(Into::into).collect())
    }

    /// Select one channel.
    pub fn channel(self, index: usize) -> GE {
        GE::Channel(Box::new(self), index)
    }

    /// `self * mul + add`.
    pub fn madd(self, mul: impl Into<GE>, add: impl Into<GE>) -> GE {
        self * mul + add
    }

    /// True if this element is a UGen definition with a done flag, or a composite made
    /// only of such definitions.
    pub fn has_done_flag(&self) -> bool {
        match self {
            GE::Source(src) => src.def().flags.done_flag,
            GE::Composite(items) => !items.is_empty() && items.iter().all(GE::has_done_flag),
            _ => false,
        }
    }

    /// Expand into an element made only of constants, output references and composites,
    /// emitting nodes into `builder` on the way.
    ///
    /// Expansion is depth first, in argument declaration order, so emission order follows
    /// the shape of the expression tree.
    ///
    /// ```
    /// # use ugengraph::{config::GraphConfig, graph::{GE, SynthGraphBuilder}, extra::builtin::SinOsc};
    /// let mut builder = SynthGraphBuilder::new(GraphConfig::default());
    /// let out = builder.expand(&SinOsc::ar().freq(GE::seq([440.0, 660.0])).into()).unwrap();
    /// assert_eq!(out.outputs().unwrap().len(), 2);
    /// assert_eq!(builder.finish().len(), 2);
    /// ```
    pub fn expand(&self, builder: &mut SynthGraphBuilder) -> Result<GE, GraphError> {
        match self {
            GE::Constant(_) | GE::Output(_) => Ok(self.clone()),
            GE::Composite(items) => Ok(GE::Composite(
                items
                    .iter()
                    .map(|g| g.expand(builder))
                    .collect::<Result<_, _>>()?,
            )),
            GE::Source(src) => builder.visit(src),
            GE::Channel(..) => {
                let flat = self.expand_flat(builder)?;
                Ok(match flat.first() {
                    Some(input) => GE::from(*input),
                    None => GE::empty(),
                })
            }
        }
    }

    /// Expand and flatten into scalar inputs.
    pub(crate) fn expand_flat(
        &self,
        builder: &mut SynthGraphBuilder,
    ) -> Result<Vec<UGenIn>, GraphError> {
        let mut out = Vec::new();
        self.expand_into(builder, &mut out)?;
        Ok(out)
    }

    fn expand_into(
        &self,
        builder: &mut SynthGraphBuilder,
        out: &mut Vec<UGenIn>,
    ) -> Result<(), GraphError> {
        match self {
            GE::Constant(c) => out.push(UGenIn::Constant(*c)),
            GE::Output(r) => out.push(UGenIn::Output(*r)),
            GE::Composite(items) => {
                for item in items {
                    item.expand_into(builder, out)?;
                }
            }
            GE::Source(src) => builder.visit(src)?.expand_into(builder, out)?,
            GE::Channel(inner, index) => {
                let flat = inner.expand_flat(builder)?;
                if !flat.is_empty() {
                    out.push(flat[index % flat.len()]);
                }
            }
        }
        Ok(())
    }

    /// Flat list of scalar inputs of an expanded element.
    ///
    /// Returns `None` if the element still contains sources or channel selections.
    pub fn outputs(&self) -> Option<Vec<UGenIn>> {
        fn collect(ge: &GE, out: &mut Vec<UGenIn>) -> Option<()> {
            match ge {
                GE::Constant(c) => out.push(UGenIn::Constant(*c)),
                GE::Output(r) => out.push(UGenIn::Output(*r)),
                GE::Composite(items) => {
                    for item in items {
                        collect(item, out)?;
                    }
                }
                GE::Source(_) | GE::Channel(..) => return None,
            }
            Some(())
        }
        let mut out = Vec::new();
        collect(self, &mut out).map(|_| out)
    }
}

impl From<f32> for GE {
    fn from(value: f32) -> Self {
        GE::Constant(value)
    }
}

impl From<f64> for GE {
    fn from(value: f64) -> Self {
        GE::Constant(value as f32)
    }
}

impl From<i32> for GE {
    fn from(value: i32) -> Self {
        GE::Constant(value as f32)
    }
}

impl From<UGenOutRef> for GE {
    fn from(value: UGenOutRef) -> Self {
        GE::Output(value)
    }
}

impl From<UGenIn> for GE {
    fn from(value: UGenIn) -> Self {
        match value {
            UGenIn::Constant(c) => GE::Constant(c),
            UGenIn::Output(r) => GE::Output(r),
        }
    }
}

impl From<Vec<GE>> for GE {
    fn from(value: Vec<GE>) -> Self {
        GE::Composite(value)
    }
}

impl From<UGenSource> for GE {
    fn from(value: UGenSource) -> Self {
        GE::Source(Rc::new(value))
    }
}

macro_rules! ge_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<T: Into<GE>> ops::$trait<T> for GE {
            type Output = GE;

            fn $method(self, rhs: T) -> GE {
                conv::BinaryOpUGen::new()
                    .op($op as i32)
                    .a(self)
                    .b(rhs)
                    .into()
            }
        }
    };
}

ge_binary_op!(Add, add, conv::BinaryOp::Plus);
ge_binary_op!(Sub, sub, conv::BinaryOp::Minus);
ge_binary_op!(Mul, mul, conv::BinaryOp::Times);
ge_binary_op!(Div, div, conv::BinaryOp::Div);

impl ops::Neg for GE {
    type Output = GE;

    fn neg(self) -> GE {
        conv::UnaryOpUGen::new()
            .op(conv::UnaryOp::Neg as i32)
            .a(self)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GraphConfig, ugen::conv::BinaryOp};

    fn builder() -> SynthGraphBuilder {
        SynthGraphBuilder::new(GraphConfig::default())
    }

    #[test]
    fn constants_and_refs_expand_to_themselves() {
        let mut b = builder();
        let r = UGenOutRef {
            node: 3,
            index: 1,
            rate: Rate::Audio,
        };
        assert_eq!(GE::Constant(2.0).expand(&mut b).unwrap(), GE::Constant(2.0));
        assert_eq!(GE::Output(r).expand(&mut b).unwrap(), GE::Output(r));
        assert!(b.finish().is_empty());
    }

    #[test]
    fn composite_flattens_in_order() {
        let mut b = builder();
        let ge = GE::seq([GE::Constant(1.0), GE::seq([2.0, 3.0]), GE::empty(), 4.0.into()]);
        let flat = ge.expand_flat(&mut b).unwrap();
        assert_eq!(
            flat,
            vec![
                UGenIn::Constant(1.0),
                UGenIn::Constant(2.0),
                UGenIn::Constant(3.0),
                UGenIn::Constant(4.0)
            ]
        );
    }

    #[test]
    fn channel_selection_wraps() {
        let mut b = builder();
        let ge = GE::seq([1.0, 2.0, 3.0]).channel(4);
        assert_eq!(ge.expand(&mut b).unwrap(), GE::Constant(2.0));
        assert_eq!(GE::empty().channel(1).expand(&mut b).unwrap(), GE::empty());
    }

    #[test]
    fn outputs_refuse_unexpanded() {
        let ge = GE::seq([GE::Constant(1.0), GE::Constant(2.0).channel(0)]);
        assert!(ge.outputs().is_none());
        assert_eq!(
            GE::seq([1.0, 2.0]).outputs(),
            Some(vec![UGenIn::Constant(1.0), UGenIn::Constant(2.0)])
        );
    }

    #[test]
    fn arithmetic_builds_operator_ugens() {
        let ge = GE::Constant(1.0) * 2.0;
        let GE::Source(src) = &ge else {
            panic!("multiplication did not build a source")
        };
        assert_eq!(src.def().name, "BinaryOpUGen");
        assert_eq!(src.special_index(), Ok(BinaryOp::Times as i16));

        let mut b = builder();
        let out = ge.expand(&mut b).unwrap();
        let graph = b.finish();
        assert_eq!(graph.len(), 1);
        //Constant inputs keep the operator at scalar rate
        assert_eq!(graph.nodes()[0].rate, Rate::Scalar);
        assert_eq!(
            out,
            GE::Output(UGenOutRef {
                node: 0,
                index: 0,
                rate: Rate::Scalar
            })
        );
    }

    #[test]
    fn done_flag_detection() {
        use crate::extra::builtin::{Line, SinOsc};
        assert!(GE::from(Line::kr()).has_done_flag());
        assert!(!GE::from(SinOsc::ar()).has_done_flag());
        assert!(GE::seq([Line::kr(), Line::ar()]).has_done_flag());
        assert!(!GE::empty().has_done_flag());
        assert!(!GE::Constant(1.0).has_done_flag());
    }
}
