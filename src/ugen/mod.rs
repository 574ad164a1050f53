//! UGen definitions and the expansion engine.
//!
//! Every UGen is described by a static [`UGenDef`] table entry: its name, how its rate is
//! chosen, its ordered parameters, its output arity and its flags. An instance in a user's
//! expression tree is the generic record [`UGenSource`]. The typed factory layer (see the
//! [`ugen!`](crate::ugen!) macro) only fills such records in.
//!
//! Expanding a source resolves every parameter to a slot of scalar channels, then emits
//! one node per channel of the widest slot. Narrower slots wrap around cyclically, so a
//! slot with one channel is broadcast to every replica.

pub mod conv;
mod macros;
pub mod rate_match;

use serde::Serialize;
use tracing::debug;

use crate::{
    graph::{GraphError, SynthGraphBuilder, UGenIn, UGenNode, GE},
    types::{MaybeRate, Rate},
};

/// How a parameter is turned into inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// A graph element occupying one input slot. Several channels cause multichannel
    /// expansion of the whole UGen.
    In,

    /// A graph element whose top-level members are spliced in as separate inputs, one
    /// slot each (envelope specs, spectral arrays, bus channel lists). A member with
    /// several channels causes multichannel expansion like an [`In`](ParamKind::In) slot.
    Spread,

    /// A graph element that must be a UGen with a done flag. The slot reads that UGen's
    /// done output.
    Done,

    /// A fixed integer, passed as a constant input without expansion.
    Int,

    /// A fixed string, passed as its byte count followed by one constant per byte.
    Text,

    /// A fixed integer giving the number of output channels. Not an input.
    Channels,

    /// A fixed integer stored as the node's special index. Not an input.
    Special,
}

/// One declared parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamDef {
    /// Parameter name.
    pub name: &'static str,

    /// How the parameter becomes inputs.
    pub kind: ParamKind,
}

/// How the rate of an instance is decided when the node is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaybeRule {
    /// Rate of the first input.
    FirstInput,

    /// Highest rate among the inputs, demand being the highest.
    MaxOfInputs,
}

/// Where the rate of an instance comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateSpec {
    /// Chosen by the factory method (`ar`, `kr`, ...) and persisted with the instance.
    Param,

    /// Always the same rate, not persisted.
    Fixed(Rate),

    /// Left open at construction and derived from the inputs.
    Maybe(MaybeRule),
}

/// Output arity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outputs {
    /// No outputs, the UGen only has side effects.
    Zero,

    /// A single output, used directly as a scalar element.
    One,

    /// A fixed number of outputs, grouped as a composite.
    Fixed(usize),

    /// As many outputs as the [`ParamKind::Channels`] parameter says.
    Channels,
}

/// Properties of a UGen that the graph builder has to respect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Flags {
    /// The node may not be removed even if no one reads its outputs.
    pub side_effect: bool,

    /// The node has an extra done output, readable by `Done` and friends.
    pub done_flag: bool,

    /// The node has per-instance state and may not be shared with an identical one.
    pub individual: bool,
}

impl Flags {
    /// No flags set.
    pub const NONE: Flags = Flags {
        side_effect: false,
        done_flag: false,
        individual: false,
    };
}

/// Rate promotion applied to an audio-rate instance right before emission.
///
/// Positions index the flat argument vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateMatch {
    /// Promote the input at this position.
    Single(usize),

    /// Promote every input from this position on.
    From(usize),

    /// Promote the trigger input at this position, leaving scalar inputs alone.
    Trigger(usize),
}

/// Static description of one UGen type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UGenDef {
    /// Server-side name, also the persisted type key.
    pub name: &'static str,

    /// Where the rate comes from.
    pub rate: RateSpec,

    /// Parameters in declaration order.
    pub params: &'static [ParamDef],

    /// Output arity.
    pub outputs: Outputs,

    /// Flags of every node of this type.
    pub flags: Flags,

    /// Promotions applied at audio rate.
    pub matching: &'static [RateMatch],
}

impl UGenDef {
    /// True if the rate is stored as the first persisted field.
    pub fn persists_rate(&self) -> bool {
        !matches!(self.rate, RateSpec::Fixed(_))
    }

    /// Number of persisted fields: the rate, if it is persisted, then every parameter.
    pub fn arity(&self) -> usize {
        self.params.len() + usize::from(self.persists_rate())
    }

    /// Position of a parameter by name.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }
}

/// Value bound to a parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// For [`ParamKind::In`], [`ParamKind::Spread`] and [`ParamKind::Done`].
    GE(GE),

    /// For [`ParamKind::Int`], [`ParamKind::Channels`] and [`ParamKind::Special`].
    Int(i32),

    /// For [`ParamKind::Text`].
    Text(String),
}

impl From<GE> for Arg {
    fn from(value: GE) -> Self {
        Arg::GE(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value)
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

/// One UGen instance in an expression tree: a table entry plus bound arguments.
///
/// Instances are immutable once built.
#[derive(Clone, Debug)]
pub struct UGenSource {
    def: &'static UGenDef,
    rate: MaybeRate,
    args: Vec<Arg>,
}

impl PartialEq for UGenSource {
    fn eq(&self, other: &Self) -> bool {
        self.def.name == other.def.name && self.rate == other.rate && self.args == other.args
    }
}

impl UGenSource {
    /// Bind arguments to a table entry. `args` holds one value per parameter, in
    /// declaration order.
    pub fn new(def: &'static UGenDef, rate: MaybeRate, args: Vec<Arg>) -> Self {
        debug_assert_eq!(def.params.len(), args.len(), "{}: argument count", def.name);
        let rate = match def.rate {
            RateSpec::Fixed(r) => MaybeRate::Defined(r),
            _ => rate,
        };
        UGenSource { def, rate, args }
    }

    /// Table entry.
    pub fn def(&self) -> &'static UGenDef {
        self.def
    }

    /// Rate chosen at construction.
    pub fn rate(&self) -> MaybeRate {
        self.rate
    }

    /// Arguments in declaration order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Argument bound to the named parameter.
    pub fn arg(&self, name: &str) -> Option<&Arg> {
        self.def.param_index(name).and_then(|i| self.args.get(i))
    }

    /// Special index of emitted nodes. Fails if the bound value does not fit the 16 bits
    /// the server stores it in.
    pub fn special_index(&self) -> Result<i16, GraphError> {
        let value = self.fixed_int(ParamKind::Special).unwrap_or(0);
        i16::try_from(value).map_err(|_| GraphError::SpecialIndexRange {
            ugen: self.def.name.to_owned(),
            value,
        })
    }

    /// Number of consumer-visible outputs of each emitted node.
    pub fn num_outputs(&self) -> usize {
        match self.def.outputs {
            Outputs::Zero => 0,
            Outputs::One => 1,
            Outputs::Fixed(n) => n,
            Outputs::Channels => self.fixed_int(ParamKind::Channels).unwrap_or(1).max(0) as usize,
        }
    }

    fn fixed_int(&self, kind: ParamKind) -> Option<i32> {
        self.def
            .params
            .iter()
            .zip(&self.args)
            .find_map(|(p, a)| match (p.kind == kind, a) {
                (true, Arg::Int(v)) => Some(*v),
                _ => None,
            })
    }

    /// Expand every argument and emit one node per channel of the widest slot.
    pub(crate) fn expand(&self, builder: &mut SynthGraphBuilder) -> Result<GE, GraphError> {
        let special = self.special_index()?;
        let mut slots: Vec<Vec<UGenIn>> = Vec::with_capacity(self.args.len());
        for (param, arg) in self.def.params.iter().zip(&self.args) {
            match (param.kind, arg) {
                (ParamKind::In, Arg::GE(ge)) => slots.push(ge.expand_flat(builder)?),
                (ParamKind::Spread, Arg::GE(ge)) => match ge.expand(builder)? {
                    //One slot per member, a multichannel member expands the whole UGen
                    GE::Composite(members) => {
                        for member in &members {
                            slots.push(member.expand_flat(builder)?);
                        }
                    }
                    single => slots.push(single.expand_flat(builder)?),
                },
                (ParamKind::Done, Arg::GE(ge)) => {
                    slots.push(self.done_inputs(builder, param, ge)?)
                }
                (ParamKind::Int, Arg::Int(v)) => slots.push(vec![UGenIn::Constant(*v as f32)]),
                (ParamKind::Text, Arg::Text(s)) => {
                    slots.push(vec![UGenIn::Constant(s.len() as f32)]);
                    slots.extend(s.bytes().map(|b| vec![UGenIn::Constant(f32::from(b))]));
                }
                (ParamKind::Channels | ParamKind::Special, Arg::Int(_)) => {}
                _ => {
                    return Err(GraphError::ArgumentKind {
                        ugen: self.def.name.to_owned(),
                        param: param.name,
                    })
                }
            }
        }

        if slots.iter().any(Vec::is_empty) {
            debug!(ugen = self.def.name, "an input has no channels, nothing emitted");
            return Ok(GE::empty());
        }
        let width = slots.iter().map(Vec::len).max().unwrap_or(1);
        if width == 1 {
            let args = slots.iter().map(|s| s[0]).collect();
            return self.make_ugen(builder, special, args);
        }

        debug!(ugen = self.def.name, width = width, "multichannel expansion");
        let mut replicas = Vec::with_capacity(width);
        for i in 0..width {
            let args = slots.iter().map(|s| s[i % s.len()]).collect();
            replicas.push(self.make_ugen(builder, special, args)?);
        }
        Ok(GE::Composite(replicas))
    }

    /// Done outputs of every node a done-flag parameter expands to.
    fn done_inputs(
        &self,
        builder: &mut SynthGraphBuilder,
        param: &ParamDef,
        ge: &GE,
    ) -> Result<Vec<UGenIn>, GraphError> {
        if !ge.has_done_flag() {
            return Err(GraphError::MissingDoneFlag {
                ugen: self.def.name.to_owned(),
                param: param.name,
            });
        }
        let mut inputs = Vec::new();
        collect_done(builder, ge, &mut inputs)?;
        Ok(inputs)
    }

    fn resolve_rate(&self, args: &[UGenIn]) -> Rate {
        match (self.def.rate, self.rate) {
            (_, MaybeRate::Defined(r)) => r,
            (RateSpec::Maybe(MaybeRule::MaxOfInputs), MaybeRate::Undefined) => args
                .iter()
                .fold(Rate::Scalar, |acc, input| acc.max_by_id(input.rate())),
            (_, MaybeRate::Undefined) => args.first().map_or(Rate::Scalar, UGenIn::rate),
        }
    }

    /// Emit one node from scalar arguments.
    fn make_ugen(
        &self,
        builder: &mut SynthGraphBuilder,
        special: i16,
        args: Vec<UGenIn>,
    ) -> Result<GE, GraphError> {
        let rate = self.resolve_rate(&args);
        let inputs = rate_match::apply(builder, self.def, rate, args)?;
        let refs = builder.emit(UGenNode {
            name: self.def.name.to_owned(),
            rate,
            special_index: special,
            inputs,
            outputs: vec![rate; self.num_outputs()],
            flags: self.def.flags,
        });
        Ok(match self.def.outputs {
            Outputs::One => refs.first().copied().map_or_else(GE::empty, GE::Output),
            _ => GE::Composite(refs.into_iter().map(GE::Output).collect()),
        })
    }
}

//Members are expanded one by one so that shared nodes still give one channel each
fn collect_done(
    builder: &mut SynthGraphBuilder,
    ge: &GE,
    out: &mut Vec<UGenIn>,
) -> Result<(), GraphError> {
    if let GE::Composite(members) = ge {
        for member in members {
            collect_done(builder, member, out)?;
        }
        return Ok(());
    }
    //A multi-output node appears once per output, a multichannel source once per replica
    let mut last = None;
    for input in ge.expand_flat(builder)? {
        if let UGenIn::Output(r) = input {
            if last != Some(r.node) {
                last = Some(r.node);
                out.extend(builder.done_ref(r.node).map(UGenIn::Output));
            }
        }
    }
    Ok(())
}
