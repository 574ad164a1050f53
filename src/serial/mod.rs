//! Binary persistence of unexpanded graph elements.
//!
//! Values are written with a one byte tag and a big-endian payload. A UGen instance is a
//! product: its type key, the number of fields that follow, and the fields in the order
//! its [`UGenDef`] declares them. Every product gets the next reference id, so a source
//! that appears again later is written as a back-reference and read back as the same
//! `Rc`.
//!
//! | Tag | Payload |
//! |---|---|
//! | `F` | f32 constant |
//! | `I` | i32 |
//! | `S` | u16 byte length and UTF-8 bytes |
//! | `R` | u8 rate id |
//! | `N` | undefined rate |
//! | `X` | i32 count and elements |
//! | `P` | key, i32 arity and fields |
//! | `<` | i32 reference id |

pub mod registry;

use std::{collections::HashMap, rc::Rc};

use sealed::sealed;
use thiserror::Error;
use tracing::debug;

use crate::{
    graph::GE,
    types::{MaybeRate, Rate},
    ugen::{Arg, ParamKind, RateSpec, UGenDef, UGenSource},
};
pub use registry::UGenRegistry;

/// Bytes every stream starts with.
pub const MAGIC: &[u8; 4] = b"UGS1";

/// Type key of a channel selection.
pub const CHANNEL_KEY: &str = "ChannelProxy";

const TAG_FLOAT: u8 = b'F';
const TAG_INT: u8 = b'I';
const TAG_STRING: u8 = b'S';
const TAG_RATE: u8 = b'R';
const TAG_NO_RATE: u8 = b'N';
const TAG_SEQ: u8 = b'X';
const TAG_PRODUCT: u8 = b'P';
const TAG_REF: u8 = b'<';

/// Deepest nesting of composites and products a reader accepts.
pub const MAX_DEPTH: usize = 256;

/// Errors that can be encountered while reading a stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The field count in a product header differs from the declared arity of its type.
    /// Nothing of the product is read.
    #[error("{key}: expected {expected} fields, stream has {found}")]
    ArityMismatch {
        /// Type key of the product.
        key: String,
        /// Declared arity.
        expected: usize,
        /// Count found in the header.
        found: i32,
    },

    /// The type key is not in the registry.
    #[error("unknown UGen type `{0}`")]
    UnknownKey(String),

    /// A value of another kind was expected here.
    #[error("expected {expected}, found tag {found:#04x}")]
    UnexpectedTag {
        /// What the reader was looking for.
        expected: &'static str,
        /// Tag byte found instead.
        found: u8,
    },

    /// The stream ended in the middle of a value.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// A string is not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A rate id outside of 0..=3.
    #[error("unknown rate id {0}")]
    UnknownRate(u8),

    /// A back-reference to a product that has not been completely read.
    #[error("reference to unknown product {0}")]
    DanglingRef(i32),

    /// A done-flag field does not hold a UGen with a done flag.
    #[error("expected a UGen with a done flag")]
    MissingDoneFlag,

    /// Bytes are left over after the last root.
    #[error("{0} bytes after the last value")]
    TrailingData(usize),

    /// Composites and products are nested deeper than [`MAX_DEPTH`].
    #[error("values nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,

    /// The stream does not start with [`MAGIC`].
    #[error("not a UGen graph stream")]
    BadMagic,
}

/// Errors that can be encountered while writing a stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// Output references only exist inside one graph build and cannot be persisted.
    #[error("expanded outputs cannot be written")]
    ExpandedOutput,

    /// An instance with a persisted rate was left without one.
    #[error("{0}: rate is undefined")]
    UndefinedRate(&'static str),

    /// An argument value does not fit the kind its parameter is declared with.
    #[error("{ugen}: parameter `{param}` got a value of the wrong kind")]
    ArgumentKind {
        /// Type key.
        ugen: &'static str,
        /// Name of the parameter.
        param: &'static str,
    },

    /// A length does not fit its header field.
    #[error("value too long to be written")]
    TooLong,
}

/// Values with a tagged persisted form.
#[sealed]
pub trait Primitive: Sized {
    /// Read one value.
    fn read_from(input: &mut RefMapIn<'_>) -> Result<Self, ReadError>;

    /// Write one value.
    fn write_to(&self, out: &mut RefMapOut) -> Result<(), WriteError>;
}

#[sealed]
impl Primitive for i32 {
    fn read_from(input: &mut RefMapIn<'_>) -> Result<Self, ReadError> {
        input.expect_tag(TAG_INT, "int")?;
        input.raw_i32()
    }

    fn write_to(&self, out: &mut RefMapOut) -> Result<(), WriteError> {
        out.buf.push(TAG_INT);
        out.buf.extend_from_slice(&self.to_be_bytes());
        Ok(())
    }
}

#[sealed]
impl Primitive for String {
    fn read_from(input: &mut RefMapIn<'_>) -> Result<Self, ReadError> {
        input.expect_tag(TAG_STRING, "string")?;
        let len = u16::from_be_bytes(input.take()?);
        let bytes = input.take_slice(usize::from(len))?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReadError::InvalidUtf8)
    }

    fn write_to(&self, out: &mut RefMapOut) -> Result<(), WriteError> {
        let len = u16::try_from(self.len()).map_err(|_| WriteError::TooLong)?;
        out.buf.push(TAG_STRING);
        out.buf.extend_from_slice(&len.to_be_bytes());
        out.buf.extend_from_slice(self.as_bytes());
        Ok(())
    }
}

#[sealed]
impl Primitive for Rate {
    fn read_from(input: &mut RefMapIn<'_>) -> Result<Self, ReadError> {
        input.expect_tag(TAG_RATE, "rate")?;
        let [id] = input.take()?;
        Rate::from_id(id).ok_or(ReadError::UnknownRate(id))
    }

    fn write_to(&self, out: &mut RefMapOut) -> Result<(), WriteError> {
        out.buf.extend_from_slice(&[TAG_RATE, self.id()]);
        Ok(())
    }
}

#[sealed]
impl Primitive for MaybeRate {
    fn read_from(input: &mut RefMapIn<'_>) -> Result<Self, ReadError> {
        if input.peek()? == TAG_NO_RATE {
            input.pos += 1;
            return Ok(MaybeRate::Undefined);
        }
        Ok(MaybeRate::Defined(input.read()?))
    }

    fn write_to(&self, out: &mut RefMapOut) -> Result<(), WriteError> {
        match self {
            MaybeRate::Defined(rate) => out.write(rate),
            MaybeRate::Undefined => {
                out.buf.push(TAG_NO_RATE);
                Ok(())
            }
        }
    }
}

#[sealed]
impl Primitive for GE {
    fn read_from(input: &mut RefMapIn<'_>) -> Result<Self, ReadError> {
        match input.peek()? {
            TAG_FLOAT => {
                input.pos += 1;
                Ok(GE::Constant(f32::from_be_bytes(input.take()?)))
            }
            TAG_SEQ => {
                input.pos += 1;
                let count = input.raw_i32()?;
                //Every element takes at least one byte
                if count < 0 || count as usize > input.remaining() {
                    return Err(ReadError::UnexpectedEof);
                }
                input.nested(|input| {
                    let mut items = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        items.push(input.read_ge()?);
                    }
                    Ok(GE::Composite(items))
                })
            }
            TAG_PRODUCT => {
                input.pos += 1;
                input.nested(RefMapIn::read_product)
            }
            TAG_REF => {
                input.pos += 1;
                let id = input.raw_i32()?;
                usize::try_from(id)
                    .ok()
                    .and_then(|i| input.products.get(i).cloned().flatten())
                    .ok_or(ReadError::DanglingRef(id))
            }
            found => Err(ReadError::UnexpectedTag {
                expected: "graph element",
                found,
            }),
        }
    }

    fn write_to(&self, out: &mut RefMapOut) -> Result<(), WriteError> {
        match self {
            GE::Constant(c) => {
                out.buf.push(TAG_FLOAT);
                out.buf.extend_from_slice(&c.to_be_bytes());
                Ok(())
            }
            GE::Composite(items) => {
                let count = i32::try_from(items.len()).map_err(|_| WriteError::TooLong)?;
                out.buf.push(TAG_SEQ);
                out.buf.extend_from_slice(&count.to_be_bytes());
                items.iter().try_for_each(|item| out.write(item))
            }
            GE::Source(src) => out.write_source(src),
            GE::Channel(inner, index) => {
                let index = i32::try_from(*index).map_err(|_| WriteError::TooLong)?;
                out.product_header(CHANNEL_KEY, 2)?;
                out.write(inner.as_ref())?;
                out.write(&index)
            }
            GE::Output(_) => Err(WriteError::ExpandedOutput),
        }
    }
}

/// Reader over a byte stream.
///
/// Product ids are assigned when a product starts, but a product can only be
/// referenced once it has been read completely.
pub struct RefMapIn<'a> {
    data: &'a [u8],
    pos: usize,
    registry: &'a UGenRegistry,
    products: Vec<Option<GE>>,
    depth: usize,
}

impl<'a> RefMapIn<'a> {
    /// Read from `data`, resolving type keys in `registry`.
    pub fn new(data: &'a [u8], registry: &'a UGenRegistry) -> Self {
        RefMapIn {
            data,
            pos: 0,
            registry,
            products: Vec::new(),
            depth: 0,
        }
    }

    /// Read any primitive value.
    pub fn read<T: Primitive>(&mut self) -> Result<T, ReadError> {
        T::read_from(self)
    }

    /// Read a rate.
    pub fn read_rate(&mut self) -> Result<Rate, ReadError> {
        self.read()
    }

    /// Read a rate that may be undefined.
    pub fn read_maybe_rate(&mut self) -> Result<MaybeRate, ReadError> {
        self.read()
    }

    /// Read a plain integer.
    pub fn read_int(&mut self) -> Result<i32, ReadError> {
        self.read()
    }

    /// Read a string.
    pub fn read_string(&mut self) -> Result<String, ReadError> {
        self.read()
    }

    /// Read a graph element.
    pub fn read_ge(&mut self) -> Result<GE, ReadError> {
        self.read()
    }

    /// Read a graph element that has to carry a done flag.
    pub fn read_ge_done(&mut self) -> Result<GE, ReadError> {
        let ge = self.read_ge()?;
        if ge.has_done_flag() {
            Ok(ge)
        } else {
            Err(ReadError::MissingDoneFlag)
        }
    }

    /// True once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, ReadError>,
    ) -> Result<T, ReadError> {
        if self.depth >= MAX_DEPTH {
            return Err(ReadError::TooDeep);
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_product(&mut self) -> Result<GE, ReadError> {
        let key = self.read_string()?;
        let arity = self.read_int()?;
        let id = self.products.len();
        self.products.push(None);

        let ge = if key == CHANNEL_KEY {
            if arity != 2 {
                return Err(ReadError::ArityMismatch {
                    key,
                    expected: 2,
                    found: arity,
                });
            }
            let inner = self.read_ge()?;
            let index = self.read_int()?;
            GE::Channel(Box::new(inner), index.max(0) as usize)
        } else {
            let def = self
                .registry
                .get(&key)
                .ok_or_else(|| ReadError::UnknownKey(key.clone()))?;
            GE::from(def.read(self, arity)?)
        };
        debug!(key = %key, id = id, "product read");
        self.products[id] = Some(ge.clone());
        Ok(ge)
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn peek(&self) -> Result<u8, ReadError> {
        self.data.get(self.pos).copied().ok_or(ReadError::UnexpectedEof)
    }

    fn expect_tag(&mut self, tag: u8, expected: &'static str) -> Result<(), ReadError> {
        let found = self.peek()?;
        if found != tag {
            return Err(ReadError::UnexpectedTag { expected, found });
        }
        self.pos += 1;
        Ok(())
    }

    fn take_slice(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::UnexpectedEof)?;
        let slice = self.data.get(self.pos..end).ok_or(ReadError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut bytes = [0; N];
        bytes.copy_from_slice(self.take_slice(N)?);
        Ok(bytes)
    }

    fn raw_i32(&mut self) -> Result<i32, ReadError> {
        Ok(i32::from_be_bytes(self.take()?))
    }
}

/// Writer producing the layout [`RefMapIn`] reads.
#[derive(Default)]
pub struct RefMapOut {
    buf: Vec<u8>,
    //Keyed by Rc address; the Rc is kept so the address stays unique
    ids: HashMap<usize, (Rc<UGenSource>, i32)>,
    next_id: i32,
}

impl RefMapOut {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write any primitive value.
    pub fn write<T: Primitive>(&mut self, value: &T) -> Result<(), WriteError> {
        value.write_to(self)
    }

    /// Write a UGen instance, or a back-reference if the same `Rc` was written before.
    pub fn write_source(&mut self, src: &Rc<UGenSource>) -> Result<(), WriteError> {
        let addr = Rc::as_ptr(src) as usize;
        if let Some((_, id)) = self.ids.get(&addr) {
            self.buf.push(TAG_REF);
            self.buf.extend_from_slice(&id.to_be_bytes());
            return Ok(());
        }
        let def = src.def();
        let arity = i32::try_from(def.arity()).map_err(|_| WriteError::TooLong)?;
        let id = self.product_header(def.name, arity)?;
        self.ids.insert(addr, (src.clone(), id));
        src.write_fields(self)
    }

    /// Finished bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn product_header(&mut self, key: &str, arity: i32) -> Result<i32, WriteError> {
        let id = self.next_id;
        self.next_id += 1;
        self.buf.push(TAG_PRODUCT);
        self.write(&key.to_owned())?;
        self.write(&arity)?;
        Ok(id)
    }
}

impl UGenDef {
    /// Read the fields of one instance, given the field count of its product header.
    ///
    /// The count is checked against [`UGenDef::arity()`] before any field is read.
    pub fn read(&'static self, input: &mut RefMapIn<'_>, arity: i32) -> Result<UGenSource, ReadError> {
        if usize::try_from(arity).ok() != Some(self.arity()) {
            return Err(ReadError::ArityMismatch {
                key: self.name.to_owned(),
                expected: self.arity(),
                found: arity,
            });
        }
        let rate = match self.rate {
            RateSpec::Param => MaybeRate::Defined(input.read_rate()?),
            RateSpec::Maybe(_) => input.read_maybe_rate()?,
            RateSpec::Fixed(rate) => MaybeRate::Defined(rate),
        };
        let mut args = Vec::with_capacity(self.params.len());
        for param in self.params {
            args.push(match param.kind {
                ParamKind::In | ParamKind::Spread => Arg::GE(input.read_ge()?),
                ParamKind::Done => Arg::GE(input.read_ge_done()?),
                ParamKind::Int | ParamKind::Channels | ParamKind::Special => {
                    Arg::Int(input.read_int()?)
                }
                ParamKind::Text => Arg::Text(input.read_string()?),
            });
        }
        Ok(UGenSource::new(self, rate, args))
    }
}

impl UGenSource {
    fn write_fields(&self, out: &mut RefMapOut) -> Result<(), WriteError> {
        let def = self.def();
        match def.rate {
            RateSpec::Param => match self.rate() {
                MaybeRate::Defined(rate) => out.write(&rate)?,
                MaybeRate::Undefined => return Err(WriteError::UndefinedRate(def.name)),
            },
            RateSpec::Maybe(_) => out.write(&self.rate())?,
            RateSpec::Fixed(_) => {}
        }
        for (param, arg) in def.params.iter().zip(self.args()) {
            match (param.kind, arg) {
                (ParamKind::In | ParamKind::Spread | ParamKind::Done, Arg::GE(ge)) => {
                    out.write(ge)?
                }
                (ParamKind::Int | ParamKind::Channels | ParamKind::Special, Arg::Int(v)) => {
                    out.write(v)?
                }
                (ParamKind::Text, Arg::Text(s)) => out.write(s)?,
                _ => {
                    return Err(WriteError::ArgumentKind {
                        ugen: def.name,
                        param: param.name,
                    })
                }
            }
        }
        Ok(())
    }
}

/// Write root graph elements as one stream.
pub fn write_graph(roots: &[GE]) -> Result<Vec<u8>, WriteError> {
    let mut out = RefMapOut::new();
    out.buf.extend_from_slice(MAGIC);
    let count = i32::try_from(roots.len()).map_err(|_| WriteError::TooLong)?;
    out.buf.extend_from_slice(&count.to_be_bytes());
    for root in roots {
        out.write(root)?;
    }
    Ok(out.into_bytes())
}

/// Read root graph elements written by [`write_graph()`].
///
/// ```
/// # use ugengraph::{graph::GE, serial::{read_graph, write_graph, UGenRegistry}, extra::builtin::SinOsc};
/// let roots: Vec<GE> = vec![SinOsc::ar().freq(GE::seq([440.0, 550.0])).into()];
/// let bytes = write_graph(&roots).unwrap();
/// let read = read_graph(&bytes, &UGenRegistry::builtin()).unwrap();
/// assert_eq!(read, roots);
/// ```
pub fn read_graph(data: &[u8], registry: &UGenRegistry) -> Result<Vec<GE>, ReadError> {
    if !data.starts_with(MAGIC) {
        return Err(ReadError::BadMagic);
    }
    let mut input = RefMapIn::new(&data[MAGIC.len()..], registry);
    let count = input.raw_i32()?;
    if count < 0 || count as usize > input.remaining() {
        return Err(ReadError::UnexpectedEof);
    }
    let roots = (0..count)
        .map(|_| input.read_ge())
        .collect::<Result<Vec<_>, _>>()?;
    if !input.is_at_end() {
        return Err(ReadError::TrailingData(input.remaining()));
    }
    Ok(roots)
}
