//! Declaration macros for typed UGen factories.

/// Declare a UGen: its table entry, a builder struct with one setter per parameter, and
/// the conversion into a graph element.
///
/// ```
/// use ugengraph::{graph::GE, ugen};
///
/// ugen! {
///     /// Sine oscillator.
///     MySine {
///         rate: [ar, kr],
///         outputs: one,
///         inputs: {
///             /// Frequency in Hz.
///             freq: ge = 440,
///             /// Phase in radians.
///             phase: ge = 0
///         }
///     }
/// }
///
/// assert_eq!(MySine::def().arity(), 3);
/// let ge: GE = MySine::ar().freq(220).into();
/// assert!(matches!(ge, GE::Source(_)));
/// ```
///
/// `rate` is a list of factory methods (the rate is then persisted), a single method for
/// a fixed rate, or `maybe` / `maybe_max` for a rate derived from the inputs. `outputs` is
/// `zero`, `one`, `channels` or a number. `flags` and `matching` are optional. Parameter
/// kinds are `ge`, `spread`, `done`, `int`, `text`, `channels` and `special`.
#[macro_export]
macro_rules! ugen {
    ( $(#[$meta:meta])*
      $name:ident {
        rate: $rate:tt,
        outputs: $outputs:tt,
        $( flags: [ $( $flag:ident ),* $(,)? ], )?
        $( matching: [ $( $matcher:ident ( $pos:literal ) ),* $(,)? ], )?
        inputs: { $(
            $(#[$param_meta:meta])*
            $param:ident: $kind:ident = $default:expr
        ),* $(,)? } $(,)?
    } ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            calc_rate: $crate::types::MaybeRate,
            $( $param: $crate::ugen_param_type!($kind), )*
        }

        #[allow(clippy::new_without_default)]
        impl $name {
            /// Table entry.
            pub const DEF: $crate::ugen::UGenDef = $crate::ugen::UGenDef {
                name: stringify!($name),
                rate: $crate::ugen_rate_spec!($rate),
                params: &[ $(
                    $crate::ugen::ParamDef {
                        name: stringify!($param),
                        kind: $crate::ugen_param_kind!($kind),
                    },
                )* ],
                outputs: $crate::ugen_outputs!($outputs),
                flags: $crate::ugen::Flags {
                    $( $( $flag: true, )* )?
                    ..$crate::ugen::Flags::NONE
                },
                matching: &[ $( $( $crate::ugen::RateMatch::$matcher($pos), )* )? ],
            };

            /// Table entry with a `'static` lifetime.
            pub fn def() -> &'static $crate::ugen::UGenDef {
                &Self::DEF
            }

            /// Create an instance with every parameter at its default.
            pub fn with_rate(rate: impl Into<$crate::types::MaybeRate>) -> Self {
                $name {
                    calc_rate: rate.into(),
                    $( $param: <$crate::ugen_param_type!($kind)>::from($default), )*
                }
            }

            $crate::ugen_rate_constructors!($rate);

            $(
                $(#[$param_meta])*
                pub fn $param(mut self, value: impl Into<$crate::ugen_param_type!($kind)>) -> Self {
                    self.$param = value.into();
                    self
                }
            )*

            /// Turn into the generic record the expansion engine works on.
            pub fn into_source(self) -> $crate::ugen::UGenSource {
                $crate::ugen::UGenSource::new(
                    Self::def(),
                    self.calc_rate,
                    vec![ $( $crate::ugen::Arg::from(self.$param), )* ],
                )
            }
        }

        impl From<$name> for $crate::graph::GE {
            fn from(value: $name) -> Self {
                $crate::graph::GE::from(value.into_source())
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ugen_rate_spec {
    ( [ $( $rate:ident ),* ] ) => {
        $crate::ugen::RateSpec::Param
    };
    ( maybe ) => {
        $crate::ugen::RateSpec::Maybe($crate::ugen::MaybeRule::FirstInput)
    };
    ( maybe_max ) => {
        $crate::ugen::RateSpec::Maybe($crate::ugen::MaybeRule::MaxOfInputs)
    };
    ( ir ) => {
        $crate::ugen::RateSpec::Fixed($crate::types::Rate::Scalar)
    };
    ( kr ) => {
        $crate::ugen::RateSpec::Fixed($crate::types::Rate::Control)
    };
    ( ar ) => {
        $crate::ugen::RateSpec::Fixed($crate::types::Rate::Audio)
    };
    ( dr ) => {
        $crate::ugen::RateSpec::Fixed($crate::types::Rate::Demand)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ugen_rate_constructors {
    ( [ $( $rate:ident ),* ] ) => {
        $( $crate::ugen_rate_constructor!($rate); )*
    };
    ( maybe ) => {
        $crate::ugen_rate_constructor!(new);
    };
    ( maybe_max ) => {
        $crate::ugen_rate_constructor!(new);
    };
    ( $rate:ident ) => {
        $crate::ugen_rate_constructor!($rate);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ugen_rate_constructor {
    ( ir ) => {
        /// Create an instance computed once at initialisation.
        pub fn ir() -> Self {
            Self::with_rate($crate::types::Rate::Scalar)
        }
    };
    ( kr ) => {
        /// Create an instance computed at control rate.
        pub fn kr() -> Self {
            Self::with_rate($crate::types::Rate::Control)
        }
    };
    ( ar ) => {
        /// Create an instance computed at audio rate.
        pub fn ar() -> Self {
            Self::with_rate($crate::types::Rate::Audio)
        }
    };
    ( dr ) => {
        /// Create an instance computed on demand.
        pub fn dr() -> Self {
            Self::with_rate($crate::types::Rate::Demand)
        }
    };
    ( new ) => {
        /// Create an instance whose rate is derived from its inputs.
        pub fn new() -> Self {
            Self::with_rate($crate::types::MaybeRate::Undefined)
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ugen_param_type {
    ( ge ) => { $crate::graph::GE };
    ( spread ) => { $crate::graph::GE };
    ( done ) => { $crate::graph::GE };
    ( int ) => { i32 };
    ( channels ) => { i32 };
    ( special ) => { i32 };
    ( text ) => { String };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ugen_param_kind {
    ( ge ) => { $crate::ugen::ParamKind::In };
    ( spread ) => { $crate::ugen::ParamKind::Spread };
    ( done ) => { $crate::ugen::ParamKind::Done };
    ( int ) => { $crate::ugen::ParamKind::Int };
    ( channels ) => { $crate::ugen::ParamKind::Channels };
    ( special ) => { $crate::ugen::ParamKind::Special };
    ( text ) => { $crate::ugen::ParamKind::Text };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ugen_outputs {
    ( zero ) => { $crate::ugen::Outputs::Zero };
    ( one ) => { $crate::ugen::Outputs::One };
    ( channels ) => { $crate::ugen::Outputs::Channels };
    ( $n:literal ) => { $crate::ugen::Outputs::Fixed($n) };
}
