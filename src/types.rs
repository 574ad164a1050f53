//! Calculation rates.

use core::fmt;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Calculation rate of a signal.
///
/// `Scalar < Control < Audio` is the order of generality used when deciding whether an
/// input has to be promoted. `Demand` is pulled by its consumer and is not comparable to
/// the other three, so `partial_cmp` returns `None` for mixed pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rate {
    /// Computed once, when the synth is initialised.
    Scalar,

    /// Computed once per block.
    Control,

    /// Computed once per sample.
    Audio,

    /// Computed when a consumer pulls a value.
    Demand,
}

impl Rate {
    /// Numeric id used by the persisted format and by the server.
    pub fn id(self) -> u8 {
        match self {
            Rate::Scalar => 0,
            Rate::Control => 1,
            Rate::Audio => 2,
            Rate::Demand => 3,
        }
    }

    /// Inverse of [`Rate::id()`].
    pub fn from_id(id: u8) -> Option<Rate> {
        match id {
            0 => Some(Rate::Scalar),
            1 => Some(Rate::Control),
            2 => Some(Rate::Audio),
            3 => Some(Rate::Demand),
            _ => None,
        }
    }

    /// The higher of two rates by id, demand being the highest.
    ///
    /// This is the rule operator UGens use to derive their own rate from their inputs.
    ///
    /// ```
    /// # use ugengraph::types::Rate;
    /// assert_eq!(Rate::Control.max_by_id(Rate::Audio), Rate::Audio);
    /// assert_eq!(Rate::Audio.max_by_id(Rate::Demand), Rate::Demand);
    /// ```
    pub fn max_by_id(self, other: Rate) -> Rate {
        if other.id() > self.id() {
            other
        } else {
            self
        }
    }

    /// True if `self` is strictly less general than `required`, which means an up-rate
    /// conversion is needed. Never true when either side is demand rate.
    pub fn is_below(self, required: Rate) -> bool {
        self.partial_cmp(&required) == Some(Ordering::Less)
    }
}

impl PartialOrd for Rate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Rate::Demand, Rate::Demand) => Some(Ordering::Equal),
            (Rate::Demand, _) | (_, Rate::Demand) => None,
            _ => Some(self.id().cmp(&other.id())),
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rate::Scalar => "scalar",
            Rate::Control => "control",
            Rate::Audio => "audio",
            Rate::Demand => "demand",
        };
        f.write_str(name)
    }
}

/// Rate of a definition that may be left open until its inputs are known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaybeRate {
    /// The rate is fixed at construction.
    Defined(Rate),

    /// The rate is derived from the inputs during expansion.
    Undefined,
}

impl MaybeRate {
    /// Return the defined rate, or `fallback` otherwise.
    pub fn unwrap_or(self, fallback: Rate) -> Rate {
        match self {
            MaybeRate::Defined(r) => r,
            MaybeRate::Undefined => fallback,
        }
    }
}

impl From<Rate> for MaybeRate {
    fn from(value: Rate) -> Self {
        MaybeRate::Defined(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for rate in [Rate::Scalar, Rate::Control, Rate::Audio, Rate::Demand] {
            assert_eq!(Rate::from_id(rate.id()), Some(rate));
        }
        assert_eq!(Rate::from_id(4), None);
    }

    #[test]
    fn generality_order() {
        assert!(Rate::Scalar < Rate::Control);
        assert!(Rate::Control < Rate::Audio);
        assert!(Rate::Control.is_below(Rate::Audio));
        assert!(!Rate::Audio.is_below(Rate::Audio));
        assert!(!Rate::Audio.is_below(Rate::Control));
    }

    #[test]
    fn demand_is_not_ordered() {
        assert_eq!(Rate::Demand.partial_cmp(&Rate::Audio), None);
        assert_eq!(Rate::Scalar.partial_cmp(&Rate::Demand), None);
        //Neither direction asks for a conversion
        assert!(!Rate::Demand.is_below(Rate::Audio));
        assert!(!Rate::Control.is_below(Rate::Demand));
    }

    #[test]
    fn maybe_rate_fallback() {
        assert_eq!(MaybeRate::Undefined.unwrap_or(Rate::Control), Rate::Control);
        assert_eq!(MaybeRate::from(Rate::Audio).unwrap_or(Rate::Control), Rate::Audio);
    }
}
