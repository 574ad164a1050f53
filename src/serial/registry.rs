//! Lookup of table entries by persisted type key.

use std::collections::HashMap;

use tracing::warn;

use crate::ugen::{conv, UGenDef};

/// Maps type keys to [`UGenDef`] table entries for the reader.
#[derive(Clone, Debug)]
pub struct UGenRegistry {
    defs: HashMap<&'static str, &'static UGenDef>,
}

impl Default for UGenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UGenRegistry {
    /// Registry that knows the conversion and operator UGens.
    pub fn new() -> Self {
        let mut reg = UGenRegistry {
            defs: HashMap::new(),
        };
        for def in [
            conv::K2A::def(),
            conv::T2A::def(),
            conv::DC::def(),
            conv::BinaryOpUGen::def(),
            conv::UnaryOpUGen::def(),
        ] {
            reg.register(def);
        }
        reg
    }

    /// Registry that knows every UGen of the built-in catalog.
    ///
    /// ```
    /// # use ugengraph::serial::UGenRegistry;
    /// let reg = UGenRegistry::builtin();
    /// assert_eq!(reg.get("SinOsc").unwrap().name, "SinOsc");
    /// assert!(reg.get("K2A").is_some());
    /// ```
    #[cfg(feature = "builtin")]
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for def in crate::extra::builtin::defs() {
            reg.register(def);
        }
        reg
    }

    /// Add a table entry. Returns the entry it replaces, if any.
    pub fn register(&mut self, def: &'static UGenDef) -> Option<&'static UGenDef> {
        let old = self.defs.insert(def.name, def);
        if old.is_some_and(|old| old != def) {
            warn!(key = def.name, "replacing a different UGen definition");
        }
        old
    }

    /// Table entry for a type key.
    pub fn get(&self, key: &str) -> Option<&'static UGenDef> {
        self.defs.get(key).copied()
    }

    /// Number of known keys.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True if no key is known.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ugen;

    ugen! {
        /// Test UGen.
        Custom {
            rate: kr,
            outputs: 3,
            inputs: {
                /// Input.
                input: ge = 0
            }
        }
    }

    #[test]
    fn core_entries_are_always_known() {
        let reg = UGenRegistry::new();
        assert_eq!(reg.len(), 5);
        assert!(reg.get("BinaryOpUGen").is_some());
        assert!(reg.get("SinOsc").is_none());
    }

    #[test]
    fn user_entries_can_be_added() {
        let mut reg = UGenRegistry::new();
        assert!(reg.register(Custom::def()).is_none());
        assert_eq!(reg.get("Custom"), Some(Custom::def()));
        assert_eq!(reg.register(Custom::def()), Some(Custom::def()));
        assert_eq!(reg.len(), 6);
    }

    #[test]
    fn builtin_catalog_is_complete() {
        let reg = UGenRegistry::builtin();
        for key in ["EnvGen", "Out", "PlayBuf", "LorenzL", "Dseq", "Pan2", "Trig1"] {
            assert!(reg.get(key).is_some(), "{key} missing");
        }
    }
}
