//! Options for one graph construction pass.
//!
//! Configuration is plain JSON, for example `{"strict_rates": true}`. Missing keys keep
//! their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can be encountered while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The text is not valid JSON or does not describe a [`GraphConfig`].
    #[error("bad graph configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options of a [`SynthGraphBuilder`](crate::graph::SynthGraphBuilder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Fail expansion when a rate-matched input cannot be brought to the required rate,
    /// instead of passing it through unchanged.
    pub strict_rates: bool,

    /// Share structurally identical nodes. Individual and side-effecting nodes are
    /// never shared.
    pub share_common: bool,

    /// Drop nodes whose outputs are never used when the graph is finished.
    pub prune_unused: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            strict_rates: false,
            share_common: true,
            prune_unused: false,
        }
    }
}

impl GraphConfig {
    /// Parse configuration from JSON.
    ///
    /// ```
    /// # use ugengraph::config::GraphConfig;
    /// let conf = GraphConfig::from_json(r#"{"strict_rates": true}"#).unwrap();
    /// assert!(conf.strict_rates);
    /// assert!(conf.share_common);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize configuration into JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(GraphConfig::from_json("{}").unwrap(), GraphConfig::default());
    }

    #[test]
    fn all_keys_are_read() {
        let conf = GraphConfig::from_json(
            r#"{"strict_rates": true, "share_common": false, "prune_unused": true}"#,
        )
        .unwrap();
        assert!(conf.strict_rates);
        assert!(!conf.share_common);
        assert!(conf.prune_unused);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(GraphConfig::from_json(r#"{"strict_rates": "yes"}"#).is_err());
        assert!(GraphConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn json_round_trip() {
        let conf = GraphConfig {
            strict_rates: true,
            share_common: false,
            prune_unused: false,
        };
        let text = conf.to_json().unwrap();
        assert_eq!(GraphConfig::from_json(&text).unwrap(), conf);
    }
}
