//! Node configuration.

use serde::{Deserialize, Serialize};

/// Default number of container levels searched for inputs.
pub const DEFAULT_RESOLVE_DEPTH: usize = 1;

/// Tunables for a computation node.
///
/// Every field has a default, so a partial document deserializes cleanly:
///
/// ```rust
/// use ripple_core::NodeConfig;
///
/// let config: NodeConfig = serde_json::from_str(r#"{"resolve_depth": 3}"#).unwrap();
/// assert_eq!(config.resolve_depth, 3);
/// assert!(config.may_be_null);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Whether null counts as a valid value for top-level arguments and for
    /// the node's own published value.
    pub may_be_null: bool,

    /// How many levels of sequences and mappings are searched for inputs.
    pub resolve_depth: usize,
}

impl NodeConfig {
    /// Set the null policy.
    pub fn may_be_null(mut self, may_be_null: bool) -> Self {
        self.may_be_null = may_be_null;
        self
    }

    /// Set the resolution depth.
    pub fn resolve_depth(mut self, resolve_depth: usize) -> Self {
        self.resolve_depth = resolve_depth;
        self
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            may_be_null: true,
            resolve_depth: DEFAULT_RESOLVE_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_permit_null_at_depth_one() {
        let config = NodeConfig::default();
        assert!(config.may_be_null);
        assert_eq!(config.resolve_depth, 1);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config: NodeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn builder_methods_chain() {
        let config = NodeConfig::default().may_be_null(false).resolve_depth(2);
        assert!(!config.may_be_null);
        assert_eq!(config.resolve_depth, 2);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = NodeConfig::default().resolve_depth(4);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<NodeConfig>(&json).unwrap(), config);
    }
}
