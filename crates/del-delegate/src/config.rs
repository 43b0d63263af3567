//! Delegator Configuration

use serde::{Deserialize, Serialize};

/// Delegator configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event used when a rule names none
    pub default_event: String,

    /// Drop a node's registry entry once its last binding is removed.
    /// Off by default; entries otherwise live until `dispose`.
    pub prune_empty_entries: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_event: "click".to_string(),
            prune_empty_entries: false,
        }
    }
}
