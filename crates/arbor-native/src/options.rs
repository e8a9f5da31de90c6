//! Parser options.

use serde::{Deserialize, Serialize};

/// Options accepted by [`parse_with_options`](crate::parse_with_options).
///
/// Deserializes with every field optional, so a config file only has to name
/// what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Column width of a tab stop when computing source columns.
    pub tab_stop: u32,

    /// Parse `<noscript>` content as raw text, as a browser with scripting
    /// enabled would.
    pub scripting_enabled: bool,

    /// Stop recording parse errors after this many. `None` records all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_errors: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: 8,
            scripting_enabled: true,
            max_errors: None,
        }
    }
}
