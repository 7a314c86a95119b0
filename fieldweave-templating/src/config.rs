//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::limits::{MAX_PATH_HOPS, MAX_RENDER_DEPTH, MAX_TEMPLATE_SIZE};

/// Tunables shared by every render on one engine.
///
/// Every field has a default, so a partial YAML/TOML/JSON document (or none
/// at all) deserializes into a usable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Format for date-time values when a token gives none
    pub date_time_format: String,
    /// Format for date-only values and `<system|today>`
    pub date_format: String,
    /// Render times in the local time zone instead of UTC
    pub local_time: bool,
    /// Separator used by expand tokens that leave theirs empty
    pub expand_separator: String,
    pub max_path_hops: usize,
    pub max_render_depth: usize,
    pub max_template_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            date_time_format: "yyyy-MM-dd HH:mm".to_string(),
            date_format: "yyyy-MM-dd".to_string(),
            local_time: false,
            expand_separator: ", ".to_string(),
            max_path_hops: MAX_PATH_HOPS,
            max_render_depth: MAX_RENDER_DEPTH,
            max_template_size: MAX_TEMPLATE_SIZE,
        }
    }
}
