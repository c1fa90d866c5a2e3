//! Directive Configuration
//!
//! Marker attribute names and timing knobs shared by all built-in
//! directives. Every field has a default, so a partial JSON document only
//! overrides what it names:
//!
//! ```rust,ignore
//! let config = DirectiveConfig::from_json(r#"{ "active_attribute": "aria-current" }"#)?;
//! assert_eq!(config.pending_attribute, "ui-click-pending");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Upper bound for generated option values (a simple UUID is 32 hex digits).
const MAX_OPTION_VALUE_LENGTH: usize = 32;

/// Settings for the built-in directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectiveConfig {
    /// Attribute present on a clickable element while its handler runs.
    pub pending_attribute: String,

    /// Attribute present on a link whose target route is active.
    pub active_attribute: String,

    /// Length of one animation frame for the default frame clock.
    pub frame_interval_ms: u64,

    /// Number of hex digits in the opaque DOM value given to options.
    pub option_value_length: usize,
}

impl Default for DirectiveConfig {
    fn default() -> Self {
        Self {
            pending_attribute: "ui-click-pending".to_string(),
            active_attribute: "ui-active".to_string(),
            frame_interval_ms: 16,
            option_value_length: 13,
        }
    }
}

impl DirectiveConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The animation frame interval.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Option value length, clamped to what the generator can produce.
    pub fn option_value_length(&self) -> usize {
        self.option_value_length.clamp(1, MAX_OPTION_VALUE_LENGTH)
    }
}
