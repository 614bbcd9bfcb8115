//! Editor configuration.
//!
//! Every field has a default, so a host may pass a partial JSON document.

use crate::error::EditorResult;
use pk_core::{Color, hex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Undo stack capacity, baseline included.
    pub max_history_length: usize,
    /// Quiet period before a burst of edits is committed.
    pub debounce_ms: u64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub background_color: Color,
    /// Offset applied to duplicated elements.
    pub paste_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_length: 50,
            debounce_ms: 300,
            // A4 at 96 dpi
            canvas_width: 794.0,
            canvas_height: 1123.0,
            background_color: hex("#FFFFFF"),
            paste_offset: 20.0,
        }
    }
}

impl EditorConfig {
    /// Parse a partial JSON config. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Clamp values the editor cannot work with.
    pub fn normalized(mut self) -> Self {
        self.max_history_length = self.max_history_length.max(1);
        if !self.paste_offset.is_finite() {
            self.paste_offset = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let c = EditorConfig::from_json(r##"{"maxHistoryLength": 20, "backgroundColor": "#F8F9FA"}"##).unwrap();
        assert_eq!(c.max_history_length, 20);
        assert_eq!(c.debounce_ms, 300);
        assert_eq!(c.background_color, hex("#F8F9FA"));
        assert_eq!((c.canvas_width, c.canvas_height), (794.0, 1123.0));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let c = EditorConfig::from_json(r#"{"maxHistoryLength": 0}"#).unwrap();
        assert_eq!(c.max_history_length, 1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EditorConfig::from_json("{").is_err());
    }
}
