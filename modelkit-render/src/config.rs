use serde::{Deserialize, Serialize};

/// Display settings for list columns and previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// chrono format string for `date` columns.
    pub date_format: String,
    /// chrono format string for `datetime` columns.
    pub datetime_format: String,
    /// Shown in place of object values, which are never rendered raw.
    pub object_placeholder: String,
    pub yes_label: String,
    pub no_label: String,
    /// Number of sample rows in a table preview.
    pub preview_rows: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            datetime_format: "%Y-%m-%d %H:%M".to_string(),
            object_placeholder: "[object]".to_string(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            preview_rows: 3,
        }
    }
}
