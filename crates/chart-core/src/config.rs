// File: crates/chart-core/src/config.rs
// Summary: Chart configuration (sizes, derived-series parameters, dataset registry) loaded from JSON or defaulted.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::period::Period;
use crate::types::{Insets, Viewport};
use crate::view::ViewFlags;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DatasetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selectable dataset; `location` is interpreted by the feed source (path, URL, key).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub id: DatasetId,
    #[serde(default)]
    pub label: String,
    pub location: String,
}

impl DatasetSpec {
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        let id = DatasetId::new(id);
        Self { label: id.as_str().to_string(), id, location: location.into() }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub viewport: Viewport,
    pub insets: Insets,
    /// Trailing closes averaged beyond the current one.
    pub moving_average_window: usize,
    /// Subtracted from the lowest price so the line never touches the x axis.
    pub price_pad: f64,
    /// Share of the plot height used by volume bars, from the bottom.
    pub volume_ratio: f64,
    /// chrono format string for the legend date.
    pub legend_date_format: String,
    pub initial_view: ViewFlags,
    pub initial_period: Period,
    pub datasets: Vec<DatasetSpec>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            insets: Insets::default(),
            moving_average_window: 20,
            price_pad: 5.0,
            volume_ratio: 0.25,
            legend_date_format: "%I:%M %p %a %Y".to_string(),
            initial_view: ViewFlags::default(),
            initial_period: Period::All,
            datasets: Vec::new(),
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        Ok(cfg.sanitized())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ChartError::Load(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Clamp ratios into usable bounds.
    fn sanitized(mut self) -> Self {
        if !self.volume_ratio.is_finite() {
            self.volume_ratio = Self::default().volume_ratio;
        }
        self.volume_ratio = self.volume_ratio.clamp(0.0, 1.0);
        if !self.price_pad.is_finite() {
            self.price_pad = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ChartConfig::from_json_str("{}").unwrap(), ChartConfig::default());
    }

    #[test]
    fn reads_datasets_and_overrides() {
        let cfg = ChartConfig::from_json_str(
            r#"{
                "moving_average_window": 5,
                "volume_ratio": 3.0,
                "initial_period": { "months": 6 },
                "datasets": [ { "id": "sti", "location": "sti-full.json" } ]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.moving_average_window, 5);
        assert_eq!(cfg.volume_ratio, 1.0);
        assert_eq!(cfg.initial_period, Period::Months(6));
        assert_eq!(cfg.datasets[0].id, DatasetId::from("sti"));
        assert_eq!(cfg.datasets[0].label, "");
        assert_eq!(cfg.viewport, Viewport::default());
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(ChartConfig::from_json_str("[1,"), Err(ChartError::Json(_))));
    }
}
