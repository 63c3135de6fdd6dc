// File: crates/chart-core/src/error.rs
// Summary: Error taxonomy shared by the normalizer, scales, locator and chart session.

use thiserror::Error;

use crate::config::DatasetId;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Feed is missing a required array or its arrays disagree in length.
    #[error("malformed feed: {0}")]
    MalformedFeed(String),

    /// Nothing left to scale after normalization or period filtering.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Nearest-point lookup needs at least two samples.
    #[error("insufficient data: need at least 2 points, have {len}")]
    InsufficientData { len: usize },

    #[error("unknown dataset: {0}")]
    UnknownDataset(DatasetId),

    /// A newer selection started while this load was in flight, or no load is pending.
    /// `current` is the in-flight or shown dataset, if any.
    #[error("load of {requested} discarded; {}", superseded_by(.current))]
    StaleLoadDiscarded { requested: DatasetId, current: Option<DatasetId> },

    /// Operation needs a loaded dataset.
    #[error("no dataset is loaded")]
    NotReady,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport failure reported by a feed source.
    #[error("load failed: {0}")]
    Load(String),
}

impl ChartError {
    /// Whether the error should reach the user. Superseded loads are dropped silently.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ChartError::StaleLoadDiscarded { .. })
    }
}

fn superseded_by(current: &Option<DatasetId>) -> String {
    match current {
        Some(id) => format!("{id} is the current selection"),
        None => "no load is pending".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
