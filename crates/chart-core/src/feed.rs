// File: crates/chart-core/src/feed.rs
// Summary: Serde model of the chart JSON feed (parallel quote arrays plus keyed dividend events).
// Notes:
// - Every array element is optional: feeds use `null` for missing quotes.
// - Required containers are optional too, so shape problems surface as
//   `ChartError::MalformedFeed` from the normalizer instead of a serde error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawFeed {
    #[serde(default)]
    pub chart: Option<ChartEnvelope>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<FeedErrorBody>,
}

/// Error object some providers return in place of `result`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FeedErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<Option<i64>>>,
    #[serde(default)]
    pub indicators: Option<Indicators>,
    #[serde(default)]
    pub events: Option<Events>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteArrays>,
}

/// Parallel OHLCV arrays; index `i` in each belongs to `timestamp[i]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuoteArrays {
    #[serde(default)]
    pub high: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub low: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub open: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub volume: Option<Vec<Option<f64>>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Events {
    /// Keyed by the provider (usually the epoch date as a string); key order carries no meaning.
    #[serde(default)]
    pub dividends: BTreeMap<String, RawDividend>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawDividend {
    /// Epoch seconds.
    pub date: i64,
    pub amount: f64,
}

impl RawFeed {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
