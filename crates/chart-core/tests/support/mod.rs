// File: crates/chart-core/tests/support/mod.rs
// Purpose: Shared test doubles: a renderer that records calls, feed fixtures and an in-memory feed source.
#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use quotechart_core::{
    ChartScales, Crosshair, DatasetSpec, DividendEvent, FeedSource, Layer, PlotData, RawFeed, Renderer,
    VolumeBar,
};
use serde_json::json;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Axes,
    Series { layer: Layer, len: usize },
    Bars { layer: Layer, len: usize },
    Markers { layer: Layer, positions: Vec<(f64, f64)> },
    Crosshair(Crosshair),
    HideCrosshair,
    Remove(Layer),
    Status(String),
}

/// Keeps every call plus the current set of visible layers.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
    pub layers: HashMap<Layer, usize>,
    pub crosshair: Option<Crosshair>,
    pub status: String,
}

impl RecordingRenderer {
    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains_key(&layer)
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl Renderer for RecordingRenderer {
    fn draw_series(&mut self, layer: Layer, data: PlotData<'_>, _scales: &ChartScales) {
        self.layers.insert(layer, data.len());
        self.calls.push(Call::Series { layer, len: data.len() });
    }

    fn draw_bars(&mut self, layer: Layer, bars: &[VolumeBar], _scales: &ChartScales) {
        self.layers.insert(layer, bars.len());
        self.calls.push(Call::Bars { layer, len: bars.len() });
    }

    fn draw_markers(
        &mut self,
        layer: Layer,
        events: &[DividendEvent],
        position: &dyn Fn(&DividendEvent) -> (f64, f64),
    ) {
        self.layers.insert(layer, events.len());
        let positions = events.iter().map(position).collect();
        self.calls.push(Call::Markers { layer, positions });
    }

    fn update_crosshair(&mut self, crosshair: &Crosshair) {
        self.crosshair = Some(crosshair.clone());
        self.calls.push(Call::Crosshair(crosshair.clone()));
    }

    fn remove_layer(&mut self, layer: Layer) {
        self.layers.remove(&layer);
        self.calls.push(Call::Remove(layer));
    }

    fn draw_axes(&mut self, _scales: &ChartScales) {
        self.calls.push(Call::Axes);
    }

    fn hide_crosshair(&mut self) {
        self.crosshair = None;
        self.calls.push(Call::HideCrosshair);
    }

    fn show_status(&mut self, message: &str) {
        self.status = message.to_string();
        self.calls.push(Call::Status(message.to_string()));
    }
}

pub const DAY: i64 = 86_400;
/// 2024-01-01T00:00:00Z
pub const JAN_1_2024: i64 = 1_704_067_200;

pub fn fixture_feed() -> RawFeed {
    let text = include_str!("../fixtures/sti-sample.json");
    RawFeed::from_json_str(text).expect("fixture parses")
}

/// Daily feed of `days` points starting at `start`, closes `base, base+1, ...`, volume on every row.
pub fn daily_feed(start: i64, days: usize, base: f64) -> RawFeed {
    let ts: Vec<i64> = (0..days as i64).map(|d| start + d * DAY).collect();
    let close: Vec<f64> = (0..days).map(|d| base + d as f64).collect();
    let high: Vec<f64> = close.iter().map(|c| c + 0.5).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 0.5).collect();
    let volume: Vec<f64> = (0..days).map(|d| 1_000.0 + d as f64).collect();
    serde_json::from_value(json!({ "chart": { "result": [ {
        "timestamp": ts,
        "indicators": { "quote": [ {
            "open": close, "high": high, "low": low, "close": close, "volume": volume
        } ] }
    } ] } }))
    .expect("synthetic feed parses")
}

/// Serves feeds by dataset location after an optional per-location delay.
#[derive(Default)]
pub struct MemorySource {
    feeds: HashMap<String, (RawFeed, Duration)>,
}

impl MemorySource {
    pub fn with(mut self, location: &str, feed: RawFeed, delay_ms: u64) -> Self {
        self.feeds.insert(location.to_string(), (feed, Duration::from_millis(delay_ms)));
        self
    }
}

impl FeedSource for MemorySource {
    async fn load(&self, spec: &DatasetSpec) -> quotechart_core::Result<RawFeed> {
        let (feed, delay) = self
            .feeds
            .get(&spec.location)
            .ok_or_else(|| quotechart_core::ChartError::Load(format!("no feed at {}", spec.location)))?;
        if !delay.is_zero() {
            tokio::time::sleep(*delay).await;
        }
        Ok(feed.clone())
    }
}
