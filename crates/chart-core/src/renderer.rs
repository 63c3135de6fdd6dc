// File: crates/chart-core/src/renderer.rs
// Summary: Renderer-agnostic drawing interface the chart session calls into, plus crosshair/legend payloads.
// Notes:
// - Implementors own all side effects (SVG, canvas, terminal). The core never draws.
// - Layers are replaced wholesale: a `draw_*` call for a layer supersedes its previous contents.

use std::fmt::Write as _;

use crate::indicators::VolumeBar;
use crate::scale::ChartScales;
use crate::series::{DividendEvent, LinePoint, PricePoint};
use crate::view::ViewFlag;

/// Named visual layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Volume,
    Close,
    MovingAverage,
    Ohlc,
    Candlesticks,
    Dividends,
}

impl Layer {
    pub fn id(&self) -> &'static str {
        match self {
            Layer::Volume => "volume",
            Layer::Close => "close",
            Layer::MovingAverage => "moving-average",
            Layer::Ohlc => "ohlc",
            Layer::Candlesticks => "candlesticks",
            Layer::Dividends => "dividends",
        }
    }
}

impl From<ViewFlag> for Layer {
    fn from(flag: ViewFlag) -> Self {
        match flag {
            ViewFlag::Close => Layer::Close,
            ViewFlag::MovingAverage => Layer::MovingAverage,
            ViewFlag::Ohlc => Layer::Ohlc,
            ViewFlag::Candlesticks => Layer::Candlesticks,
        }
    }
}

/// Payload of a path-style layer.
#[derive(Clone, Copy, Debug)]
pub enum PlotData<'a> {
    Line(&'a [LinePoint]),
    Ohlc(&'a [PricePoint]),
}

impl PlotData<'_> {
    pub fn len(&self) -> usize {
        match self {
            PlotData::Line(p) => p.len(),
            PlotData::Ohlc(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub value: String,
}

/// Crosshair target in plot-relative pixels, with the legend for the matched point.
#[derive(Clone, Debug, PartialEq)]
pub struct Crosshair {
    pub x: f64,
    pub y: f64,
    pub point: PricePoint,
    pub moving_average: Option<f64>,
    pub legend: Vec<LegendEntry>,
}

impl Crosshair {
    pub fn new(x: f64, y: f64, point: PricePoint, moving_average: Option<f64>, date_format: &str) -> Self {
        let legend = legend_entries(&point, moving_average, date_format);
        Self { x, y, point, moving_average, legend }
    }
}

/// Legend lines for `point`; an unusable `date_format` falls back to RFC 3339.
pub fn legend_entries(point: &PricePoint, moving_average: Option<f64>, date_format: &str) -> Vec<LegendEntry> {
    let mut date = String::new();
    if write!(date, "{}", point.date.format(date_format)).is_err() {
        date = point.date.to_rfc3339();
    }
    let price = |v: f64| format!("{v:.2}");
    let mut out = vec![
        LegendEntry { label: "date", value: date },
        LegendEntry { label: "open", value: price(point.open) },
        LegendEntry { label: "high", value: price(point.high) },
        LegendEntry { label: "low", value: price(point.low) },
        LegendEntry { label: "close", value: price(point.close) },
        LegendEntry {
            label: "volume",
            value: point.volume.map_or_else(|| "-".to_string(), |v| format!("{v:.0}")),
        },
    ];
    if let Some(avg) = moving_average {
        out.push(LegendEntry { label: "average", value: price(avg) });
    }
    out
}

/// Drawing collaborator driven by `ChartSession`.
pub trait Renderer {
    /// Render or replace a path layer (close line, moving average, OHLC bars, candlesticks).
    fn draw_series(&mut self, layer: Layer, data: PlotData<'_>, scales: &ChartScales);

    /// Render or replace a bar layer; each bar carries its up/down class.
    fn draw_bars(&mut self, layer: Layer, bars: &[VolumeBar], scales: &ChartScales);

    /// Render or replace point markers placed by `position` (plot-relative x, y).
    fn draw_markers(
        &mut self,
        layer: Layer,
        events: &[DividendEvent],
        position: &dyn Fn(&DividendEvent) -> (f64, f64),
    );

    fn update_crosshair(&mut self, crosshair: &Crosshair);

    fn remove_layer(&mut self, layer: Layer);

    /// Called whenever scales are rebuilt.
    fn draw_axes(&mut self, _scales: &ChartScales) {}

    fn hide_crosshair(&mut self) {}

    /// User-visible status line. An empty message clears it.
    fn show_status(&mut self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::from_epoch_seconds;

    fn point() -> PricePoint {
        PricePoint {
            date: from_epoch_seconds(1_546_300_800).unwrap(), // 2019-01-01 00:00 UTC, Tuesday
            open: 3_068.76,
            high: 3_080.5,
            low: 3_050.0,
            close: 3_060.251,
            volume: Some(123_456.0),
        }
    }

    #[test]
    fn legend_lists_point_fields() {
        let entries = legend_entries(&point(), Some(3_055.0), "%I:%M %p %a %Y");
        let find = |label: &str| entries.iter().find(|e| e.label == label).unwrap().value.clone();
        assert_eq!(find("date"), "12:00 AM Tue 2019");
        assert_eq!(find("close"), "3060.25");
        assert_eq!(find("volume"), "123456");
        assert_eq!(find("average"), "3055.00");
    }

    #[test]
    fn legend_handles_missing_volume_and_average() {
        let mut p = point();
        p.volume = None;
        let entries = legend_entries(&p, None, "%Y-%m-%d");
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].value, "2019-01-01");
        assert_eq!(entries[5].value, "-");
    }

    #[test]
    fn bad_date_format_falls_back() {
        let entries = legend_entries(&point(), None, "%Q");
        assert!(entries[0].value.starts_with("2019-01-01T00:00:00"));
    }

    #[test]
    fn flags_map_to_layers() {
        assert_eq!(Layer::from(ViewFlag::MovingAverage).id(), "moving-average");
        assert_eq!(Layer::from(ViewFlag::Candlesticks), Layer::Candlesticks);
    }
}
