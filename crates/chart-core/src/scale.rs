// File: crates/chart-core/src/scale.rs
// Summary: Time (X) and value (Y) scales mapping data domains onto plot pixels, with inverses.

use chrono::Duration;

use crate::error::{ChartError, Result};
use crate::series::{Dated, MovingAveragePoint, PricePoint, Timestamp};
use crate::types::PlotArea;
use crate::view::ViewFlags;

/// Domain-to-pixel mapping shared by time and value scales.
pub trait Scale {
    type Domain: Copy;
    fn domain(&self) -> (Self::Domain, Self::Domain);
    /// Pixels for the domain's (min, max) in that order.
    fn range(&self) -> (f64, f64);
    fn to_px(&self, v: Self::Domain) -> f64;
    fn from_px(&self, px: f64) -> Self::Domain;
}

/// Horizontal date scale; earlier dates sit further left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    start: Timestamp,
    end: Timestamp,
    left_px: f64,
    right_px: f64,
}

impl TimeScale {
    /// Zero-width domains are widened by one second.
    pub fn new(start: Timestamp, end: Timestamp, left_px: f64, right_px: f64) -> Self {
        let (start, end) = if end <= start { (start, start + Duration::seconds(1)) } else { (start, end) };
        Self { start, end, left_px, right_px }
    }

    fn span_ms(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64
    }

    /// `n` evenly spaced dates across the domain.
    pub fn ticks(&self, n: usize) -> Vec<Timestamp> {
        let span = self.span_ms();
        linspace(0.0, span, n)
            .into_iter()
            .map(|ms| self.start + Duration::milliseconds(ms.round() as i64))
            .collect()
    }
}

impl Scale for TimeScale {
    type Domain = Timestamp;

    fn domain(&self) -> (Timestamp, Timestamp) { (self.start, self.end) }
    fn range(&self) -> (f64, f64) { (self.left_px, self.right_px) }

    #[inline]
    fn to_px(&self, d: Timestamp) -> f64 {
        let frac = (d - self.start).num_milliseconds() as f64 / self.span_ms();
        self.left_px + frac * (self.right_px - self.left_px)
    }

    /// Pixels outside the range resolve to the nearest domain end.
    #[inline]
    fn from_px(&self, px: f64) -> Timestamp {
        let width = self.right_px - self.left_px;
        let frac = if width.abs() < f64::EPSILON { 0.0 } else { (px - self.left_px) / width };
        let frac = if frac.is_nan() { 0.0 } else { frac.clamp(0.0, 1.0) };
        self.start + Duration::milliseconds((frac * self.span_ms()).round() as i64)
    }
}

/// Vertical value scale: `vmin` maps to `bottom_px`, `vmax` to `top_px`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    vmin: f64,
    vmax: f64,
    top_px: f64,
    bottom_px: f64,
}

impl LinearScale {
    /// Zero-width domains are widened by 1.0.
    pub fn new(vmin: f64, vmax: f64, top_px: f64, bottom_px: f64) -> Self {
        let vmax = if (vmax - vmin).abs() < 1e-12 { vmin + 1.0 } else { vmax };
        Self { vmin, vmax, top_px, bottom_px }
    }

    pub fn ticks(&self, n: usize) -> Vec<f64> {
        linspace(self.vmin, self.vmax, n)
    }
}

impl Scale for LinearScale {
    type Domain = f64;

    fn domain(&self) -> (f64, f64) { (self.vmin, self.vmax) }
    fn range(&self) -> (f64, f64) { (self.bottom_px, self.top_px) }

    #[inline]
    fn to_px(&self, y: f64) -> f64 {
        let frac = (y - self.vmin) / (self.vmax - self.vmin);
        self.bottom_px - frac * (self.bottom_px - self.top_px)
    }

    #[inline]
    fn from_px(&self, py: f64) -> f64 {
        let height = self.bottom_px - self.top_px;
        let frac = if height.abs() < f64::EPSILON { 0.0 } else { (self.bottom_px - py) / height };
        self.vmin + frac * (self.vmax - self.vmin)
    }
}

/// Time scale over the series' full date extent, mapped onto `[left, right]`.
pub fn compute_time_scale<T: Dated>(series: &[T], (left, right): (f64, f64)) -> Result<TimeScale> {
    let mut dates = series.iter().map(Dated::date);
    let first = dates.next().ok_or(ChartError::EmptyDataset)?;
    let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Ok(TimeScale::new(lo, hi, left, right))
}

/// Linear scale over `[min - pad, max]` of the finite `values`, with the vertical
/// pixel interval `[top, bottom]` inverted so larger values sit higher.
pub fn compute_linear_scale<I>(values: I, (top, bottom): (f64, f64), pad: f64) -> Result<LinearScale>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or(ChartError::EmptyDataset)?;
    Ok(LinearScale::new(lo - pad, hi, top, bottom))
}

/// The scales live for one dataset + period + viewport combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartScales {
    pub time: TimeScale,
    pub price: LinearScale,
    /// Absent when no displayed point carries a volume.
    pub volume: Option<LinearScale>,
    pub plot: PlotArea,
}

impl ChartScales {
    /// Price domain covers the layers currently shown: closes, averages, or
    /// lows/highs for OHLC and candlesticks. Closes are used when nothing is shown.
    pub fn build(
        quotes: &[PricePoint],
        moving_average: Option<&[MovingAveragePoint]>,
        flags: &ViewFlags,
        plot: PlotArea,
        price_pad: f64,
        volume_ratio: f64,
    ) -> Result<Self> {
        let time = compute_time_scale(quotes, (0.0, plot.width))?;

        let averages = moving_average.filter(|_| flags.show_moving_average);
        let mut prices = Vec::with_capacity(quotes.len() * 2);
        if flags.shows_ranges() {
            prices.extend(quotes.iter().flat_map(|p| [p.low, p.high]));
        }
        if let Some(ma) = averages {
            prices.extend(ma.iter().map(|p| p.average));
        }
        if flags.show_close || prices.is_empty() {
            prices.extend(quotes.iter().map(|p| p.close));
        }
        let price = compute_linear_scale(prices, (0.0, plot.height), price_pad)?;

        let volume = if volume_ratio > 0.0 && quotes.iter().any(|p| p.volume.is_some()) {
            let top = plot.height * (1.0 - volume_ratio);
            let volumes = quotes.iter().filter_map(|p| p.volume);
            Some(compute_linear_scale(std::iter::once(0.0).chain(volumes), (top, plot.height), 0.0)?)
        } else {
            None
        };

        Ok(Self { time, price, volume, plot })
    }
}

fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps as f64 - 1.0);
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}
