// File: crates/chart-core/src/indicators.rs
// Summary: Derived series: trailing moving average over closes and up/down volume classification.

use crate::series::{MovingAveragePoint, PricePoint, Series, Timestamp};

/// Trailing moving average of closes.
///
/// Point `i` averages closes in `[max(0, i - window), i]`, so the first points use a
/// shorter, growing window and the rest use `window + 1` closes. The result has the
/// same length and dates as `series`.
pub fn moving_average(series: &[PricePoint], window: usize) -> Series<MovingAveragePoint> {
    let mut out = Vec::with_capacity(series.len());
    let mut sum = 0.0f64;
    for (i, p) in series.iter().enumerate() {
        sum += p.close;
        if i > window {
            sum -= series[i - window - 1].close;
        }
        let len = (i - i.saturating_sub(window) + 1) as f64;
        out.push(MovingAveragePoint { date: p.date, average: sum / len });
    }
    Series::new(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolumeClass {
    Up,
    Down,
}

/// Volume bar ready for drawing; points without a volume produce no bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeBar {
    pub date: Timestamp,
    pub volume: f64,
    pub class: VolumeClass,
}

/// Up when the close did not fall versus the previous point. The first point is always up.
pub fn classify_volume(series: &[PricePoint]) -> Vec<VolumeClass> {
    series
        .iter()
        .enumerate()
        .map(|(i, p)| match i {
            0 => VolumeClass::Up,
            _ if series[i - 1].close <= p.close => VolumeClass::Up,
            _ => VolumeClass::Down,
        })
        .collect()
}

pub fn volume_bars(series: &[PricePoint]) -> Vec<VolumeBar> {
    series
        .iter()
        .zip(classify_volume(series))
        .filter_map(|(p, class)| p.volume.map(|volume| VolumeBar { date: p.date, volume, class }))
        .collect()
}
