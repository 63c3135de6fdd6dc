// File: crates/chart-core/src/series.rs
// Summary: Series model for price points, dividend events and derived moving-average points.
// Notes:
// - A `Series` is built once and never mutated; dataset or period changes build a new one.
// - Points are expected in non-decreasing date order. The order comes from the feed and
//   is not re-sorted here.

use std::ops::Deref;

use chrono::{DateTime, Utc};

pub type Timestamp = DateTime<Utc>;

/// Anything positioned on the time axis.
pub trait Dated {
    fn date(&self) -> Timestamp;
}

/// One OHLCV sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricePoint {
    pub date: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl PricePoint {
    /// All four prices present, finite and non-zero.
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite() && *v != 0.0)
    }
}

impl Dated for PricePoint {
    fn date(&self) -> Timestamp { self.date }
}

/// Dividend paid on `date`. Kept apart from the price series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DividendEvent {
    pub date: Timestamp,
    /// Cash amount per share as reported by the feed.
    pub amount: f64,
}

impl Dated for DividendEvent {
    fn date(&self) -> Timestamp { self.date }
}

/// Moving-average sample, index-aligned with its source series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovingAveragePoint {
    pub date: Timestamp,
    pub average: f64,
}

impl Dated for MovingAveragePoint {
    fn date(&self) -> Timestamp { self.date }
}

/// (date, value) pair handed to line layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePoint {
    pub date: Timestamp,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series<T> {
    points: Vec<T>,
}

impl<T> Series<T> {
    pub fn new(points: Vec<T>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.points
    }

    pub fn into_vec(self) -> Vec<T> {
        self.points
    }
}

impl<T: Dated> Series<T> {
    /// Earliest and latest dates, scanning every point.
    pub fn date_bounds(&self) -> Option<(Timestamp, Timestamp)> {
        let mut iter = self.points.iter().map(Dated::date);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    pub fn is_date_ordered(&self) -> bool {
        self.points.windows(2).all(|w| w[0].date() <= w[1].date())
    }
}

impl Series<PricePoint> {
    pub fn close_line(&self) -> Vec<LinePoint> {
        self.points.iter().map(|p| LinePoint { date: p.date, value: p.close }).collect()
    }
}

impl Series<MovingAveragePoint> {
    pub fn average_line(&self) -> Vec<LinePoint> {
        self.points.iter().map(|p| LinePoint { date: p.date, value: p.average }).collect()
    }
}

impl<T> Default for Series<T> {
    fn default() -> Self { Self::empty() }
}

impl<T> Deref for Series<T> {
    type Target = [T];
    fn deref(&self) -> &[T] { &self.points }
}

impl<T> From<Vec<T>> for Series<T> {
    fn from(points: Vec<T>) -> Self { Self::new(points) }
}

impl<T> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Epoch seconds to UTC timestamp; `None` when out of chrono's range.
pub fn from_epoch_seconds(secs: i64) -> Option<Timestamp> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(secs: i64, close: f64) -> PricePoint {
        PricePoint {
            date: from_epoch_seconds(secs).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    #[test]
    fn completeness_rejects_zero_and_nan() {
        assert!(point(0, 1.0).is_complete());
        assert!(!point(0, 0.0).is_complete());
        let mut p = point(0, 1.0);
        p.high = f64::NAN;
        assert!(!p.is_complete());
    }

    #[test]
    fn date_bounds_scan_all_points() {
        let s: Series<PricePoint> = vec![point(30, 1.0), point(10, 1.0), point(20, 1.0)].into();
        let (lo, hi) = s.date_bounds().unwrap();
        assert_eq!(lo.timestamp(), 10);
        assert_eq!(hi.timestamp(), 30);
        assert!(!s.is_date_ordered());
        assert!(Series::<PricePoint>::empty().date_bounds().is_none());
    }

    #[test]
    fn close_line_maps_close() {
        let s: Series<PricePoint> = vec![point(1, 2.0), point(2, 3.0)].into();
        let line = s.close_line();
        assert_eq!(line.len(), 2);
        assert_eq!(line[1].value, 3.0);
    }
}
