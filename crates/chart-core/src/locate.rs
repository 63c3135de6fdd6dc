// File: crates/chart-core/src/locate.rs
// Summary: Nearest-sample lookup for the crosshair: invert pointer x to a date, then bisect.

use crate::error::{ChartError, Result};
use crate::scale::{Scale, TimeScale};
use crate::series::{Dated, Timestamp};

/// Index of the sample closest to `x0` in a date-ordered series.
///
/// Bisects left starting at index 1, clamps into `[1, len - 1]`, then compares the two
/// neighbours; a tie goes to the earlier one. Positions outside the series resolve to the
/// first or last sample.
pub fn nearest_index<T: Dated>(series: &[T], x0: Timestamp) -> Result<usize> {
    if series.len() < 2 {
        return Err(ChartError::InsufficientData { len: series.len() });
    }
    let i = 1 + series[1..].partition_point(|p| p.date() < x0);
    let i = i.clamp(1, series.len() - 1);
    let before = x0 - series[i - 1].date();
    let after = series[i].date() - x0;
    Ok(if before > after { i } else { i - 1 })
}

/// Sample under plot-relative pointer position `pixel_x`.
pub fn locate<'a, T: Dated>(series: &'a [T], scale: &TimeScale, pixel_x: f64) -> Result<&'a T> {
    let x0 = scale.from_px(pixel_x);
    let i = nearest_index(series, x0)?;
    Ok(&series[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::MovingAveragePoint;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn series(days: &[u32]) -> Vec<MovingAveragePoint> {
        days.iter().map(|&d| MovingAveragePoint { date: day(d), average: d as f64 }).collect()
    }

    #[test]
    fn picks_closer_neighbour() {
        let s = series(&[1, 4, 10]);
        assert_eq!(nearest_index(&s, day(2)).unwrap(), 0);
        assert_eq!(nearest_index(&s, day(3)).unwrap(), 1);
        assert_eq!(nearest_index(&s, day(8)).unwrap(), 2);
    }

    #[test]
    fn tie_goes_to_earlier_point() {
        let s = series(&[1, 3, 5]);
        assert_eq!(nearest_index(&s, day(2)).unwrap(), 0);
        assert_eq!(nearest_index(&s, day(4)).unwrap(), 1);
    }

    #[test]
    fn exact_hit_returns_that_point() {
        let s = series(&[1, 3, 5]);
        assert_eq!(nearest_index(&s, day(3)).unwrap(), 1);
        assert_eq!(nearest_index(&s, day(1)).unwrap(), 0);
        assert_eq!(nearest_index(&s, day(5)).unwrap(), 2);
    }

    #[test]
    fn outside_range_clamps_to_ends() {
        let s = series(&[5, 6, 7]);
        assert_eq!(nearest_index(&s, day(1)).unwrap(), 0);
        assert_eq!(nearest_index(&s, day(30)).unwrap(), 2);
    }

    #[test]
    fn duplicate_dates_resolve_to_first_duplicate() {
        let s = series(&[1, 2, 2, 3]);
        assert_eq!(nearest_index(&s, day(2)).unwrap(), 1);
    }

    #[test]
    fn needs_two_points() {
        assert!(matches!(nearest_index(&series(&[1]), day(1)), Err(ChartError::InsufficientData { len: 1 })));
        assert!(matches!(nearest_index(&series(&[]), day(1)), Err(ChartError::InsufficientData { len: 0 })));
    }

    #[test]
    fn locate_goes_through_scale() {
        let s = series(&[1, 3, 5]);
        let scale = TimeScale::new(day(1), day(5), 0.0, 400.0);
        assert_eq!(locate(&s, &scale, scale.to_px(day(2))).unwrap().date, day(1));
        assert_eq!(locate(&s, &scale, -50.0).unwrap().date, day(1));
        assert_eq!(locate(&s, &scale, 1_000.0).unwrap().date, day(5));
    }
}
