// File: crates/chart-core/src/period.rs
// Summary: Period presets and the inclusive date-range filter shared by quotes and dividends.

use std::str::FromStr;

use chrono::{Datelike, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::series::{Dated, Series, Timestamp};

/// Which slice of the loaded dataset to display. Presets count back from the
/// dataset's last date, not from the wall clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    All,
    Days(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Range { start: Timestamp, end: Timestamp },
}

impl Period {
    /// Inclusive `[start, end]` window for a dataset spanning `first..=last`.
    pub fn window(&self, first: Timestamp, last: Timestamp) -> (Timestamp, Timestamp) {
        match *self {
            Period::All => (first, last),
            Period::Days(n) => (last.checked_sub_signed(Duration::days(i64::from(n))).unwrap_or(first), last),
            Period::Months(n) => (back_months(last, n, first), last),
            Period::Years(n) => (back_months(last, n.saturating_mul(12), first), last),
            Period::YearToDate => {
                let start = Utc
                    .with_ymd_and_hms(last.year(), 1, 1, 0, 0, 0)
                    .single()
                    .unwrap_or(first);
                (start, last)
            }
            Period::Range { start, end } => (start, end),
        }
    }
}

fn back_months(last: Timestamp, n: u32, fallback: Timestamp) -> Timestamp {
    last.checked_sub_months(Months::new(n)).unwrap_or(fallback)
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized period `{0}` (expected all, ytd, or a count with d/m/y such as 6m)")]
pub struct ParsePeriodError(String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        match t.as_str() {
            "all" | "max" => return Ok(Period::All),
            "ytd" => return Ok(Period::YearToDate),
            _ => {}
        }
        let err = || ParsePeriodError(s.to_string());
        if !t.is_ascii() {
            return Err(err());
        }
        let (digits, unit) = t.split_at(t.len().saturating_sub(1));
        let n: u32 = digits.parse().map_err(|_| err())?;
        match unit {
            "d" => Ok(Period::Days(n)),
            "m" => Ok(Period::Months(n)),
            "y" => Ok(Period::Years(n)),
            _ => Err(err()),
        }
    }
}

/// Keep points with `start <= date <= end`, preserving order.
pub fn filter_by_period<T: Dated + Clone>(series: &[T], start: Timestamp, end: Timestamp) -> Series<T> {
    series
        .iter()
        .filter(|p| {
            let d = p.date();
            start <= d && d <= end
        })
        .cloned()
        .collect()
}
