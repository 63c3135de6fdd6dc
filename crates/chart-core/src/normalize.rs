// File: crates/chart-core/src/normalize.rs
// Summary: Zips the feed's parallel arrays into an ordered price series and extracts dividends.

use tracing::{debug, warn};

use crate::error::{ChartError, Result};
use crate::feed::{ChartResult, QuoteArrays, RawFeed};
use crate::series::{from_epoch_seconds, DividendEvent, PricePoint, Series};

/// Output of [`normalize`]: price points and dividends, each in date order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedFeed {
    pub quotes: Series<PricePoint>,
    pub dividends: Series<DividendEvent>,
}

/// Build the canonical series from a parsed feed.
///
/// Rows with a missing timestamp or an incomplete OHLC tuple are dropped.
/// Source order is preserved; the feed is assumed to be sorted by date.
pub fn normalize(feed: &RawFeed) -> Result<NormalizedFeed> {
    let result = first_result(feed)?;

    let timestamps = result
        .timestamp
        .as_deref()
        .ok_or_else(|| malformed("missing `timestamp` array"))?;
    let quote = result
        .indicators
        .as_ref()
        .and_then(|ind| ind.quote.first())
        .ok_or_else(|| malformed("missing `indicators.quote[0]`"))?;
    let cols = QuoteColumns::from_arrays(quote, timestamps.len())?;

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(date) = ts.and_then(from_epoch_seconds) else { continue };
        let (Some(open), Some(high), Some(low), Some(close)) =
            (cols.open[i], cols.high[i], cols.low[i], cols.close[i])
        else {
            continue;
        };
        let volume = cols.volume[i].filter(|v| v.is_finite());
        let point = PricePoint { date, open, high, low, close, volume };
        if point.is_complete() {
            points.push(point);
        }
    }

    let dropped = timestamps.len() - points.len();
    if dropped > 0 {
        warn!(dropped, total = timestamps.len(), "dropped incomplete quote rows");
    }

    let quotes = Series::new(points);
    if !quotes.is_date_ordered() {
        warn!("feed quotes are not in date order; nearest-point lookup may be inaccurate");
    }

    let dividends = extract_dividends(result);
    debug!(quotes = quotes.len(), dividends = dividends.len(), "normalized feed");
    Ok(NormalizedFeed { quotes, dividends })
}

fn first_result(feed: &RawFeed) -> Result<&ChartResult> {
    let chart = feed.chart.as_ref().ok_or_else(|| malformed("missing `chart`"))?;
    if let Some(err) = &chart.error {
        let detail = err
            .description
            .clone()
            .or_else(|| err.code.clone())
            .unwrap_or_else(|| "unspecified provider error".to_string());
        return Err(malformed(&format!("provider error: {detail}")));
    }
    chart
        .result
        .as_ref()
        .and_then(|r| r.first())
        .ok_or_else(|| malformed("missing `chart.result[0]`"))
}

struct QuoteColumns<'a> {
    open: &'a [Option<f64>],
    high: &'a [Option<f64>],
    low: &'a [Option<f64>],
    close: &'a [Option<f64>],
    volume: &'a [Option<f64>],
}

impl<'a> QuoteColumns<'a> {
    fn from_arrays(q: &'a QuoteArrays, expected: usize) -> Result<Self> {
        let column = |name: &str, col: &'a Option<Vec<Option<f64>>>| -> Result<&'a [Option<f64>]> {
            let col = col.as_deref().ok_or_else(|| malformed(&format!("missing `{name}` array")))?;
            if col.len() != expected {
                return Err(malformed(&format!(
                    "`{name}` has {} entries, `timestamp` has {expected}",
                    col.len()
                )));
            }
            Ok(col)
        };
        Ok(Self {
            open: column("open", &q.open)?,
            high: column("high", &q.high)?,
            low: column("low", &q.low)?,
            close: column("close", &q.close)?,
            volume: column("volume", &q.volume)?,
        })
    }
}

fn extract_dividends(result: &ChartResult) -> Series<DividendEvent> {
    let Some(events) = &result.events else { return Series::empty() };
    let mut out: Vec<DividendEvent> = events
        .dividends
        .values()
        .filter(|d| d.amount.is_finite())
        .filter_map(|d| from_epoch_seconds(d.date).map(|date| DividendEvent { date, amount: d.amount }))
        .collect();
    out.sort_by_key(|d| d.date);
    Series::new(out)
}

fn malformed(msg: &str) -> ChartError {
    ChartError::MalformedFeed(msg.to_string())
}
