use crate::error::AnalysisError;
use crate::model::{PriceBar, PriceSeries};
use crate::parser::RawBar;
use chrono::Duration;

/// Turns provider rows into a valid series: incomplete or non-positive rows
/// are dropped, rows are ordered by time, duplicate timestamps keep the
/// latest row, and only bars within `lookback_minutes` of the newest bar remain.
pub fn normalize_bars(symbol: &str, rows: Vec<RawBar>, lookback_minutes: u32) -> Result<PriceSeries, AnalysisError> {
    let mut bars: Vec<PriceBar> = rows.into_iter().filter_map(normalize_row).collect();

    bars.sort_by_key(|b| b.timestamp);
    // dedup_by keeps the first of each run; reverse so the last delivered row wins
    bars.reverse();
    bars.dedup_by_key(|b| b.timestamp);
    bars.reverse();

    if let Some(newest) = bars.last().map(|b| b.timestamp) {
        let cutoff = newest - Duration::minutes(i64::from(lookback_minutes));
        bars.retain(|b| b.timestamp >= cutoff);
    }

    PriceSeries::new(symbol, bars)
}

fn normalize_row(row: RawBar) -> Option<PriceBar> {
    let timestamp = row.timestamp?;
    let close = positive(row.close?)?;
    let open = row.open.and_then(positive).unwrap_or(close);
    let high = row.high.and_then(positive).unwrap_or(close).max(open).max(close);
    let low = row.low.and_then(positive).unwrap_or(close).min(open).min(close);
    let volume = row.volume.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0);

    Some(PriceBar {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
    })
}

fn positive(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(minute: i64, close: Option<f64>) -> RawBar {
        RawBar {
            timestamp: Some(Utc.timestamp_opt(1_700_000_000 + minute * 60, 0).unwrap()),
            open: close,
            high: close,
            low: close,
            close,
            volume: Some(10.0),
        }
    }

    #[test]
    fn drops_incomplete_rows_and_sorts() {
        let rows = vec![row(2, Some(1.2)), row(0, Some(1.0)), row(1, None), row(3, Some(f64::NAN))];
        let series = normalize_bars("EURUSD=X", rows, 60).unwrap();
        assert_eq!(series.closes(), vec![1.0, 1.2]);
    }

    #[test]
    fn duplicate_timestamps_keep_last_row() {
        let rows = vec![row(0, Some(1.0)), row(1, Some(1.1)), row(1, Some(1.15))];
        let series = normalize_bars("EURUSD=X", rows, 60).unwrap();
        assert_eq!(series.closes(), vec![1.0, 1.15]);
    }

    #[test]
    fn trims_to_lookback_from_newest_bar() {
        let rows = (0..100).map(|m| row(m, Some(1.0 + m as f64 * 0.001))).collect();
        let series = normalize_bars("EURUSD=X", rows, 30).unwrap();
        assert_eq!(series.len(), 31);
        assert_eq!(series.first().timestamp, Utc.timestamp_opt(1_700_000_000 + 69 * 60, 0).unwrap());
    }

    #[test]
    fn nothing_usable_is_data_unavailable() {
        let err = normalize_bars("EURUSD=X", vec![row(0, None)], 30).unwrap_err();
        assert_eq!(err.code(), "DATA_UNAVAILABLE");
    }

    #[test]
    fn missing_open_high_low_fall_back_to_close() {
        let mut r = row(0, Some(1.5));
        r.open = None;
        r.high = None;
        r.low = Some(-1.0);
        let series = normalize_bars("X", vec![r], 10).unwrap();
        let b = series.first();
        assert_eq!((b.open, b.high, b.low), (1.5, 1.5, 1.5));
    }
}
