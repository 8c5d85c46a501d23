// Yahoo Finance chart payload decoding
use crate::error::ProviderError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One row as delivered by the provider. Any field may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub timestamp: Option<DateTime<Utc>>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<Option<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub trait Parser {
    fn parse(&self, symbol: &str, body: &str) -> Result<Vec<RawBar>, ProviderError>;
}

pub struct ChartParser;

impl ChartParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChartParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for ChartParser {
    fn parse(&self, symbol: &str, body: &str) -> Result<Vec<RawBar>, ProviderError> {
        let response: ChartResponse =
            serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(err) = response.chart.error {
            return Err(if err.code.eq_ignore_ascii_case("Not Found") {
                ProviderError::InvalidSymbol(symbol.to_string())
            } else {
                ProviderError::InvalidResponse(format!(
                    "{}: {}",
                    err.code,
                    err.description.unwrap_or_default()
                ))
            });
        }

        let result = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or(ProviderError::Empty)?;

        if result.timestamp.is_empty() {
            return Err(ProviderError::Empty);
        }

        let quote = result
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .unwrap_or_default();

        let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

        let rows = result
            .timestamp
            .iter()
            .enumerate()
            .map(|(i, &ts)| RawBar {
                timestamp: ts.and_then(|secs| DateTime::from_timestamp(secs, 0)),
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                volume: at(&quote.volume, i),
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "EURUSD=X", "currency": "USD" },
                "timestamp": [1700000000, 1700000060, 1700000120],
                "indicators": { "quote": [{
                    "open":   [1.0851, 1.0852, null],
                    "high":   [1.0853, 1.0854, 1.0856],
                    "low":    [1.0850, 1.0851, 1.0852],
                    "close":  [1.0852, 1.0853, 1.0855],
                    "volume": [0, 0, 0]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_rows_with_gaps() {
        let rows = ChartParser::new().parse("EURUSD=X", OK_BODY).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].close, Some(1.0852));
        assert_eq!(rows[2].open, None);
        assert_eq!(rows[1].timestamp.unwrap().timestamp(), 1_700_000_060);
    }

    #[test]
    fn not_found_is_invalid_symbol() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = ChartParser::new().parse("NOPE=X", body).unwrap_err();
        assert_eq!(err, ProviderError::InvalidSymbol("NOPE=X".into()));
    }

    #[test]
    fn missing_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert_eq!(ChartParser::new().parse("EURUSD=X", body).unwrap_err(), ProviderError::Empty);
    }

    #[test]
    fn garbage_is_invalid_response() {
        let err = ChartParser::new().parse("EURUSD=X", "<html>").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
