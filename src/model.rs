// Core structs: PriceBar, PriceSeries, Signal, IndicatorSet, AnalysisResult
use crate::error::AnalysisError;
use crate::i18n::Language;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Chronological bars for one symbol. Never empty, timestamps strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, AnalysisError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(AnalysisError::data_unavailable(format!("no bars for {}", symbol)));
        }
        if let Some(w) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(AnalysisError::data_unavailable(format!(
                "bars for {} out of order at {}",
                symbol, w[1].timestamp
            )));
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub symbol: String,
    pub lookback_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::Neutral => "NEUTRAL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub direction: Direction,
    /// 0..=100
    pub confidence: f64,
    pub supporting_indicators: BTreeMap<String, f64>,
}

/// Indicator readings computed once per series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub rsi: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub last_close: f64,
}

impl IndicatorSet {
    pub fn readings(&self) -> [(&'static str, f64); 8] {
        [
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("macd", self.macd),
            ("rsi", self.rsi),
            ("bb_upper", self.bb_upper),
            ("bb_middle", self.bb_middle),
            ("bb_lower", self.bb_lower),
            ("last_close", self.last_close),
        ]
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.readings()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Name of the first reading that is not a finite number.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.readings()
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(n, _)| n)
    }
}

/// Outcome of one analysis request. Either `signal` and `indicators` are
/// set, or `error` is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    /// Name the message refers to: the pair's display name, else the symbol.
    pub label: String,
    pub language: Language,
    pub generated_at: DateTime<Utc>,
    pub signal: Option<Signal>,
    pub indicators: Option<IndicatorSet>,
    pub message: String,
    pub error: Option<AnalysisError>,
}

impl AnalysisResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.signal.as_ref().map(|s| s.direction)
    }
}
