//! Market analysis engine: fetches recent OHLC bars for a currency pair,
//! computes EMA, RSI and Bollinger indicators, and derives a BUY/SELL/NEUTRAL
//! signal rendered in the caller's language.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod i18n;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod provider;
pub mod utils;

pub use analyzer::{AnalyzerSettings, MarketAnalyzer};
pub use error::{AnalysisError, ProviderError};
pub use i18n::Language;
pub use model::{AnalysisResult, Direction, IndicatorSet, PriceBar, PriceSeries, Signal};
