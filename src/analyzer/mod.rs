// Analyzer module: indicator computation, signal derivation and the engine tying them together.

pub mod engine;
pub mod market_indicators;
pub mod signal;

pub use engine::{AnalyzerSettings, MarketAnalyzer};
