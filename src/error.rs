use serde::Serialize;
use thiserror::Error;

/// Failures raised by a market-data provider while fetching bars.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("symbol not resolvable: {0}")]
    InvalidSymbol(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited by provider")]
    RateLimited,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("provider returned no rows")]
    Empty,
}

impl ProviderError {
    /// Whether a second attempt has a chance to succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(_) | ProviderError::Timeout | ProviderError::RateLimited => true,
            ProviderError::Status(code) => *code >= 500,
            _ => false,
        }
    }
}

/// Classified analysis failure. Carried inside `AnalysisResult::error`,
/// never raised past `MarketAnalyzer::analyze_market`.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisError {
    #[error("symbol {symbol} is not supported by the data source")]
    InvalidSymbol { symbol: String },

    #[error("market data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("insufficient data: {available} bars, {required} required")]
    InsufficientData { required: usize, available: usize },

    #[error("analysis failed: {reason}")]
    #[serde(rename = "ANALYSIS_ERROR")]
    Analysis { reason: String },
}

impl AnalysisError {
    pub fn data_unavailable(reason: impl Into<String>) -> Self {
        AnalysisError::DataUnavailable { reason: reason.into() }
    }

    pub fn analysis(reason: impl Into<String>) -> Self {
        AnalysisError::Analysis { reason: reason.into() }
    }

    /// Stable taxonomy code for the calling layer.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidSymbol { .. } => "INVALID_SYMBOL",
            AnalysisError::DataUnavailable { .. } => "DATA_UNAVAILABLE",
            AnalysisError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            AnalysisError::Analysis { .. } => "ANALYSIS_ERROR",
        }
    }

    /// `true` when asking again later may help, `false` when the caller
    /// should pick another pair.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AnalysisError::InvalidSymbol { .. })
    }
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidSymbol(symbol) => AnalysisError::InvalidSymbol { symbol },
            other => AnalysisError::DataUnavailable { reason: other.to_string() },
        }
    }
}
