use crate::analyzer::market_indicators::compute_indicators;
use crate::analyzer::signal::derive_signal;
use crate::config::{AppConfig, IndicatorConfig, PolicyConfig};
use crate::error::{AnalysisError, ProviderError};
use crate::i18n::{self, Language};
use crate::model::{AnalysisResult, FetchRequest, PriceSeries};
use crate::normalizer::normalize_bars;
use crate::parser::RawBar;
use crate::provider::MarketDataProvider;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Tunables for one analyzer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSettings {
    pub lookback_minutes: u32,
    pub retry_delay: Duration,
    pub indicators: IndicatorConfig,
    pub policy: PolicyConfig,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        AnalyzerSettings::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AnalyzerSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            lookback_minutes: cfg.lookback_minutes,
            retry_delay: Duration::from_millis(cfg.retry_delay_millis),
            indicators: cfg.indicators.clone(),
            policy: cfg.policy.clone(),
        }
    }
}

/// Turns a ticker symbol into a language-formatted trading signal.
///
/// The language only affects the rendered text. `set_language` takes
/// `&mut self`, so an instance shared between tasks has to be serialized
/// by its owner; for concurrent use build one analyzer per request or
/// render with [`i18n::format_result`] and an explicit language.
pub struct MarketAnalyzer {
    symbol: String,
    display_name: Option<String>,
    language: Language,
    provider: Arc<dyn MarketDataProvider>,
    settings: AnalyzerSettings,
}

impl MarketAnalyzer {
    pub fn new(symbol: impl Into<String>, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: None,
            language: Language::default(),
            provider,
            settings: AnalyzerSettings::default(),
        }
    }

    pub fn with_language(mut self, code: &str) -> Self {
        self.set_language(code);
        self
    }

    /// Human-readable pair name used in messages instead of the ticker.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_settings(mut self, settings: AnalyzerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Changes the display language for later formatting. Unknown codes
    /// fall back to the default language.
    pub fn set_language(&mut self, code: &str) {
        self.language = Language::resolve(Some(code), Language::default());
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Fetches bars covering at least `lookback_minutes`. A transient
    /// provider failure is retried once.
    pub async fn get_market_data(&self, lookback_minutes: u32) -> Result<PriceSeries, AnalysisError> {
        let req = FetchRequest {
            symbol: self.symbol.clone(),
            lookback_minutes,
        };
        info!("Fetching {} ({} min)...", req.symbol, lookback_minutes);

        let rows = self.fetch_with_retry(&req).await.map_err(|e| {
            warn!("Market data error for {}: {}", req.symbol, e);
            AnalysisError::from(e)
        })?;

        let series = normalize_bars(&req.symbol, rows, lookback_minutes)?;
        if series.is_empty() {
            return Err(AnalysisError::data_unavailable(format!("no bars for {}", req.symbol)));
        }
        Ok(series)
    }

    async fn fetch_with_retry(&self, req: &FetchRequest) -> Result<Vec<RawBar>, ProviderError> {
        match self.provider.fetch(req).await {
            Err(e) if e.is_transient() => {
                let jitter = Duration::from_millis(rand::rng().random_range(0..=250));
                let delay = self.settings.retry_delay + jitter;
                warn!("Transient error for {} ({}), retrying in {:?}", req.symbol, e, delay);
                sleep(delay).await;
                self.provider.fetch(req).await
            }
            other => other,
        }
    }

    /// Fetch, compute, derive and format. Failures end up in
    /// `AnalysisResult::error`, never as a panic or `Err`.
    pub async fn analyze_market(&self) -> AnalysisResult {
        match self.get_market_data(self.settings.lookback_minutes).await {
            Ok(series) => self.analyze_series(&series),
            Err(err) => self.failure(err),
        }
    }

    /// Analysis of an already fetched series. Deterministic for identical
    /// input apart from `generated_at`.
    pub fn analyze_series(&self, series: &PriceSeries) -> AnalysisResult {
        let indicators = match compute_indicators(series, &self.settings.indicators) {
            Ok(set) => set,
            Err(err) => {
                warn!("Cannot analyze {}: {}", self.symbol, err);
                return self.failure(err);
            }
        };

        let signal = derive_signal(&indicators, &self.settings.policy);
        info!(
            "{}: {} ({:.1}%) rsi={:.1} ema {:.5}/{:.5}",
            self.symbol, signal.direction, signal.confidence, indicators.rsi, indicators.ema_fast, indicators.ema_slow
        );

        let message = i18n::format_signal(self.label(), &signal, &indicators, self.language);
        AnalysisResult {
            symbol: self.symbol.clone(),
            label: self.label().to_string(),
            language: self.language,
            generated_at: Utc::now(),
            signal: Some(signal),
            indicators: Some(indicators),
            message,
            error: None,
        }
    }

    fn failure(&self, err: AnalysisError) -> AnalysisResult {
        AnalysisResult {
            symbol: self.symbol.clone(),
            label: self.label().to_string(),
            language: self.language,
            generated_at: Utc::now(),
            signal: None,
            indicators: None,
            message: i18n::format_error(&err, self.language),
            error: Some(err),
        }
    }
}
