use crate::i18n::Language;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    pub code: String,
    pub symbol: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_fast: 12,
            ema_slow: 26,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
        }
    }
}

/// Thresholds and weights for turning indicators into a signal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub overbought: f64,
    pub oversold: f64,
    /// Relative EMA separation that counts as full trend strength.
    pub separation_scale: f64,
    pub separation_weight: f64,
    pub extremity_weight: f64,
    /// Relative EMA separation below which the trend counts as flat.
    pub flat_tolerance: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
            separation_scale: 0.001,
            separation_weight: 0.6,
            extremity_weight: 0.4,
            flat_tolerance: 1e-9,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_language: Language,
    pub lookback_minutes: u32,
    pub chart_lookback_minutes: u32,
    pub request_timeout_seconds: u64,
    pub check_interval_seconds: u64,
    pub retry_delay_millis: u64,
    pub indicators: IndicatorConfig,
    pub policy: PolicyConfig,
    pub pairs: Vec<PairConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_language: Language::Tg,
            lookback_minutes: 120,
            chart_lookback_minutes: 30,
            request_timeout_seconds: 15,
            check_interval_seconds: 300,
            retry_delay_millis: 500,
            indicators: IndicatorConfig::default(),
            policy: PolicyConfig::default(),
            pairs: default_pairs(),
        }
    }
}

/// Pairs offered when the config does not list any.
pub fn default_pairs() -> Vec<PairConfig> {
    [
        ("EURUSD", "EUR/USD"),
        ("GBPUSD", "GBP/USD"),
        ("USDJPY", "USD/JPY"),
        ("USDCHF", "USD/CHF"),
        ("AUDUSD", "AUD/USD"),
        ("USDCAD", "USD/CAD"),
        ("NZDUSD", "NZD/USD"),
        ("EURGBP", "EUR/GBP"),
        ("EURCHF", "EUR/CHF"),
        ("EURJPY", "EUR/JPY"),
    ]
    .into_iter()
    .map(|(code, display)| PairConfig {
        code: code.to_string(),
        symbol: format!("{}=X", code),
        display_name: display.to_string(),
    })
    .collect()
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.ema_fast == 0 || self.ema_slow == 0 || self.rsi_period == 0 || self.bollinger_period == 0 {
            return Err("indicator periods must be greater than 0".into());
        }
        if self.ema_fast >= self.ema_slow {
            return Err(format!(
                "ema_fast ({}) must be shorter than ema_slow ({})",
                self.ema_fast, self.ema_slow
            ));
        }
        if !(self.bollinger_multiplier.is_finite() && self.bollinger_multiplier > 0.0) {
            return Err("bollinger_multiplier must be positive".into());
        }
        Ok(())
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.oversold)
            || !(0.0..=100.0).contains(&self.overbought)
            || self.oversold >= self.overbought
        {
            return Err(format!(
                "oversold ({}) must be below overbought ({}) within 0..100",
                self.oversold, self.overbought
            ));
        }
        if !(self.separation_scale.is_finite() && self.separation_scale > 0.0) {
            return Err("separation_scale must be positive".into());
        }
        if !(self.separation_weight >= 0.0 && self.extremity_weight >= 0.0)
            || self.separation_weight + self.extremity_weight <= 0.0
        {
            return Err("policy weights must be non-negative and not both zero".into());
        }
        if !(self.flat_tolerance.is_finite() && self.flat_tolerance >= 0.0) {
            return Err("flat_tolerance must be non-negative".into());
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.indicators.validate()?;
        self.policy.validate()?;
        if self.lookback_minutes == 0 || self.request_timeout_seconds == 0 {
            return Err("lookback_minutes and request_timeout_seconds must be greater than 0".into());
        }
        // One-minute bars are the finest granularity, so the lookback must
        // span at least as many minutes as the longest indicator window.
        let required = self.indicators.required_bars();
        if (self.lookback_minutes as usize) < required {
            return Err(format!(
                "lookback_minutes ({}) is shorter than the {} bars the indicators need",
                self.lookback_minutes, required
            ));
        }
        Ok(())
    }

    pub fn find_pair(&self, code: &str) -> Option<&PairConfig> {
        self.pairs.iter().find(|p| p.code.eq_ignore_ascii_case(code))
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config: AppConfig = serde_json::from_str(content)?;
    if config.pairs.is_empty() {
        config.pairs = default_pairs();
    }
    config.validate()?;
    Ok(config)
}
