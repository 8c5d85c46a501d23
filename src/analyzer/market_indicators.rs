use crate::config::IndicatorConfig;
use crate::error::AnalysisError;
use crate::model::{IndicatorSet, PriceSeries};

/// Moving average plus/minus a multiple of the rolling standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl IndicatorConfig {
    /// Minimum number of bars every indicator needs to produce a value.
    pub fn required_bars(&self) -> usize {
        self.ema_slow
            .max(self.ema_fast)
            .max(self.rsi_period + 1)
            .max(self.bollinger_period)
    }
}

/// Simple moving average for every full window of `window_size` values.
pub fn moving_average(data: &[f64], window_size: usize) -> Vec<f64> {
    if window_size == 0 || data.len() < window_size {
        return Vec::new();
    }
    data.windows(window_size)
        .map(|window| window.iter().sum::<f64>() / window_size as f64)
        .collect()
}

/// EMA series seeded with the SMA of the first `period` values.
/// Element `i` corresponds to input index `period - 1 + i`.
pub fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = data[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(data.len() - period + 1);
    out.push(seed);
    let mut prev = seed;
    for &value in &data[period..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

pub fn ema(data: &[f64], period: usize) -> Option<f64> {
    ema_series(data, period).last().copied()
}

/// RSI over the last `period` price changes, using simple averages.
///
/// No losses saturates at 100, no gains at 0, a flat window reads 50.
pub fn rsi(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for w in data[data.len() - period - 1..].windows(2) {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    if gains == 0.0 && losses == 0.0 {
        return Some(50.0);
    }
    if losses == 0.0 {
        return Some(100.0);
    }

    let rs = (gains / period as f64) / (losses / period as f64);
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Population standard deviation.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    // Rounding can leave a tiny negative variance on constant input.
    Some(variance.max(0.0).sqrt())
}

/// Bollinger bands over the last `period` values. Zero variance collapses
/// all three bands onto the mean.
pub fn bollinger(data: &[f64], period: usize, multiplier: f64) -> Option<Bands> {
    if period == 0 || data.len() < period {
        return None;
    }
    let window = &data[data.len() - period..];
    let middle = moving_average(window, period).first().copied()?;
    let sd = std_dev(window)?;
    let width = multiplier.abs() * sd;
    let flat = window.iter().all(|v| *v == window[0]);
    if flat || !width.is_finite() || width == 0.0 {
        return Some(Bands { upper: middle, middle, lower: middle });
    }
    Some(Bands {
        upper: middle + width,
        middle,
        lower: middle - width,
    })
}

/// Computes every indicator for `series`. Fails with `InsufficientData` when
/// the series is shorter than the longest window, and with `Analysis` when a
/// reading is not finite.
pub fn compute_indicators(series: &PriceSeries, cfg: &IndicatorConfig) -> Result<IndicatorSet, AnalysisError> {
    let required = cfg.required_bars();
    if series.len() < required {
        return Err(AnalysisError::InsufficientData {
            required,
            available: series.len(),
        });
    }

    let closes = series.closes();
    let missing = |name: &str| AnalysisError::analysis(format!("{} could not be computed", name));

    let ema_fast = ema(&closes, cfg.ema_fast).ok_or_else(|| missing("ema_fast"))?;
    let ema_slow = ema(&closes, cfg.ema_slow).ok_or_else(|| missing("ema_slow"))?;
    let rsi = rsi(&closes, cfg.rsi_period).ok_or_else(|| missing("rsi"))?;
    let bands = bollinger(&closes, cfg.bollinger_period, cfg.bollinger_multiplier)
        .ok_or_else(|| missing("bollinger"))?;

    let set = IndicatorSet {
        ema_fast,
        ema_slow,
        macd: ema_fast - ema_slow,
        rsi,
        bb_upper: bands.upper,
        bb_middle: bands.middle,
        bb_lower: bands.lower,
        last_close: series.last().close,
    };

    if let Some(name) = set.first_non_finite() {
        return Err(AnalysisError::analysis(format!("{} is not a finite number", name)));
    }
    Ok(set)
}
