use crate::config::PolicyConfig;
use crate::model::{Direction, IndicatorSet, Signal};
use crate::utils::round_to;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Momentum {
    Overbought,
    Oversold,
    Normal,
}

/// Relative gap between the fast and slow EMA, 0 when the slow EMA is 0.
fn separation(ind: &IndicatorSet) -> f64 {
    let gap = ((ind.ema_fast - ind.ema_slow) / ind.ema_slow).abs();
    if gap.is_finite() { gap } else { 0.0 }
}

/// EMAs closer than `flat_tolerance` (relative) are flat, so recurrence
/// rounding on a constant series never picks a direction.
pub fn trend(ind: &IndicatorSet, policy: &PolicyConfig) -> Trend {
    if separation(ind) <= policy.flat_tolerance {
        Trend::Flat
    } else if ind.ema_fast > ind.ema_slow {
        Trend::Bullish
    } else if ind.ema_fast < ind.ema_slow {
        Trend::Bearish
    } else {
        Trend::Flat
    }
}

pub fn momentum(rsi: f64, policy: &PolicyConfig) -> Momentum {
    if rsi >= policy.overbought {
        Momentum::Overbought
    } else if rsi <= policy.oversold {
        Momentum::Oversold
    } else {
        Momentum::Normal
    }
}

/// Weighted strength in 0..=1 from EMA separation and RSI distance from 50.
/// Monotonic in both inputs.
pub fn strength(ind: &IndicatorSet, policy: &PolicyConfig) -> f64 {
    let gap = separation(ind);
    let separation = if policy.separation_scale > 0.0 {
        (gap / policy.separation_scale).clamp(0.0, 1.0)
    } else if gap > 0.0 {
        1.0
    } else {
        0.0
    };
    let extremity = ((ind.rsi - 50.0).abs() / 50.0).clamp(0.0, 1.0);

    let total = policy.separation_weight + policy.extremity_weight;
    if !(total > 0.0) {
        return 0.0;
    }
    let score = (policy.separation_weight * separation + policy.extremity_weight * extremity) / total;
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Derives a signal from indicator agreement.
///
/// A bullish crossover that is not overbought gives BUY, a bearish one that
/// is not oversold gives SELL, both scored in 50..=100. Everything else is
/// NEUTRAL scored in 0..=50.
pub fn derive_signal(ind: &IndicatorSet, policy: &PolicyConfig) -> Signal {
    let direction = match (trend(ind, policy), momentum(ind.rsi, policy)) {
        (Trend::Bullish, m) if m != Momentum::Overbought => Direction::Buy,
        (Trend::Bearish, m) if m != Momentum::Oversold => Direction::Sell,
        _ => Direction::Neutral,
    };

    let score = strength(ind, policy);
    let confidence = match direction {
        Direction::Buy | Direction::Sell => 50.0 + 50.0 * score,
        Direction::Neutral => 50.0 * score,
    };
    let confidence = round_to(confidence.clamp(0.0, 100.0), 1);

    let supporting_indicators: BTreeMap<String, f64> = ["ema_fast", "ema_slow", "rsi"]
        .into_iter()
        .filter_map(|name| ind.get(name).map(|v| (name.to_string(), v)))
        .collect();

    Signal {
        direction,
        confidence,
        supporting_indicators,
    }
}
