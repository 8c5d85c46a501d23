use chrono::{TimeZone, Utc};
use fx_signal::error::ProviderError;
use fx_signal::i18n::format_result;
use fx_signal::provider::FixedProvider;
use fx_signal::{AnalyzerSettings, Direction, Language, MarketAnalyzer, PriceBar, PriceSeries};
use std::sync::Arc;
use std::time::Duration;

fn series(symbol: &str, closes: impl IntoIterator<Item = f64>) -> PriceSeries {
    let bars = closes
        .into_iter()
        .enumerate()
        .map(|(i, close)| PriceBar {
            timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap(),
            open: close,
            high: close + 0.0002,
            low: close - 0.0002,
            close,
            volume: 100.0,
        })
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

/// Trend of `step` per bar with a zigzag of `swing` on odd bars.
fn zigzag_trend(step: f64, swing: f64) -> Vec<f64> {
    (0..40)
        .map(|i| 1.1 + step * i as f64 + if i % 2 == 1 { swing } else { 0.0 })
        .collect()
}

fn analyzer_for(s: &PriceSeries, lang: &str) -> MarketAnalyzer {
    let settings = AnalyzerSettings {
        retry_delay: Duration::from_millis(1),
        ..AnalyzerSettings::default()
    };
    MarketAnalyzer::new(s.symbol(), Arc::new(FixedProvider::from_series(s)))
        .with_settings(settings)
        .with_language(lang)
}

#[tokio::test]
async fn uptrend_with_room_is_buy() {
    let s = series("EURUSD=X", zigzag_trend(0.0005, 0.002));
    let result = analyzer_for(&s, "en").analyze_market().await;
    let signal = result.signal.expect("signal");
    assert_eq!(signal.direction, Direction::Buy);
    assert!(signal.confidence > 50.0 && signal.confidence <= 100.0);
    assert!(result.message.contains("BUY"));
}

#[tokio::test]
async fn downtrend_with_room_is_sell() {
    let s = series("EURUSD=X", zigzag_trend(-0.0005, -0.002));
    let result = analyzer_for(&s, "ru").analyze_market().await;
    assert_eq!(result.direction(), Some(Direction::Sell));
    assert!(result.message.contains("ПРОДАЖА"));
}

#[tokio::test]
async fn thirty_rising_bars_are_neutral() {
    let s = series("EURUSD=X", (0..30).map(|i| 1.0 + i as f64));
    let result = analyzer_for(&s, "en").analyze_market().await;
    let ind = result.indicators.expect("indicators");
    assert!(ind.ema_fast > ind.ema_slow);
    assert_eq!(ind.rsi, 100.0);
    assert_eq!(result.direction(), Some(Direction::Neutral));
}

#[tokio::test]
async fn direction_is_always_one_of_three() {
    for (step, swing) in [(0.0005, 0.002), (-0.0005, -0.002), (0.0, 0.001), (0.001, 0.0)] {
        let s = series("GBPUSD=X", zigzag_trend(step, swing));
        let result = analyzer_for(&s, "tg").analyze_market().await;
        assert!(!result.is_error());
        assert!(matches!(
            result.direction(),
            Some(Direction::Buy | Direction::Sell | Direction::Neutral)
        ));
    }
}

#[tokio::test]
async fn identical_input_gives_identical_result() {
    let s = series("EURUSD=X", zigzag_trend(0.0003, 0.001));
    let a = analyzer_for(&s, "kk");
    let first = a.analyze_market().await;
    let second = a.analyze_market().await;
    assert_eq!(first.signal, second.signal);
    assert_eq!(first.indicators, second.indicators);
    assert_eq!(first.message, second.message);
}

#[tokio::test]
async fn short_history_is_insufficient_data() {
    let s = series("EURUSD=X", (0..20).map(|i| 1.1 + i as f64 * 0.001));
    let result = analyzer_for(&s, "en").analyze_market().await;
    assert_eq!(result.error.as_ref().map(|e| e.code()), Some("INSUFFICIENT_DATA"));
    assert!(result.signal.is_none());
    assert!(result.indicators.is_none());
}

#[tokio::test]
async fn unsupported_language_falls_back_to_default() {
    let s = series("EURUSD=X", zigzag_trend(0.0005, 0.002));
    let a = analyzer_for(&s, "zz");
    assert_eq!(a.language(), Language::Tg);
    let result = a.analyze_market().await;
    assert!(result.message.contains("ХАРИД"));
}

#[tokio::test]
async fn result_can_be_rendered_in_another_language() {
    let s = series("EURUSD=X", zigzag_trend(0.0005, 0.002));
    let result = analyzer_for(&s, "tg").analyze_market().await;
    let uz = format_result(&result, Language::Uz);
    assert!(uz.contains("SOTIB OLISH"));
    assert_ne!(uz, result.message);
}

#[tokio::test]
async fn invalid_symbol_and_missing_data_are_distinguished() {
    let invalid = MarketAnalyzer::new(
        "NOPE=X",
        Arc::new(FixedProvider::failing(ProviderError::InvalidSymbol("NOPE=X".into()))),
    )
    .analyze_market()
    .await;
    let missing = MarketAnalyzer::new("EURUSD=X", Arc::new(FixedProvider::failing(ProviderError::Empty)))
        .analyze_market()
        .await;

    let invalid_err = invalid.error.expect("error");
    let missing_err = missing.error.expect("error");
    assert_eq!(invalid_err.code(), "INVALID_SYMBOL");
    assert_eq!(missing_err.code(), "DATA_UNAVAILABLE");
    assert!(!invalid_err.is_retryable());
    assert!(missing_err.is_retryable());
    assert_ne!(invalid.message, missing.message);
}

#[tokio::test]
async fn chart_window_is_independent_of_analysis() {
    let s = series("EURUSD=X", zigzag_trend(0.0005, 0.002));
    let a = analyzer_for(&s, "en");
    let chart = a.get_market_data(30).await.unwrap();
    assert_eq!(chart.len(), 31);
    assert_eq!(chart.last(), s.last());
}

#[tokio::test]
async fn concurrent_analyses_use_independent_instances() {
    let handles: Vec<_> = ["tg", "ru", "uz", "kk", "en"]
        .into_iter()
        .map(|lang| {
            let s = series("EURUSD=X", zigzag_trend(0.0005, 0.002));
            let a = analyzer_for(&s, lang);
            tokio::spawn(async move { (lang, a.analyze_market().await) })
        })
        .collect();

    for handle in handles {
        let (lang, result) = handle.await.unwrap();
        assert_eq!(result.language.code(), lang);
        assert_eq!(result.direction(), Some(Direction::Buy));
    }
}
