use fx_signal::config::{load_config, AppConfig, PairConfig};
use fx_signal::provider::{MarketDataProvider, YahooProvider};
use fx_signal::{AnalyzerSettings, MarketAnalyzer};
use futures::future::join_all;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: Arc<AppConfig> = match load_config(&path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error ({}): {}", path, e);
            return;
        }
    };

    let provider: Arc<dyn MarketDataProvider> =
        match YahooProvider::new(Duration::from_secs(config.request_timeout_seconds)) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                error!("Failed to create market data provider: {}", e);
                return;
            }
        };

    info!("🚀 fx-signal started, {} pairs configured", config.pairs.len());

    loop {
        let tasks: Vec<_> = config
            .pairs
            .iter()
            .map(|pair| process_pair(pair, provider.clone(), config.clone()))
            .collect();
        join_all(tasks).await;

        info!("Waiting {}s until the next check...", config.check_interval_seconds);
        tokio::select! {
            _ = sleep(Duration::from_secs(config.check_interval_seconds)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                return;
            }
        }
    }
}

/// Analyzes one pair and fetches the chart window the renderer would use.
async fn process_pair(pair: &PairConfig, provider: Arc<dyn MarketDataProvider>, config: Arc<AppConfig>) {
    let analyzer = MarketAnalyzer::new(pair.symbol.clone(), provider)
        .with_display_name(pair.display_name.clone())
        .with_settings(AnalyzerSettings::from(config.as_ref()))
        .with_language(config.default_language.code());

    info!("⏳ {} {}", pair.display_name, analyzer.language().messages().analyzing);
    let result = analyzer.analyze_market().await;
    if let Some(err) = &result.error {
        warn!("{} [{}]: {}", pair.display_name, err.code(), err);
        return;
    }
    info!("{}\n{}", pair.display_name, result.message);

    match analyzer.get_market_data(config.chart_lookback_minutes).await {
        Ok(series) => info!(
            "{}: {} chart bars from {} to {}",
            pair.display_name,
            series.len(),
            series.first().timestamp,
            series.last().timestamp
        ),
        Err(e) => warn!("{}: chart data unavailable: {}", pair.display_name, e),
    }
}
