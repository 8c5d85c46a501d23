use crate::error::ProviderError;
use crate::model::FetchRequest;
use crate::parser::RawBar;

/// Source of OHLC rows for a symbol and lookback window.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawBar>, ProviderError>;
}
