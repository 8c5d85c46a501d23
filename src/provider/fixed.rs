use crate::error::ProviderError;
use crate::model::{FetchRequest, PriceSeries};
use crate::parser::RawBar;
use crate::provider::MarketDataProvider;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider that answers every request from memory. Responses are consumed
/// in order; the last one repeats.
pub struct FixedProvider {
    responses: Vec<Result<Vec<RawBar>, ProviderError>>,
    calls: AtomicUsize,
}

impl FixedProvider {
    pub fn new(responses: Vec<Result<Vec<RawBar>, ProviderError>>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_series(series: &PriceSeries) -> Self {
        Self::new(vec![Ok(to_rows(series))])
    }

    pub fn failing(err: ProviderError) -> Self {
        Self::new(vec![Err(err)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn to_rows(series: &PriceSeries) -> Vec<RawBar> {
    series
        .bars()
        .iter()
        .map(|b| RawBar {
            timestamp: Some(b.timestamp),
            open: Some(b.open),
            high: Some(b.high),
            low: Some(b.low),
            close: Some(b.close),
            volume: Some(b.volume),
        })
        .collect()
}

#[async_trait::async_trait]
impl MarketDataProvider for FixedProvider {
    async fn fetch(&self, _req: &FetchRequest) -> Result<Vec<RawBar>, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(n).or(self.responses.last()) {
            Some(response) => response.clone(),
            None => Err(ProviderError::Empty),
        }
    }
}
