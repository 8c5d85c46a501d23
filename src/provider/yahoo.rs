use crate::error::ProviderError;
use crate::model::FetchRequest;
use crate::parser::{ChartParser, Parser, RawBar};
use crate::provider::MarketDataProvider;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Bar interval and history range requested for a lookback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Granularity {
    pub interval: &'static str,
    pub range: &'static str,
}

impl Granularity {
    pub fn for_lookback(lookback_minutes: u32) -> Self {
        const DAY: u32 = 24 * 60;
        if lookback_minutes <= 5 * DAY {
            Self { interval: "1m", range: "5d" }
        } else if lookback_minutes <= 60 * DAY {
            Self { interval: "15m", range: "60d" }
        } else {
            Self { interval: "1h", range: "2y" }
        }
    }
}

pub struct YahooProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
    parser: ChartParser,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) FxSignal/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            timeout,
            parser: ChartParser::new(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_url(&self, req: &FetchRequest) -> String {
        let g = Granularity::for_lookback(req.lookback_minutes);
        format!(
            "{}/{}?interval={}&range={}",
            self.base_url.trim_end_matches('/'),
            req.symbol.trim(),
            g.interval,
            g.range
        )
    }

    async fn get_body(&self, url: &str) -> Result<(StatusCode, String), ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e.to_string())
                }
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawBar>, ProviderError> {
        if req.symbol.trim().is_empty() {
            return Err(ProviderError::InvalidSymbol(req.symbol.clone()));
        }
        let url = self.build_url(req);
        debug!("GET {}", url);

        // The client timeout covers a single request; this bounds the body read too.
        let (status, body) = match timeout(self.timeout, self.get_body(&url)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("⏳ Chart request for {} timed out", req.symbol);
                return Err(ProviderError::Timeout);
            }
        };

        match status {
            StatusCode::NOT_FOUND => Err(ProviderError::InvalidSymbol(req.symbol.clone())),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
            // Yahoo answers unknown symbols with a JSON error body on some 4xx codes.
            s if s.is_success() || s.is_client_error() => match self.parser.parse(&req.symbol, &body) {
                Err(ProviderError::InvalidResponse(_)) if !s.is_success() => Err(ProviderError::Status(s.as_u16())),
                other => other,
            },
            s => {
                warn!("❌ Chart request for {} failed [{}]", req.symbol, s);
                Err(ProviderError::Status(s.as_u16()))
            }
        }
    }
}
