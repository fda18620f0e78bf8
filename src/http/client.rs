//! Low-level HTTP client — `OracleHttp`.
//!
//! One method per candle endpoint. Returns domain `Bar`s converted from wire
//! types at this boundary. The feed layer consumes it through the
//! `CandleSource` trait so tests can substitute an in-memory source.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::candles::wire::{OracleCandlesResponse, StatsPricesResponse};
use crate::domain::candles::{Bar, CandleSource};
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::{ChainId, Resolution};

/// HTTP client for the oracle keeper and the legacy stats service.
pub struct OracleHttp {
    oracle_url: String,
    stats_url: String,
    client: Client,
}

impl OracleHttp {
    pub fn new(oracle_url: &str, stats_url: &str) -> Self {
        let builder = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10);

        Self {
            oracle_url: oracle_url.trim_end_matches('/').to_string(),
            stats_url: stats_url.trim_end_matches('/').to_string(),
            client: builder.build().expect("Failed to build HTTP client"),
        }
    }

    // ── Candle endpoints ─────────────────────────────────────────────────

    /// Most recent `count` candles from the oracle keeper, newest-first.
    pub async fn fetch_oracle_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        count: usize,
    ) -> Result<Vec<Bar>, HttpError> {
        let url = format!(
            "{}/prices/candles?tokenSymbol={}&period={}&limit={}",
            self.oracle_url,
            urlencoding::encode(symbol),
            resolution.as_str(),
            count
        );
        let resp: OracleCandlesResponse = self.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.candles.into_iter().map(Bar::from).collect())
    }

    /// Historical candles from the legacy stats service, oldest-first.
    pub async fn fetch_historical_stats(
        &self,
        chain: ChainId,
        symbol: &str,
        resolution: Resolution,
        count: usize,
    ) -> Result<Vec<Bar>, HttpError> {
        let url = format!(
            "{}/api/candles/{}?preferableChainId={}&period={}&limit={}",
            self.stats_url,
            urlencoding::encode(symbol),
            chain,
            resolution.as_str(),
            count
        );
        let resp: StatsPricesResponse = self.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.prices.into_iter().map(Bar::from).collect())
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match retry {
            RetryPolicy::None => {
                return self.do_get(url).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_get::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => config.retries_status(*status),
                        HttpError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                tokio::time::sleep(Duration::from_millis(*ms)).await;
                            }
                            true
                        }
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            re.is_connect() || re.is_timeout() || re.is_request()
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        tokio::time::sleep(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited {
                retry_after_ms: None,
            }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl Clone for OracleHttp {
    fn clone(&self) -> Self {
        Self {
            oracle_url: self.oracle_url.clone(),
            stats_url: self.stats_url.clone(),
            client: self.client.clone(),
        }
    }
}

#[async_trait]
impl CandleSource for OracleHttp {
    async fn fetch_oracle_candles(
        &self,
        symbol: &str,
        resolution: Resolution,
        count: usize,
    ) -> Result<Vec<Bar>, HttpError> {
        OracleHttp::fetch_oracle_candles(self, symbol, resolution, count).await
    }

    async fn fetch_historical_stats(
        &self,
        chain: ChainId,
        symbol: &str,
        resolution: Resolution,
        count: usize,
    ) -> Result<Vec<Bar>, HttpError> {
        OracleHttp::fetch_historical_stats(self, chain, symbol, resolution, count).await
    }
}
