//! Capabilities the service needs from a rate vendor.
//!
//! Each vendor gets its own crate implementing one or both traits, so the
//! summarizer and the HTTP layer never know which API is behind them.

use async_trait::async_trait;
use rate_model::{Currency, HistoryQuery, InvalidInputError, Series};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The vendor answered but reported a failure.
    #[error("API error: {0}")]
    Api(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Cache error: {0}")]
    Cache(String),
}

#[async_trait]
pub trait RateHistoryProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Daily rates for `query`, ascending by date.
    async fn get_history(&self, query: &HistoryQuery) -> Result<Series, ProviderError>;
}

#[async_trait]
pub trait LatestRateProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// How many `target` one unit of `base` buys right now.
    async fn get_rate(&self, base: &Currency, target: &Currency) -> Result<f64, ProviderError>;
}

/// Replaces the access key in a request URL before it reaches the logs.
pub fn mask_secret(url: &str, secret: &str) -> String {
    if secret.is_empty() {
        return url.to_string();
    }
    url.replace(secret, "***")
}
