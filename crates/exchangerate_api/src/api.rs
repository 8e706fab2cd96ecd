use async_trait::async_trait;
use log::debug;
use rate_model::Currency;
use rate_provider::{LatestRateProvider, ProviderError, mask_secret};
use serde::Deserialize;
use std::collections::HashMap;

const EXCHANGERATE_API_BASE_URL: &str = "https://v6.exchangerate-api.com";

#[derive(Debug, Deserialize)]
struct LatestJSON {
    result: String,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

pub struct ExchangerateAPI {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ExchangerateAPI {
    pub fn new(api_key: String) -> Self {
        ExchangerateAPI {
            base_url: EXCHANGERATE_API_BASE_URL.to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn latest_url(&self, base: &Currency) -> String {
        format!("{}/v6/{}/latest/{}", self.base_url, self.api_key, base)
    }
}

#[async_trait]
impl LatestRateProvider for ExchangerateAPI {
    fn name(&self) -> &'static str {
        "exchangerate-api.com"
    }

    async fn get_rate(&self, base: &Currency, target: &Currency) -> Result<f64, ProviderError> {
        let url = self.latest_url(base);

        debug!("get_rate | url: {}", mask_secret(&url, &self.api_key));

        let body = self.client.get(&url).send().await?.text().await?;
        parse_latest(&body, target)
    }
}

/// Picks `target` out of a `latest` response body.
pub fn parse_latest(body: &str, target: &Currency) -> Result<f64, ProviderError> {
    let json: LatestJSON = serde_json::from_str(body)?;

    if json.result != "success" {
        return Err(ProviderError::Api(
            json.error_type.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    json.conversion_rates
        .get(target.as_str())
        .copied()
        .ok_or_else(|| ProviderError::NotFound(format!("target currency '{}' not found", target)))
}
