use async_trait::async_trait;
use log::debug;
use rate_model::{HistoryQuery, Sample, Series};
use rate_provider::{ProviderError, RateHistoryProvider, mask_secret};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

const EXCHANGERATE_HOST_BASE_URL: &str = "http://api.exchangerate.host";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct TimeframeJSON {
    success: bool,
    #[serde(default)]
    quotes: BTreeMap<String, HashMap<String, f64>>,
    error: Option<ErrorJSON>,
}

#[derive(Debug, Deserialize)]
struct ErrorJSON {
    #[serde(default)]
    code: i64,
    #[serde(rename = "type", default)]
    kind: String,
    info: Option<String>,
}

pub struct ExchangerateHostAPI {
    base_url: String,
    access_key: String,
    client: reqwest::Client,
}

impl ExchangerateHostAPI {
    pub fn new(access_key: String) -> Self {
        ExchangerateHostAPI {
            base_url: EXCHANGERATE_HOST_BASE_URL.to_string(),
            access_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn timeframe_url(&self, query: &HistoryQuery) -> String {
        format!(
            "{}/timeframe?access_key={}&source={}&currencies={}&start_date={}&end_date={}",
            self.base_url,
            self.access_key,
            query.base,
            query.target,
            query.start_date.format(DATE_FORMAT),
            query.end_date.format(DATE_FORMAT)
        )
    }
}

#[async_trait]
impl RateHistoryProvider for ExchangerateHostAPI {
    fn name(&self) -> &'static str {
        "exchangerate.host"
    }

    async fn get_history(&self, query: &HistoryQuery) -> Result<Series, ProviderError> {
        let url = self.timeframe_url(query);

        debug!("get_history | url: {}", mask_secret(&url, &self.access_key));

        let body = self.client.get(&url).send().await?.text().await?;
        parse_timeframe(&body, query)
    }
}

/// Turns a `timeframe` response body into a validated series for `query`'s pair.
pub fn parse_timeframe(body: &str, query: &HistoryQuery) -> Result<Series, ProviderError> {
    let json: TimeframeJSON = serde_json::from_str(body)?;

    if !json.success {
        let message = match json.error {
            Some(error) => match error.info {
                Some(info) => format!("{} ({}): {}", error.kind, error.code, info),
                None => format!("{} ({})", error.kind, error.code),
            },
            None => "unknown error".to_string(),
        };
        return Err(ProviderError::Api(message));
    }

    let pair = query.pair();
    let mut samples = Vec::with_capacity(json.quotes.len());
    for (date, quotes) in &json.quotes {
        let rate = quotes
            .get(&pair)
            .ok_or_else(|| ProviderError::NotFound(format!("{} on {}", pair, date)))?;
        samples.push(Sample::parse(date, *rate)?);
    }
    samples.sort_by_key(|sample| sample.date);

    debug!("parse_timeframe | pair: {} | samples: {}", pair, samples.len());

    Ok(Series::new(samples)?)
}
