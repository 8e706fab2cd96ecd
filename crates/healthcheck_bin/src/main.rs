use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HEALTHCHECK_URL: &str = "http://localhost:8080/healthcheck";

#[derive(Debug, Error)]
enum HealthcheckError {
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Status code {0} from {1}")]
    BadStatus(u16, String),

    #[error("Service reported status '{0}'")]
    NotOk(String),
}

#[derive(Debug, Deserialize)]
struct StatusJSON {
    status: String,
}

fn healthcheck_url(configured: Option<String>) -> String {
    configured
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_HEALTHCHECK_URL.to_string())
}

fn check_status(status: StatusJSON) -> Result<(), HealthcheckError> {
    if status.status != "ok" {
        return Err(HealthcheckError::NotOk(status.status));
    }
    Ok(())
}

fn main() -> Result<(), HealthcheckError> {
    let url = healthcheck_url(std::env::var("HEALTHCHECK_URL").ok());
    let res = reqwest::blocking::get(&url)?;
    if res.status() != 200 {
        return Err(HealthcheckError::BadStatus(res.status().as_u16(), url));
    }
    check_status(res.json::<StatusJSON>()?)
}
