use dotenvy::dotenv;
use exchangerate_api::api::ExchangerateAPI;
use exchangerate_host_api::api::ExchangerateHostAPI;
use log::{error, info, warn};
use rate_cache::cache::{CachedHistoryProvider, DEFAULT_TTL_SECS};
use rate_model::{Conversion, HistoryQuery, SUPPORTED_CURRENCIES};
use rate_provider::{LatestRateProvider, RateHistoryProvider};
use redis::ConnectionLike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::{env, process::exit};
use thiserror::Error;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};

mod utils;

const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_AMOUNT: f64 = 1.0;

#[derive(Serialize)]
struct HealthcheckResponse {
    status: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct CurrenciesResponse {
    currencies: Vec<&'static str>,
}

#[derive(Deserialize)]
struct ConvertParams {
    amount: Option<f64>,
}

fn error_json(error: impl ToString) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
    }
}

#[get("/convert/{base}/{target}")]
async fn convert(
    path: web::Path<(String, String)>,
    params: web::Query<ConvertParams>,
    api: web::Data<dyn LatestRateProvider>,
) -> impl Responder {
    let (base, target) = path.into_inner();
    let (base, target) = match (utils::parse_currency(base), utils::parse_currency(target)) {
        (Ok(base), Ok(target)) => (base, target),
        (Err(e), _) | (_, Err(e)) => return HttpResponse::BadRequest().json(error_json(e)),
    };
    let amount = params.amount.unwrap_or(DEFAULT_AMOUNT);
    if let Err(e) = Conversion::check_amount(amount) {
        return HttpResponse::BadRequest().json(error_json(e));
    }

    let rate = match api.get_rate(&base, &target).await {
        Ok(rate) => rate,
        Err(e) => {
            warn!("convert | {} | {} -> {}: {}", api.name(), base, target, e);
            return HttpResponse::BadGateway().json(error_json(e));
        }
    };

    match Conversion::new(amount, base, target, rate) {
        Ok(conversion) => HttpResponse::Ok().json(conversion),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

#[get("/history/{base}/{target}")]
async fn history(
    path: web::Path<(String, String)>,
    api: web::Data<dyn RateHistoryProvider>,
) -> impl Responder {
    let (base, target) = path.into_inner();
    let (base, target) = match (utils::parse_currency(base), utils::parse_currency(target)) {
        (Ok(base), Ok(target)) => (base, target),
        (Err(e), _) | (_, Err(e)) => return HttpResponse::BadRequest().json(error_json(e)),
    };

    let query = HistoryQuery::trailing_year(base, target, chrono::Local::now().date_naive());
    match api.get_history(&query).await {
        Ok(series) => HttpResponse::Ok().json(rate_summary::summarize_series(&series)),
        Err(e) => {
            warn!("history | {} | {}: {}", api.name(), query.cache_key(), e);
            HttpResponse::ServiceUnavailable().json(error_json("historical data not available"))
        }
    }
}

#[get("/currencies")]
async fn currencies() -> impl Responder {
    web::Json(CurrenciesResponse {
        currencies: SUPPORTED_CURRENCIES.to_vec(),
    })
}

#[get("/healthcheck")]
async fn healthcheck() -> impl Responder {
    web::Json(HealthcheckResponse {
        status: "ok".to_string(),
    })
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(HealthcheckResponse {
        status: "not found".to_string(),
    })
}

#[derive(Debug, Error)]
enum ConfigError {
    #[error("{0} is not set")]
    Missing(String),

    #[error("{0} is not a number: {1}")]
    InvalidNumber(String, String),
}

struct Config {
    workers: usize,
    redis_url: String,
    history_key: String,
    latest_key: String,
    cache_ttl: u64,
}

impl Config {
    fn new() -> Result<Config, ConfigError> {
        dotenv().ok();
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let required = |name: &str| lookup(name).ok_or_else(|| ConfigError::Missing(name.to_string()));
        let number = |name: &str, value: String| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidNumber(name.to_string(), e.to_string()))
        };

        let mut workers = number("CONVERTER_API_WORKERS", required("CONVERTER_API_WORKERS")?)? as usize;
        let mut redis_url = required("CONVERTER_API_REDIS")?;
        let history_key = required("CONVERTER_API_HISTORY_KEY")?;
        let latest_key = required("CONVERTER_API_LATEST_KEY")?;
        let mut cache_ttl = match lookup("CONVERTER_API_CACHE_TTL") {
            Some(value) if !value.trim().is_empty() => number("CONVERTER_API_CACHE_TTL", value)?,
            _ => DEFAULT_TTL_SECS,
        };

        if workers == 0 {
            workers = 1;
        }

        if redis_url.trim().is_empty() {
            redis_url = DEFAULT_REDIS_URL.to_string();
        }

        if cache_ttl == 0 {
            cache_ttl = DEFAULT_TTL_SECS;
        }

        Ok(Config {
            workers,
            redis_url,
            history_key,
            latest_key,
            cache_ttl,
        })
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let mut redis_client = match redis::Client::open(config.redis_url.as_str()) {
        Ok(client) => client,
        Err(e) => {
            error!("Could not create Redis client: {}", e);
            exit(1);
        }
    };
    if !redis_client.check_connection() {
        error!("Redis unavailable");
        exit(1);
    }
    info!("Redis connected | cache ttl: {}s", config.cache_ttl);

    let history_provider =
        CachedHistoryProvider::new(ExchangerateHostAPI::new(config.history_key), redis_client)
            .with_ttl(config.cache_ttl);
    let history_api: web::Data<dyn RateHistoryProvider> =
        web::Data::from(Arc::new(history_provider) as Arc<dyn RateHistoryProvider>);
    let latest_api: web::Data<dyn LatestRateProvider> = web::Data::from(
        Arc::new(ExchangerateAPI::new(config.latest_key)) as Arc<dyn LatestRateProvider>,
    );

    HttpServer::new(move || {
        App::new()
            .app_data(history_api.clone())
            .app_data(latest_api.clone())
            .service(healthcheck)
            .service(currencies)
            .service(convert)
            .service(history)
            .default_service(web::to(not_found))
            .wrap(Logger::default())
    })
    .bind(("0.0.0.0", 8080))?
    .workers(config.workers)
    .run()
    .await
}
