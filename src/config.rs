use std::{env, net::SocketAddr, time::Duration};
use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://olympicsdashboard.onrender.com";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PREDICT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api: ApiConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub predict_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            predict_timeout: Duration::from_millis(DEFAULT_PREDICT_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT);
        let base_url = lookup("OLYMPIX_API_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let predict_ms = parse_or(
            "OLYMPIX_PREDICT_TIMEOUT_MS",
            lookup("OLYMPIX_PREDICT_TIMEOUT_MS"),
            DEFAULT_PREDICT_TIMEOUT_MS,
        );
        let request_ms = parse_or(
            "OLYMPIX_REQUEST_TIMEOUT_MS",
            lookup("OLYMPIX_REQUEST_TIMEOUT_MS"),
            DEFAULT_REQUEST_TIMEOUT_MS,
        );

        Self {
            port,
            api: ApiConfig {
                base_url: normalize_base_url(base_url),
                predict_timeout: Duration::from_millis(predict_ms),
                request_timeout: Duration::from_millis(request_ms),
            },
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or<T: std::str::FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("ignoring invalid {key}={raw:?}, using default");
                default
            }
        },
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
