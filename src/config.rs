use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_API_URL: &str = "https://forkify-api.herokuapp.com/api/v2/recipes";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RESULTS_PER_PAGE: usize = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub api_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
    pub results_per_page: usize,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Missing optional keys
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("FORKIFY_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Config("FORKIFY_API_KEY is not set".to_string()))?;

        let api_url = lookup("FORKIFY_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("Invalid request timeout: {}", e)))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let results_per_page = match lookup("RESULTS_PER_PAGE") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| AppError::Config(format!("Invalid results per page: {}", e)))?,
            None => DEFAULT_RESULTS_PER_PAGE,
        };
        if results_per_page == 0 {
            return Err(AppError::Config("RESULTS_PER_PAGE must be positive".to_string()));
        }

        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| ".recipe-client".to_string()));

        // Load server configuration with defaults
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            api_url,
            api_key,
            request_timeout: Duration::from_secs(timeout_secs),
            results_per_page,
            data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("FORKIFY_API_KEY", "abc")])).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.results_per_page, 10);
        assert_eq!(config.server_addr.port(), 3000);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn trailing_slash_on_api_url_is_dropped() {
        let config = Config::from_lookup(lookup_from(&[
            ("FORKIFY_API_KEY", "abc"),
            ("FORKIFY_API_URL", "http://localhost:9000/recipes/"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:9000/recipes");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("FORKIFY_API_KEY", "abc"),
            ("RESULTS_PER_PAGE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("FORKIFY_API_KEY", "abc"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
