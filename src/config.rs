use crate::error::{PollinationsError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://image.pollinations.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let endpoint = env::var("POLLINATIONS_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.endpoint);
        let api_key = env::var("POLLINATIONS_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());
        let timeout_secs = env::var("POLLINATIONS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);
        let output_dir = env::var("POLLINATIONS_OUTPUT_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        ClientConfig {
            endpoint,
            api_key,
            timeout_secs,
            output_dir,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint without a trailing slash, rejected if it is not http(s).
    pub fn normalized_endpoint(&self) -> Result<String> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(PollinationsError::ConfigError(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        Ok(endpoint.to_string())
    }
}
