pub mod request_builder;

use crate::{
    config::ClientConfig,
    error::{PollinationsError, Result},
    models::FetchResponse,
};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

pub use request_builder::{BuiltRequest, RequestBuilder};

/// Transport seam between the controller and the network.
///
/// Implementations return the raw response for any HTTP status; only
/// connection-level failures are errors.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

#[derive(Clone)]
pub struct PollinationsClient {
    http: reqwest::Client,
    request_builder: RequestBuilder,
}

impl PollinationsClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.normalized_endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pollinate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PollinationsError::ConfigError(e.to_string()))?;

        Ok(Self {
            http,
            request_builder: RequestBuilder::new(endpoint),
        })
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.request_builder
    }
}

#[async_trait]
impl ImageFetcher for PollinationsClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response.bytes().await?.to_vec();

        log::debug!(
            "Received {} ({} bytes, {})",
            status,
            body.len(),
            content_type.as_deref().unwrap_or("no content type")
        );

        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().trim().to_string(),
            content_type,
            body,
        })
    }
}
