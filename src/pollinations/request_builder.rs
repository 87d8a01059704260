use crate::error::{PollinationsError, Result};
use crate::models::GenerationParameters;
use rand::Rng;

pub const SEED_UPPER_BOUND: u32 = 1_000_000;

/// A built request URL together with the seed embedded in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRequest {
    pub url: String,
    pub seed: u32,
}

impl BuiltRequest {
    /// URL with the `key` value masked, for logging.
    pub fn redacted_url(&self) -> String {
        redact_key(&self.url)
    }
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: String,
}

impl RequestBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds the URL with a freshly drawn seed.
    pub fn build(&self, params: &GenerationParameters) -> BuiltRequest {
        let seed = rand::thread_rng().gen_range(0..SEED_UPPER_BOUND);
        self.build_with_seed(params, seed)
    }

    /// Like [`RequestBuilder::build`], but refuses parameters without a prompt.
    pub fn build_validated(&self, params: &GenerationParameters) -> Result<BuiltRequest> {
        if !params.has_prompt() {
            return Err(PollinationsError::ValidationError);
        }
        Ok(self.build(params))
    }

    pub fn build_with_seed(&self, params: &GenerationParameters, seed: u32) -> BuiltRequest {
        let mut query: Vec<(&str, String)> = vec![
            ("model", params.model.as_str().to_string()),
            ("width", params.width.to_string()),
            ("height", params.height.to_string()),
            ("nologo", "true".to_string()),
            ("safe", "true".to_string()),
            ("private", "true".to_string()),
            ("seed", seed.to_string()),
            ("nofeed", "true".to_string()),
        ];

        if let Some(key) = params.api_key() {
            query.push(("key", key.to_string()));
        }
        if params.enhance {
            query.push(("enhance", "true".to_string()));
        }
        if params.wants_transparency() {
            query.push(("transparent", "true".to_string()));
        }

        let query = query
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!(
            "{}/prompt/{}?{}",
            self.endpoint,
            urlencoding::encode(&params.prompt),
            query
        );

        BuiltRequest { url, seed }
    }
}

fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("key=") {
                "key=***".to_string()
            } else {
                pair.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, query)
}
