use super::chat::model::GeminiChatModel;
use crate::ModelProvider;
use crate::client::Client;
use crate::error::LlmError;
use reqwest::header;
use std::time::Duration;

pub struct GeminiProvider {
    client: Client,
    base_url: String,
}

const API_VERSION: &str = "v1beta";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

impl GeminiProvider {
    pub fn new(api_key: &str) -> Result<Self, LlmError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, None)
    }

    /// Create a provider with a custom base URL (e.g., for proxying) and an
    /// optional per-request deadline. The API version path (/v1beta) is
    /// automatically appended.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "Content-Type",
            "application/json"
                .parse()
                .expect("static header value is valid"),
        );
        headers.insert(
            "x-goog-api-key",
            api_key
                .parse()
                .map_err(|_| LlmError::Unavailable("API key is not a valid header value".to_string()))?,
        );
        let base_url = base_url.trim_end_matches('/');
        let mut client = Client::with_headers(headers)?;
        if let Some(timeout) = timeout {
            client = client.with_timeout(timeout);
        }
        Ok(GeminiProvider {
            client,
            base_url: format!("{}/{}", base_url, API_VERSION),
        })
    }
}

impl ModelProvider for GeminiProvider {
    type ModelType = GeminiChatModel;

    fn create_chat_model(&self, model_name: &str) -> Option<Self::ModelType> {
        Some(GeminiChatModel::new(
            self.client.clone(),
            self.base_url.clone(),
            model_name.to_string(),
        ))
    }
}
