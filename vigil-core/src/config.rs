//! Settings for the model endpoint binding.
//!
//! Everything comes from the environment (with a `.env` file consulted when
//! present); nothing is persisted. The credential is a single opaque API key
//! consumed only by the endpoint binding — a missing or empty key surfaces
//! as the model being unavailable, never as a panic.

use std::env;
use std::time::Duration;

use llm::providers::gemini::{DEFAULT_BASE_URL, GeminiChatModel, GeminiProvider};
use llm::{LlmError, ModelProvider};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const MODEL_VAR: &str = "VIGIL_MODEL";
const BASE_URL_VAR: &str = "VIGIL_BASE_URL";
const TIMEOUT_VAR: &str = "VIGIL_REQUEST_TIMEOUT_SECS";

#[derive(Clone, Debug)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults.
    pub fn load() -> Self {
        let _ = dotenv::dotenv();
        Settings {
            api_key: env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty()),
            model: env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            request_timeout_secs: env::var(TIMEOUT_VAR).ok().and_then(|v| v.parse().ok()),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Build the chat model binding these settings describe.
    pub fn chat_model(&self) -> Result<GeminiChatModel, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Unavailable(format!("{} is not set", API_KEY_VAR)))?;
        let provider =
            GeminiProvider::with_base_url(&self.base_url, api_key, self.request_timeout())?;
        provider
            .create_chat_model(&self.model)
            .ok_or_else(|| LlmError::Unavailable(format!("Unknown model: {}", self.model)))
    }
}
