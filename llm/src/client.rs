use reqwest::header::HeaderMap;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{Level, event, instrument};

use crate::error::LlmError;

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl Client {
    pub fn default() -> Self {
        Client {
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    pub fn with_headers(headers: HeaderMap) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| LlmError::Unavailable(format!("Failed to build client: {}", e)))?;
        Ok(Client {
            client,
            timeout: None,
        })
    }

    /// Apply a per-request deadline. Requests that exceed it settle with
    /// [`LlmError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[instrument(level = "info", skip(self, request), fields(json_request = serde_json::to_string(request).unwrap_or_default()))]
    pub async fn post<U, S, T>(&self, url: U, request: &S) -> Result<T, LlmError>
    where
        U: reqwest::IntoUrl + std::fmt::Debug,
        S: Serialize + Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.client.post(url).json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(LlmError::Unavailable(format!(
                "Request failed with status: {}",
                response.status()
            )));
        }
        let text = response.text().await?;
        event!(Level::INFO, response = text);

        Ok(serde_json::from_str::<T>(&text)?)
    }
}
