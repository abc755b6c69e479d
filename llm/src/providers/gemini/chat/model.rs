use super::api::{GenerateContentRequest, GenerateContentResponse};
use crate::client::Client;
use crate::error::LlmError;
use crate::{ChatMessage, ChatModel, ChatRequest};
use async_trait::async_trait;

pub struct GeminiChatModel {
    client: Client,
    base_url: String,
    model_name: String,
}

impl GeminiChatModel {
    pub fn new(client: Client, base_url: String, model_name: String) -> Self {
        GeminiChatModel {
            client,
            base_url,
            model_name,
        }
    }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatMessage, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model_name
        );

        let request = GenerateContentRequest::from(request);
        let response: GenerateContentResponse = self.client.post(url, &request).await?;
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| LlmError::Malformed("Response contained no candidates".to_string()))?;
        Ok(candidate.content.clone().into())
    }
}
