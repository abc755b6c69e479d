use async_trait::async_trait;

pub mod api;
mod client;
pub mod error;
pub mod providers;

pub use api::*;
pub use error::LlmError;

#[async_trait]
pub trait ChatModel {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatMessage, LlmError>;
}

pub trait ModelProvider {
    type ModelType: ChatModel;

    // Get a specific model by name.
    fn create_chat_model(&self, model_name: &str) -> Option<Self::ModelType>;
}
