use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Assistant,
    System,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Inline binary content, carried as a base64 payload alongside its MIME
    /// type. This is how media travels to endpoints that accept inline blobs.
    Media {
        mime_type: String,
        data: String,
    },
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct ChatPayload {
    pub content: Vec<ContentBlock>,
}

impl From<&String> for ChatPayload {
    fn from(text: &String) -> Self {
        ChatPayload::text(text)
    }
}

impl From<String> for ChatPayload {
    fn from(text: String) -> Self {
        ChatPayload::text(text)
    }
}

impl From<&str> for ChatPayload {
    fn from(text: &str) -> Self {
        ChatPayload::text(text)
    }
}

impl ChatPayload {
    pub fn new(content: Vec<ContentBlock>) -> Self {
        ChatPayload { content }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ChatPayload {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    pub fn media(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        ChatPayload {
            content: vec![ContentBlock::Media {
                mime_type: mime_type.into(),
                data: data.into(),
            }],
        }
    }

    /// Media blob followed by an instruction, the usual shape for a
    /// "look at this and answer" turn.
    pub fn media_with_text(
        mime_type: impl Into<String>,
        data: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        ChatPayload {
            content: vec![
                ContentBlock::Media {
                    mime_type: mime_type.into(),
                    data: data.into(),
                },
                ContentBlock::Text { text: text.into() },
            ],
        }
    }

    pub fn get_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn get_media(&self) -> Vec<(&str, &str)> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Media { mime_type, data } => {
                    Some((mime_type.as_str(), data.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Role,
    #[serde(flatten)]
    pub payload: ChatPayload,
}

impl ChatMessage {
    pub fn new(role: Role, payload: ChatPayload) -> Self {
        Self { role, payload }
    }

    pub fn user(payload: ChatPayload) -> Self {
        Self::new(Role::User, payload)
    }

    pub fn assistant(payload: ChatPayload) -> Self {
        Self::new(Role::Assistant, payload)
    }

    pub fn system(payload: ChatPayload) -> Self {
        Self::new(Role::System, payload)
    }

    pub fn get_text(&self) -> String {
        self.payload.get_text()
    }

    pub fn get_media(&self) -> Vec<(&str, &str)> {
        self.payload.get_media()
    }
}

/// Structured-output settings forwarded to the endpoint's generation config.
#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct GenerationOptions {
    pub response_mime_type: Option<String>,
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationOptions {
    /// Ask the endpoint for a single JSON document conforming to `schema`.
    pub fn json(schema: serde_json::Value) -> Self {
        GenerationOptions {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) generation: Option<GenerationOptions>,
}

impl ChatRequest {
    /// Create a new chat request from an iterator of message references
    ///
    /// This accepts any iterator that yields `&ChatMessage`, avoiding
    /// unnecessary clones:
    /// - `&[ChatMessage]` - slice
    /// - `Vec<&ChatMessage>` - vector of references
    ///
    /// Messages are cloned only once when constructing the request.
    pub fn new<'a>(messages: impl IntoIterator<Item = &'a ChatMessage>) -> Self {
        ChatRequest {
            messages: messages.into_iter().cloned().collect(),
            generation: None,
        }
    }

    /// Attach structured-output settings to the request.
    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn generation(&self) -> Option<&GenerationOptions> {
        self.generation.as_ref()
    }
}
