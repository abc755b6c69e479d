use serde::{Deserialize, Serialize};

use crate::{ChatPayload, ChatRequest};

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl TryFrom<crate::api::Role> for Role {
    type Error = anyhow::Error;

    fn try_from(value: crate::api::Role) -> Result<Self, Self::Error> {
        match value {
            crate::api::Role::User => Ok(Role::User),
            crate::api::Role::Assistant => Ok(Role::Model),
            crate::api::Role::System => Err(anyhow::anyhow!(
                "Gemini does not support system messages directly."
            )),
        }
    }
}

impl From<Role> for crate::api::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::User => crate::api::Role::User,
            Role::Model => crate::api::Role::Assistant,
        }
    }
}

/// Inline binary payload, base64 data plus its MIME type.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Blob {
    pub(crate) mime_type: String,
    pub(crate) data: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum PartType {
    Text(String),
    InlineData(Blob),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) thought: Option<bool>,

    #[serde(flatten)]
    pub(crate) data: PartType,

    #[serde(flatten)]
    pub(crate) extra: Option<serde_json::Value>,
}

impl Part {
    pub fn new_text(text: String) -> Self {
        Part {
            thought: None,
            data: PartType::Text(text),
            extra: None,
        }
    }

    pub fn new_inline_data(mime_type: String, data: String) -> Self {
        Part {
            thought: None,
            data: PartType::InlineData(Blob { mime_type, data }),
            extra: None,
        }
    }
}

impl From<&Part> for crate::api::ContentBlock {
    fn from(part: &Part) -> Self {
        match &part.data {
            PartType::Text(t) => crate::api::ContentBlock::Text { text: t.clone() },
            PartType::InlineData(blob) => crate::api::ContentBlock::Media {
                mime_type: blob.mime_type.clone(),
                data: blob.data.clone(),
            },
        }
    }
}

impl From<&crate::api::ContentBlock> for Part {
    fn from(block: &crate::api::ContentBlock) -> Self {
        match block {
            crate::api::ContentBlock::Text { text } => Part::new_text(text.clone()),
            crate::api::ContentBlock::Media { mime_type, data } => {
                Part::new_inline_data(mime_type.clone(), data.clone())
            }
        }
    }
}

// Gemini representation of messages.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Content {
    pub(crate) role: Role,
    pub(crate) parts: Vec<Part>,
}

impl From<&Content> for crate::ChatMessage {
    fn from(content: &Content) -> Self {
        let blocks: Vec<crate::api::ContentBlock> = content
            .parts
            .iter()
            .map(crate::api::ContentBlock::from)
            .collect();

        crate::ChatMessage::new(content.role.into(), ChatPayload::new(blocks))
    }
}

impl From<Content> for crate::ChatMessage {
    fn from(content: Content) -> Self {
        Self::from(&content)
    }
}

trait FromWithRole<T> {
    fn from_with_role(t: T, role: crate::api::Role) -> Self;
}

impl FromWithRole<&crate::ChatPayload> for Content {
    fn from_with_role(payload: &crate::ChatPayload, role: crate::api::Role) -> Self {
        Content {
            // System messages are filtered out before this conversion runs.
            role: role.try_into().expect("Invalid role"),
            parts: payload.content.iter().map(|b| b.into()).collect(),
        }
    }
}

impl From<&crate::ChatMessage> for Content {
    fn from(msg: &crate::ChatMessage) -> Self {
        Content::from_with_role(&msg.payload, msg.role)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) response_mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) response_schema: Option<serde_json::Value>,
}

impl From<&crate::GenerationOptions> for GenerationConfig {
    fn from(options: &crate::GenerationOptions) -> Self {
        GenerationConfig {
            response_mime_type: options.response_mime_type.clone(),
            response_schema: options.response_schema.clone(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) system_instruction: Option<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn new(contents: Vec<Content>, system_instruction: Option<Content>) -> Self {
        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: None,
        }
    }
}

impl From<&ChatRequest> for GenerateContentRequest {
    fn from(request: &ChatRequest) -> Self {
        // Separate system messages because they go into the systemInstruction field.
        let system_parts = request
            .messages
            .iter()
            .filter(|m| m.role == crate::api::Role::System)
            .flat_map(|m| m.payload.content.iter().map(Part::from))
            .collect::<Vec<Part>>();
        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(Content {
                parts: system_parts,
                role: Role::User, // Role is ignored for system messages
            })
        };
        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != crate::api::Role::System)
            .map(|msg| msg.into())
            .collect::<Vec<Content>>();

        let mut req = GenerateContentRequest::new(contents, system_instruction);
        req.generation_config = request.generation.as_ref().map(GenerationConfig::from);
        req
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Candidate {
    pub(crate) content: Content,

    #[serde(flatten)]
    pub(crate) extra: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct GenerateContentResponse {
    pub(crate) candidates: Vec<Candidate>,

    #[serde(flatten)]
    pub(crate) extra: Option<serde_json::Value>,
}
