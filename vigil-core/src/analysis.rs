//! Structured footage analysis: request building and strict response decode.
//!
//! One request carries the encoded media, a fixed instruction naming the five
//! extraction targets, and the declared output schema. The reply is untrusted
//! text; it either decodes into a complete [`AnalysisResult`] or the analysis
//! fails. There is no partial result.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use llm::{ChatMessage, ChatPayload, ChatRequest, GenerationOptions};

use crate::error::AnalysisError;
use crate::media::EncodedMedia;
use crate::schema;

pub(crate) const ANALYSIS_PROMPT: &str = "Analyze this CCTV footage comprehensively. Extract the following information:
1. Total count of distinct people appearing.
2. A list of specific actions/behaviors with rough timestamps (e.g. \"0:02: Man enters through door\").
3. Descriptions of clothing or physical attributes (e.g. \"Person in yellow jacket\").
4. Any notable objects (e.g. \"Red backpack\", \"White SUV\").
5. A brief transcription of any significant audio or speech.

Return the result as a JSON object matching this schema.";

/// Severity bucket the model assigns to a logged action.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ActionEvent {
    pub timestamp: String,
    pub description: String,
    pub intensity: Intensity,
}

/// The complete extraction result. Every field is required; a reply missing
/// any of them is a schema violation, not a partial result.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub crowd_count: u32,
    /// Presentation order equals reply order; no re-sorting.
    pub actions: Vec<ActionEvent>,
    pub attributes: Vec<String>,
    pub objects: Vec<String>,
    pub audio_transcription: String,
}

/// Build the single-shot extraction request for the uploaded media.
pub fn analysis_request(media: &EncodedMedia) -> ChatRequest {
    let message = ChatMessage::user(ChatPayload::media_with_text(
        media.mime_type(),
        media.encoded_payload(),
        ANALYSIS_PROMPT,
    ));
    ChatRequest::new([&message]).with_generation(GenerationOptions::json(
        schema::response_schema_for::<AnalysisResult>(),
    ))
}

/// Decode an untrusted reply body into a typed result.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    serde_json::from_str(text).map_err(|e| AnalysisError::SchemaViolation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::encode;

    const VALID_REPLY: &str = r#"{
        "crowdCount": 3,
        "actions": [
            {"timestamp": "0:02", "description": "Man enters through door", "intensity": "low"}
        ],
        "attributes": ["yellow jacket"],
        "objects": ["red backpack"],
        "audioTranscription": ""
    }"#;

    #[test]
    fn test_parse_valid_reply() {
        let result = parse_analysis(VALID_REPLY).unwrap();

        assert_eq!(result.crowd_count, 3);
        assert_eq!(result.actions.len(), 1);
        assert_eq!(result.actions[0].timestamp, "0:02");
        assert_eq!(result.actions[0].description, "Man enters through door");
        assert_eq!(result.actions[0].intensity, Intensity::Low);
        assert_eq!(result.attributes, vec!["yellow jacket"]);
        assert_eq!(result.objects, vec!["red backpack"]);
        assert_eq!(result.audio_transcription, "");
    }

    #[test]
    fn test_parse_rejects_each_missing_field() {
        let full: serde_json::Value = serde_json::from_str(VALID_REPLY).unwrap();
        for field in [
            "crowdCount",
            "actions",
            "attributes",
            "objects",
            "audioTranscription",
        ] {
            let mut pruned = full.clone();
            pruned.as_object_mut().unwrap().remove(field);
            let text = serde_json::to_string(&pruned).unwrap();
            assert!(
                matches!(
                    parse_analysis(&text),
                    Err(AnalysisError::SchemaViolation(_))
                ),
                "reply without {field} must not decode"
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        assert!(matches!(
            parse_analysis("{not json"),
            Err(AnalysisError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_primitive_types() {
        let text = VALID_REPLY.replace("3", "\"three\"");
        assert!(matches!(
            parse_analysis(&text),
            Err(AnalysisError::SchemaViolation(_))
        ));

        let negative = VALID_REPLY.replace("\"crowdCount\": 3", "\"crowdCount\": -1");
        assert!(matches!(
            parse_analysis(&negative),
            Err(AnalysisError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_intensity() {
        let text = VALID_REPLY.replace("\"low\"", "\"extreme\"");
        assert!(matches!(
            parse_analysis(&text),
            Err(AnalysisError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        let text = r#"{
            "crowdCount": 0,
            "actions": [
                {"timestamp": "0:05", "description": "b", "intensity": "high"},
                {"timestamp": "0:01", "description": "a", "intensity": "medium"}
            ],
            "attributes": ["red hat", "red hat"],
            "objects": [],
            "audioTranscription": "hello"
        }"#;
        let result = parse_analysis(text).unwrap();

        // As-returned order, even when timestamps are out of order.
        assert_eq!(result.actions[0].timestamp, "0:05");
        assert_eq!(result.actions[1].timestamp, "0:01");
        assert_eq!(result.attributes, vec!["red hat", "red hat"]);
    }

    #[test]
    fn test_analysis_request_shape() {
        let media = encode(b"fake video bytes", "video/mp4").unwrap();
        let request = analysis_request(&media);

        assert_eq!(request.messages().len(), 1);
        let message = &request.messages()[0];
        let attachments = message.get_media();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].0, "video/mp4");
        assert_eq!(attachments[0].1, media.encoded_payload());
        assert!(message.get_text().contains("Total count of distinct people"));

        let generation = request.generation().unwrap();
        assert_eq!(
            generation.response_mime_type.as_deref(),
            Some("application/json")
        );
        assert!(generation.response_schema.is_some());
    }
}
