//! Conversational follow-up over the uploaded footage.
//!
//! Every turn is a stateless full-context request: the media is re-sent
//! inline with a fixed priming text, followed by the whole prior transcript
//! as role-tagged turns and the new question. The endpoint holds no session,
//! so the model always sees full context at the cost of re-uploading the
//! media each turn.

use llm::{ChatMessage, ChatPayload, ChatRequest};

use crate::media::EncodedMedia;
use crate::session::{Speaker, TranscriptMessage};

/// Priming turn that precedes the transcript on every follow-up request.
pub(crate) const CHAT_PRIMER: &str =
    "This is a CCTV recording for analysis. Use it to answer the following questions accurately.";

/// Appended as the model turn when the request fails. Errors stay in-band so
/// the transcript remains usable.
pub(crate) const FALLBACK_ANSWER: &str =
    "I encountered an error processing your request. Please check the API key or video format.";

/// Appended when the request succeeds but the reply carries no text.
pub(crate) const EMPTY_REPLY_ANSWER: &str = "I'm sorry, I couldn't process that question.";

pub(crate) fn followup_request(
    media: &EncodedMedia,
    transcript: &[TranscriptMessage],
    question: &str,
) -> ChatRequest {
    let mut turns = Vec::with_capacity(transcript.len() + 2);
    turns.push(ChatMessage::user(ChatPayload::media_with_text(
        media.mime_type(),
        media.encoded_payload(),
        CHAT_PRIMER,
    )));
    for message in transcript {
        let payload = ChatPayload::text(message.text.clone());
        turns.push(match message.speaker {
            Speaker::User => ChatMessage::user(payload),
            Speaker::Model => ChatMessage::assistant(payload),
        });
    }
    turns.push(ChatMessage::user(ChatPayload::text(question)));
    ChatRequest::new(&turns)
}
