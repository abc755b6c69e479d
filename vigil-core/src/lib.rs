//! Core pipeline for the footage inspector: media encoding, model-backed
//! structured analysis, conversational follow-up, and session state.
//!
//! The presentation layer drives everything through [`Inspector`]: upload a
//! recording, trigger an analysis, ask follow-up questions about it, clear
//! the session. The model endpoint is reached through the `llm` crate and is
//! treated as an untrusted collaborator; its replies are strictly validated
//! before they touch session state.

pub mod analysis;
pub mod chat;
pub mod config;
pub mod error;
pub mod inspector;
pub mod media;
pub mod schema;
pub mod session;

pub use analysis::{ActionEvent, AnalysisResult, Intensity};
pub use config::Settings;
pub use error::{AnalysisError, MediaError, NoMedia};
pub use inspector::Inspector;
pub use media::{EncodedMedia, MAX_UPLOAD_BYTES, PreviewHandle, encode, encode_with_preview};
pub use session::{Session, SessionPhase, Speaker, TranscriptMessage};
