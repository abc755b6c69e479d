//! In-memory session state: one media item, its derived analysis, and the
//! append-only chat transcript.
//!
//! Transitions are the only way state changes: `upload` replaces the media
//! and drops everything derived from the previous one, `clear` returns to
//! empty. Both release the outgoing preview handle. The transcript is
//! append-only and is never edited message-by-message.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::media::EncodedMedia;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Model,
}

#[derive(Clone, Debug, Serialize)]
pub struct TranscriptMessage {
    pub speaker: Speaker,
    pub text: String,
    /// Assigned when the message is appended, never mutated.
    pub timestamp: DateTime<Utc>,
}

impl TranscriptMessage {
    pub(crate) fn now(speaker: Speaker, text: impl Into<String>) -> Self {
        TranscriptMessage {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    MediaLoaded,
    Analyzed,
}

#[derive(Default)]
pub struct Session {
    media: Option<EncodedMedia>,
    analysis: Option<AnalysisResult>,
    transcript: Vec<TranscriptMessage>,
    // Bumped on upload/clear so a stale in-flight completion can be detected.
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.media, &self.analysis) {
            (None, _) => SessionPhase::Empty,
            (Some(_), None) => SessionPhase::MediaLoaded,
            (Some(_), Some(_)) => SessionPhase::Analyzed,
        }
    }

    pub fn media(&self) -> Option<&EncodedMedia> {
        self.media.as_ref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn transcript(&self) -> &[TranscriptMessage] {
        &self.transcript
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the current media. The previous preview is released and all
    /// derived state is dropped: new media invalidates prior analysis and chat.
    pub fn upload(&mut self, media: EncodedMedia) {
        self.release_preview();
        self.media = Some(media);
        self.analysis = None;
        self.transcript.clear();
        self.generation += 1;
    }

    /// Return to empty. A no-op on an already-empty session.
    pub fn clear(&mut self) {
        self.release_preview();
        self.media = None;
        self.analysis = None;
        self.transcript.clear();
        self.generation += 1;
    }

    pub(crate) fn store_analysis(&mut self, result: AnalysisResult) {
        debug_assert!(self.media.is_some(), "analysis stored without media");
        self.analysis = Some(result);
    }

    pub(crate) fn push_user(&mut self, text: impl Into<String>) {
        self.transcript
            .push(TranscriptMessage::now(Speaker::User, text));
    }

    pub(crate) fn push_model(&mut self, text: impl Into<String>) {
        self.transcript
            .push(TranscriptMessage::now(Speaker::Model, text));
    }

    fn release_preview(&mut self) {
        if let Some(media) = self.media.as_mut() {
            media.release_preview();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::media::{PreviewHandle, encode_with_preview};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tracked_media(released: &Arc<AtomicUsize>) -> crate::media::EncodedMedia {
        let counter = Arc::clone(released);
        encode_with_preview(b"bytes", "video/mp4", move || {
            PreviewHandle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .unwrap()
    }

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            crowd_count: 1,
            actions: vec![],
            attributes: vec![],
            objects: vec![],
            audio_transcription: String::new(),
        }
    }

    #[test]
    fn test_phase_transitions() {
        let mut session = Session::new();
        assert_eq!(session.phase(), SessionPhase::Empty);

        session.upload(crate::media::encode(b"bytes", "video/mp4").unwrap());
        assert_eq!(session.phase(), SessionPhase::MediaLoaded);

        session.store_analysis(sample_analysis());
        assert_eq!(session.phase(), SessionPhase::Analyzed);

        session.clear();
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_upload_replaces_and_releases_previous_preview() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut session = Session::new();

        session.upload(tracked_media(&released));
        session.store_analysis(sample_analysis());
        session.push_user("What happened?");
        session.push_model("Nothing notable.");

        session.upload(crate::media::encode(b"other", "image/png").unwrap());

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(session.phase(), SessionPhase::MediaLoaded);
        assert!(session.analysis().is_none());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_clear_releases_preview() {
        let released = Arc::new(AtomicUsize::new(0));
        let mut session = Session::new();

        session.upload(tracked_media(&released));
        session.clear();

        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_clear_on_empty_is_noop() {
        let mut session = Session::new();
        session.clear();
        session.clear();

        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.media().is_none());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_transcript_appends_in_order_with_timestamps() {
        let mut session = Session::new();
        session.upload(crate::media::encode(b"bytes", "video/mp4").unwrap());

        session.push_user("Q1");
        session.push_model("A1");
        session.push_user("Q2");

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].speaker, Speaker::User);
        assert_eq!(transcript[0].text, "Q1");
        assert_eq!(transcript[1].speaker, Speaker::Model);
        assert_eq!(transcript[2].text, "Q2");
        assert!(transcript[0].timestamp <= transcript[1].timestamp);
        assert!(transcript[1].timestamp <= transcript[2].timestamp);
    }

    #[test]
    fn test_generation_bumps_on_upload_and_clear() {
        let mut session = Session::new();
        let start = session.generation();

        session.upload(crate::media::encode(b"bytes", "video/mp4").unwrap());
        assert_eq!(session.generation(), start + 1);

        session.clear();
        assert_eq!(session.generation(), start + 2);
    }
}
