//! Coordinating facade over one session.
//!
//! The inspector owns the session state and the model binding, and sequences
//! every write so concurrent completions cannot interleave. Follow-up turns
//! are serialized through a queued lock: each call's (question, answer) pair
//! lands contiguously in call order regardless of how the network settles.
//! At most one analysis runs at a time; a second call is rejected while the
//! first is in flight.

use std::sync::atomic::{AtomicBool, Ordering};

use llm::ChatModel;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::analysis::{self, AnalysisResult};
use crate::chat;
use crate::error::{AnalysisError, MediaError, NoMedia};
use crate::media::{self, PreviewHandle};
use crate::session::{Session, SessionPhase, TranscriptMessage};

pub struct Inspector<M: ChatModel> {
    model: M,
    session: Mutex<Session>,
    // tokio's mutex queues waiters, so turns complete in call order.
    ask_turn: Mutex<()>,
    analysis_pending: AtomicBool,
}

impl<M: ChatModel> Inspector<M> {
    pub fn new(model: M) -> Self {
        Inspector {
            model,
            session: Mutex::new(Session::new()),
            ask_turn: Mutex::new(()),
            analysis_pending: AtomicBool::new(false),
        }
    }

    /// Encode and load a new file, replacing any current media. A rejected
    /// file leaves the session untouched.
    pub async fn upload(&self, raw: &[u8], mime_type: &str) -> Result<(), MediaError> {
        self.upload_with_preview(raw, mime_type, PreviewHandle::detached)
            .await
    }

    /// Like [`upload`](Self::upload), acquiring a preview resource for the
    /// presentation layer once the file passes the size check.
    pub async fn upload_with_preview(
        &self,
        raw: &[u8],
        mime_type: &str,
        acquire_preview: impl FnOnce() -> PreviewHandle,
    ) -> Result<(), MediaError> {
        let media = media::encode_with_preview(raw, mime_type, acquire_preview)?;
        self.session.lock().await.upload(media);
        Ok(())
    }

    /// Run the structured extraction over the loaded media.
    ///
    /// Single-shot request/response; [`is_analyzing`](Self::is_analyzing)
    /// reads true from call start to settle. On failure nothing is stored:
    /// the session stays where it was, with no partial result.
    pub async fn analyze(&self) -> Result<AnalysisResult, AnalysisError> {
        if self.analysis_pending.swap(true, Ordering::SeqCst) {
            return Err(AnalysisError::AlreadyRunning);
        }
        let result = self.run_analysis().await;
        self.analysis_pending.store(false, Ordering::SeqCst);
        result
    }

    async fn run_analysis(&self) -> Result<AnalysisResult, AnalysisError> {
        let (request, generation) = {
            let session = self.session.lock().await;
            let media = session.media().ok_or(AnalysisError::NoMedia)?;
            (analysis::analysis_request(media), session.generation())
        };

        let reply = self.model.chat(&request).await?;
        let result = analysis::parse_analysis(&reply.get_text())?;

        let mut session = self.session.lock().await;
        if session.generation() == generation {
            session.store_analysis(result.clone());
            debug!(crowd_count = result.crowd_count, "analysis stored");
        } else {
            // The media changed while we were in flight; the result belongs
            // to the old session and is not stored.
            debug!("discarding analysis for superseded media");
        }
        Ok(result)
    }

    /// Ask a follow-up question about the loaded media.
    ///
    /// The question and the answer are appended to the transcript as a
    /// contiguous pair. Request failures degrade to a fixed in-band answer
    /// rather than an error; there is no automatic retry. If the media is
    /// replaced or cleared while the call is in flight, the answer is
    /// returned to the caller but kept out of the new session's transcript.
    pub async fn ask(&self, question: &str) -> Result<String, NoMedia> {
        let _turn = self.ask_turn.lock().await;

        let (request, generation) = {
            let mut session = self.session.lock().await;
            let media = session.media().ok_or(NoMedia)?;
            let request = chat::followup_request(media, session.transcript(), question);
            session.push_user(question);
            (request, session.generation())
        };

        let answer = match self.model.chat(&request).await {
            Ok(reply) => {
                let text = reply.get_text();
                if text.is_empty() {
                    chat::EMPTY_REPLY_ANSWER.to_string()
                } else {
                    text
                }
            }
            Err(err) => {
                warn!(error = %err, "follow-up request failed");
                chat::FALLBACK_ANSWER.to_string()
            }
        };

        let mut session = self.session.lock().await;
        if session.generation() == generation {
            session.push_model(&answer);
        } else {
            // The media changed while we were in flight; an answer about the
            // old recording must not leak into the fresh transcript.
            debug!("discarding follow-up answer for superseded media");
        }
        Ok(answer)
    }

    /// Drop all session state and release the preview. A no-op when empty.
    pub async fn clear(&self) {
        self.session.lock().await.clear();
    }

    pub async fn phase(&self) -> SessionPhase {
        self.session.lock().await.phase()
    }

    pub async fn analysis(&self) -> Option<AnalysisResult> {
        self.session.lock().await.analysis().cloned()
    }

    pub async fn transcript(&self) -> Vec<TranscriptMessage> {
        self.session.lock().await.transcript().to_vec()
    }

    /// True from analysis call start to settle; the presentation layer keys
    /// its pending indicator off this.
    pub fn is_analyzing(&self) -> bool {
        self.analysis_pending.load(Ordering::SeqCst)
    }
}
