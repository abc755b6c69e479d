//! Media encoding and preview-resource lifecycle.
//!
//! Uploaded bytes are turned into a base64 payload for inline transport to
//! the model endpoint. The presentation layer usually holds a local preview
//! resource for the same bytes (an object URL or similar); its release hook
//! travels with the encoded media as a [`PreviewHandle`] so that replacing or
//! clearing the session frees it exactly once.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::MediaError;

/// Upload ceiling, matching the 200 MiB browser-safety limit of the client.
pub const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Ownership-scoped handle to a presentation-side preview resource.
///
/// The session releases it when the media is replaced or cleared; release
/// runs at most once. Dropping an unreleased handle runs the hook as a
/// backstop, so the resource cannot leak on any exit path.
pub struct PreviewHandle {
    release: Option<ReleaseFn>,
    released: bool,
}

impl PreviewHandle {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        PreviewHandle {
            release: Some(Box::new(release)),
            released: false,
        }
    }

    /// Handle with no underlying resource, for headless use and tests.
    pub fn detached() -> Self {
        PreviewHandle {
            release: None,
            released: false,
        }
    }

    pub(crate) fn release(&mut self) {
        self.released = true;
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

/// A file prepared for transport: transport-safe payload plus the preview
/// handle bound to the original bytes.
#[derive(Debug)]
pub struct EncodedMedia {
    raw_len: usize,
    encoded_payload: String,
    mime_type: String,
    preview: PreviewHandle,
}

impl EncodedMedia {
    /// Base64 payload. Decodes back to exactly the uploaded bytes.
    pub fn encoded_payload(&self) -> &str {
        &self.encoded_payload
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    // Only the session's upload/clear transitions release the preview.
    pub(crate) fn release_preview(&mut self) {
        self.preview.release();
    }
}

fn ensure_within_limit(size: usize) -> Result<(), MediaError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(MediaError::SizeLimitExceeded {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Encode a file for transport without a preview resource.
pub fn encode(raw: &[u8], mime_type: impl Into<String>) -> Result<EncodedMedia, MediaError> {
    encode_with_preview(raw, mime_type, PreviewHandle::detached)
}

/// Encode a file for transport. `acquire_preview` runs only after the size
/// check passes, so a rejected upload never allocates a preview resource.
pub fn encode_with_preview(
    raw: &[u8],
    mime_type: impl Into<String>,
    acquire_preview: impl FnOnce() -> PreviewHandle,
) -> Result<EncodedMedia, MediaError> {
    ensure_within_limit(raw.len())?;
    Ok(EncodedMedia {
        raw_len: raw.len(),
        encoded_payload: STANDARD.encode(raw),
        mime_type: mime_type.into(),
        preview: acquire_preview(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_encode_round_trips() {
        let raw: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let media = encode(&raw, "video/mp4").unwrap();

        assert_eq!(media.raw_len(), raw.len());
        assert_eq!(media.mime_type(), "video/mp4");
        assert!(media.is_video());
        assert_eq!(STANDARD.decode(media.encoded_payload()).unwrap(), raw);
    }

    #[test]
    fn test_size_check_boundaries() {
        assert!(ensure_within_limit(MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            ensure_within_limit(MAX_UPLOAD_BYTES + 1),
            Err(MediaError::SizeLimitExceeded {
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES,
            })
        );
    }

    #[test]
    fn test_oversized_upload_rejected_without_acquiring_preview() {
        let raw = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let acquired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&acquired);

        let result = encode_with_preview(&raw, "video/mp4", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            PreviewHandle::detached()
        });

        assert!(matches!(
            result,
            Err(MediaError::SizeLimitExceeded { .. })
        ));
        assert_eq!(acquired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_preview_releases_exactly_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let mut handle = PreviewHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!handle.is_released());
        handle.release();
        handle.release();
        assert!(handle.is_released());
        drop(handle);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preview_released_on_drop_backstop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        {
            let _handle = PreviewHandle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_file_encodes() {
        let media = encode(&[], "image/png").unwrap();
        assert_eq!(media.encoded_payload(), "");
        assert!(!media.is_video());
    }
}
