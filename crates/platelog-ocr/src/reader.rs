//! Two-tier extraction orchestrator.

use std::sync::Arc;

use tracing::{debug, warn};

use platelog_core::plate::{normalize_read, PlateRead};

use crate::vision::{OcrEngine, VisionBackend};

/// Reads plate text with a degrade-gracefully policy: prefer the remote
/// vision model, fall back to local OCR, and never block record creation.
/// [`PlateReader::read`] is total; every failure path funnels to
/// [`PlateRead::NotDetected`].
pub struct PlateReader {
    vision: Option<Arc<dyn VisionBackend>>,
    local: Arc<dyn OcrEngine>,
}

impl PlateReader {
    pub fn new(vision: Option<Arc<dyn VisionBackend>>, local: Arc<dyn OcrEngine>) -> Self {
        Self { vision, local }
    }

    /// Extract the plate from `image_data`, trying the remote tier first.
    pub async fn read(&self, image_data: &[u8], mime_type: &str) -> PlateRead {
        if let Some(vision) = &self.vision {
            match vision.read_plate(image_data, mime_type).await {
                Ok(reply) => match normalize_read(&reply) {
                    PlateRead::Detected(text) => {
                        debug!(model = vision.model_name(), plate = %text, "Remote tier detected plate");
                        return PlateRead::Detected(text);
                    }
                    PlateRead::NotDetected => {
                        warn!(
                            model = vision.model_name(),
                            "Remote tier reply had no usable characters, trying local OCR"
                        );
                    }
                },
                Err(e) => {
                    warn!("Remote tier failed, trying local OCR: {}", e);
                }
            }
        } else {
            debug!("No remote tier configured, using local OCR");
        }

        self.read_local(image_data).await
    }

    async fn read_local(&self, image_data: &[u8]) -> PlateRead {
        let local = Arc::clone(&self.local);
        let image = image_data.to_vec();

        let recognized =
            tokio::task::spawn_blocking(move || local.recognize(&image)).await;

        match recognized {
            Ok(Ok(text)) => normalize_read(&text),
            Ok(Err(e)) => {
                warn!("Local OCR failed: {}", e);
                PlateRead::NotDetected
            }
            Err(e) => {
                warn!("Local OCR task panicked: {}", e);
                PlateRead::NotDetected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use platelog_core::{Error, Result};

    struct ScriptedVision {
        reply: Result<String>,
        calls: AtomicUsize,
    }

    impl ScriptedVision {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(Error::Vision("Network: connection refused".to_string())),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VisionBackend for ScriptedVision {
        async fn read_plate(&self, _image: &[u8], _mime: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(Error::Vision(e.to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct ScriptedOcr {
        reply: Result<String>,
        calls: AtomicUsize,
    }

    impl ScriptedOcr {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(Error::Ocr("no tessdata".to_string())),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OcrEngine for ScriptedOcr {
        fn recognize(&self, _image: &[u8]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(Error::Ocr(e.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_remote_success_skips_local_tier() {
        let vision = Arc::new(ScriptedVision::ok("the plate is abc-123!!"));
        let local = Arc::new(ScriptedOcr::ok("ZZZ-999"));
        let reader = PlateReader::new(Some(vision.clone()), local.clone());

        let read = reader.read(b"img", "image/jpeg").await;
        assert_eq!(read, PlateRead::Detected("ABC-123".to_string()));
        assert_eq!(vision.calls.load(Ordering::SeqCst), 1);
        assert_eq!(local.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_invokes_local_exactly_once() {
        let vision = Arc::new(ScriptedVision::failing());
        let local = Arc::new(ScriptedOcr::ok("AB C-123\n"));
        let reader = PlateReader::new(Some(vision), local.clone());

        let read = reader.read(b"img", "image/jpeg").await;
        assert_eq!(read, PlateRead::Detected("ABC-123".to_string()));
        assert_eq!(local.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_garbage_reply_falls_back() {
        let vision = Arc::new(ScriptedVision::ok("???"));
        let local = Arc::new(ScriptedOcr::ok("xyz-777"));
        let reader = PlateReader::new(Some(vision), local.clone());

        let read = reader.read(b"img", "image/jpeg").await;
        assert_eq!(read, PlateRead::Detected("XYZ-777".to_string()));
        assert_eq!(local.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_tiers_failing_is_not_detected() {
        let vision = Arc::new(ScriptedVision::failing());
        let local = Arc::new(ScriptedOcr::failing());
        let reader = PlateReader::new(Some(vision), local);

        let read = reader.read(b"img", "image/jpeg").await;
        assert_eq!(read, PlateRead::NotDetected);
    }

    #[tokio::test]
    async fn test_both_tiers_empty_is_not_detected() {
        let vision = Arc::new(ScriptedVision::ok(""));
        let local = Arc::new(ScriptedOcr::ok("  \n "));
        let reader = PlateReader::new(Some(vision), local);

        let read = reader.read(b"img", "image/jpeg").await;
        assert_eq!(read, PlateRead::NotDetected);
    }

    #[tokio::test]
    async fn test_without_remote_tier_local_is_used() {
        let local = Arc::new(ScriptedOcr::ok("JKL-456"));
        let reader = PlateReader::new(None, local.clone());

        let read = reader.read(b"img", "image/jpeg").await;
        assert_eq!(read, PlateRead::Detected("JKL-456".to_string()));
        assert_eq!(local.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_local_ocr_error_never_escapes() {
        let local = Arc::new(ScriptedOcr::failing());
        let reader = PlateReader::new(None, local);

        let read = reader.read(b"img", "image/jpeg").await;
        assert_eq!(read, PlateRead::NotDetected);
    }
}
