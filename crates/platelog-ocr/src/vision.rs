//! Extraction backend traits.

use async_trait::async_trait;
use platelog_core::Result;

/// Backend that reads plate text from an image using a vision LLM.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Ask the model for the plate text visible in the image. Returns the
    /// raw model reply; normalization happens in the caller.
    async fn read_plate(&self, image_data: &[u8], mime_type: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Local OCR engine used as the fallback tier.
///
/// Recognition is synchronous and CPU-bound; callers run it under
/// `spawn_blocking`.
pub trait OcrEngine: Send + Sync {
    /// Run character recognition over the image bytes. Returns the raw
    /// recognized text.
    fn recognize(&self, image_data: &[u8]) -> Result<String>;
}
