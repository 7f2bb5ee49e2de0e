//! Local OCR tier backed by Tesseract.

use tracing::debug;

use platelog_core::defaults::ENV_TESSERACT_LANG;
use platelog_core::{Error, Result};

use crate::vision::OcrEngine;

/// [`OcrEngine`] over the system Tesseract installation.
///
/// Construction is cheap; the engine is initialized per recognition call.
/// Initialization or recognition failure surfaces as `Error::Ocr` and the
/// orchestrator degrades it to a not-detected read.
pub struct TesseractOcr {
    /// Language(s) passed to Tesseract, e.g. "eng" or "eng+spa".
    lang: String,
    /// Optional tessdata directory; `None` uses the system default.
    datapath: Option<String>,
}

impl TesseractOcr {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            datapath: None,
        }
    }

    /// Language from `TESSERACT_LANG`, defaulting to English.
    pub fn from_env() -> Self {
        let lang = std::env::var(ENV_TESSERACT_LANG).unwrap_or_else(|_| "eng".to_string());
        Self::new(lang)
    }

    /// Use a specific tessdata directory.
    pub fn with_datapath(mut self, datapath: impl Into<String>) -> Self {
        self.datapath = Some(datapath.into());
        self
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image_data: &[u8]) -> Result<String> {
        let tess = ::tesseract::Tesseract::new(self.datapath.as_deref(), Some(&self.lang))
            .map_err(|e| Error::Ocr(format!("init: {e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_data)
            .map_err(|e| Error::Ocr(format!("set image: {e:?}")))?;

        let text = tess
            .get_text()
            .map_err(|e| Error::Ocr(format!("recognize: {e:?}")))?;

        debug!(lang = %self.lang, text_len = text.len(), "Local OCR pass complete");
        Ok(text)
    }
}
