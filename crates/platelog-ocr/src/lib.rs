//! # platelog-ocr
//!
//! Plate-text extraction: a remote vision-model tier with a local Tesseract
//! fallback, behind a [`PlateReader`] that never fails a request.

pub mod openai;
pub mod reader;
pub mod tesseract;
pub mod vision;

pub use openai::{OpenAiVisionBackend, OpenAiVisionConfig, VisionErrorCode};
pub use reader::PlateReader;
pub use tesseract::TesseractOcr;
pub use vision::{OcrEngine, VisionBackend};
