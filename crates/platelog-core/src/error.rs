//! Error types for platelog.

use thiserror::Error;

/// Result type alias using platelog's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for platelog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Record store operation failed
    #[error("Store error: {0}")]
    Store(String),

    /// Image storage operation failed
    #[error("Image error: {0}")]
    Image(String),

    /// Remote vision extraction failed
    #[error("Vision error: {0}")]
    Vision(String),

    /// Local OCR pass failed
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Store(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_store() {
        let err = Error::Store("bad row".to_string());
        assert_eq!(err.to_string(), "Store error: bad row");
    }

    #[test]
    fn test_error_display_image() {
        let err = Error::Image("write failed".to_string());
        assert_eq!(err.to_string(), "Image error: write failed");
    }

    #[test]
    fn test_error_display_vision() {
        let err = Error::Vision("model timeout".to_string());
        assert_eq!(err.to_string(), "Vision error: model timeout");
    }

    #[test]
    fn test_error_display_ocr() {
        let err = Error::Ocr("engine init".to_string());
        assert_eq!(err.to_string(), "OCR error: engine init");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("plate_x.jpg".to_string());
        assert_eq!(err.to_string(), "Not found: plate_x.jpg");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
