//! Centralized default constants for platelog.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// RECORD STORE
// =============================================================================

/// Column header of the flat record file, in on-disk order.
pub const CSV_HEADER: [&str; 7] = [
    "id",
    "fecha_hora",
    "matricula",
    "propietario",
    "tipo_vehiculo",
    "observacion",
    "imagen",
];

/// Default path of the flat record file, relative to the working directory.
pub const DATA_PATH: &str = "data/registros.csv";

/// File name offered to the browser by the download endpoint.
pub const DOWNLOAD_NAME: &str = "registros.csv";

// =============================================================================
// IMAGE STORAGE
// =============================================================================

/// Default uploads directory, relative to the working directory.
pub const UPLOADS_DIR: &str = "uploads";

/// Timestamp format embedded in stored image file names (second resolution).
pub const CAPTURE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// =============================================================================
// PLATE TEXT
// =============================================================================

/// Maximum length of a normalized plate string.
pub const PLATE_MAX_LEN: usize = 10;

/// Value stored in the `matricula` column when both extraction tiers fail.
pub const PLATE_NOT_DETECTED: &str = "NOT_DETECTED";

/// Timestamp format of the `fecha_hora` column.
pub const CAPTURED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 5000;

/// Default HTTP bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Maximum request body size in bytes (bounds the image upload).
pub const MAX_BODY_SIZE_BYTES: usize = 10 * 1024 * 1024;

// =============================================================================
// VISION BACKEND
// =============================================================================

/// Default OpenAI-compatible API endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default vision model for plate reading.
pub const VISION_MODEL: &str = "gpt-4o-mini";

/// Timeout for vision requests in seconds.
pub const VISION_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// ENVIRONMENT VARIABLE NAMES
// =============================================================================

/// API key for the remote vision service. Remote tier is disabled when unset.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Override for the OpenAI-compatible base URL.
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Override for the vision model name.
pub const ENV_OPENAI_VISION_MODEL: &str = "OPENAI_VISION_MODEL";

/// Override for the vision request timeout (seconds).
pub const ENV_OPENAI_TIMEOUT: &str = "OPENAI_TIMEOUT";

/// Override for the Tesseract language(s), e.g. "eng" or "eng+spa".
pub const ENV_TESSERACT_LANG: &str = "TESSERACT_LANG";

/// Override for the flat record file path.
pub const ENV_DATA_PATH: &str = "DATA_PATH";

/// Override for the uploads directory.
pub const ENV_UPLOADS_DIR: &str = "UPLOADS_DIR";
