//! # platelog-core
//!
//! Core types, errors, and plate-text normalization shared by the
//! platelog crates.

pub mod defaults;
pub mod error;
pub mod models;
pub mod plate;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{NewRecord, PlateRecord};
pub use plate::{normalize, PlateRead};
