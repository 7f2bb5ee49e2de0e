//! # platelog-store
//!
//! Persistence for platelog: the flat CSV record store and the uploads
//! image store. Both are exposed as traits so the HTTP layer depends on
//! behavior, not on concrete file paths.

pub mod images;
pub mod records;

pub use images::{capture_filename, DirImageStore, ImageStore};
pub use records::{CsvRecordStore, RecordStore};
