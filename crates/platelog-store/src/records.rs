//! Flat-file record store.
//!
//! The backing file is comma-separated with a fixed header row that is
//! present even when there are no records. There is no append-in-place or
//! update-in-place: every mutation is read-all, modify in memory, write-all.
//! A [`tokio::sync::Mutex`] serializes operations so two in-process requests
//! cannot interleave a read-modify-write and drop each other's changes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use platelog_core::defaults::CSV_HEADER;
use platelog_core::{NewRecord, PlateRecord, Result};

/// Ordered CRUD over the full record set.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the backing file with the header row if it does not exist.
    async fn ensure(&self) -> Result<()>;

    /// Read every record in file order. Empty when only the header exists.
    async fn read_all(&self) -> Result<Vec<PlateRecord>>;

    /// Overwrite the whole file with `records` (header + rows). The only
    /// mutation primitive.
    async fn write_all(&self, records: &[PlateRecord]) -> Result<()>;

    /// Assign the next id (`existing_count + 1`) and persist the record.
    async fn append(&self, record: NewRecord) -> Result<PlateRecord>;

    /// Remove every record with the given id. Returns the first removed
    /// record, or `None` when the id was absent (still a success).
    async fn delete_by_id(&self, id: u32) -> Result<Option<PlateRecord>>;

    /// Raw bytes of the backing file, for the download endpoint. Ensures
    /// the file exists first.
    async fn export(&self) -> Result<Vec<u8>>;
}

/// [`RecordStore`] backed by a single CSV file.
pub struct CsvRecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_inner(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut wtr = csv::Writer::from_path(&self.path)?;
        wtr.write_record(CSV_HEADER)?;
        wtr.flush()?;
        debug!(path = %self.path.display(), "Created record file with header");
        Ok(())
    }

    fn read_all_inner(&self) -> Result<Vec<PlateRecord>> {
        self.ensure_inner()?;
        let mut rdr = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in rdr.deserialize() {
            let record: PlateRecord = row?;
            records.push(record);
        }
        Ok(records)
    }

    fn write_all_inner(&self, records: &[PlateRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        wtr.write_record(CSV_HEADER)?;
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn ensure(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.ensure_inner()
    }

    async fn read_all(&self) -> Result<Vec<PlateRecord>> {
        let _guard = self.lock.lock().await;
        self.read_all_inner()
    }

    async fn write_all(&self, records: &[PlateRecord]) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_all_inner(records)
    }

    async fn append(&self, record: NewRecord) -> Result<PlateRecord> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all_inner()?;
        let record = record.into_record(records.len() as u32 + 1);
        records.push(record.clone());
        self.write_all_inner(&records)?;
        debug!(id = record.id, plate = %record.plate_text, "Appended record");
        Ok(record)
    }

    async fn delete_by_id(&self, id: u32) -> Result<Option<PlateRecord>> {
        let _guard = self.lock.lock().await;
        let records = self.read_all_inner()?;
        let (removed, kept): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|record| record.id == id);
        self.write_all_inner(&kept)?;
        debug!(id, found = !removed.is_empty(), "Deleted record");
        Ok(removed.into_iter().next())
    }

    async fn export(&self) -> Result<Vec<u8>> {
        let _guard = self.lock.lock().await;
        self.ensure_inner()?;
        let bytes = std::fs::read(&self.path)?;
        Ok(bytes)
    }
}
