//! Record types for the flat-file store.

use serde::{Deserialize, Serialize};

/// One saved plate capture.
///
/// Field names serialize to the fixed Spanish column set of the flat file
/// (`id,fecha_hora,matricula,propietario,tipo_vehiculo,observacion,imagen`).
/// Records are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateRecord {
    /// Sequence number, assigned as `existing_count + 1`. Gaps after
    /// deletion are acceptable; ids are not reused.
    pub id: u32,

    /// Local wall-clock capture time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "fecha_hora")]
    pub captured_at: String,

    /// Normalized plate text, or the `NOT_DETECTED` sentinel.
    #[serde(rename = "matricula")]
    pub plate_text: String,

    /// Operator-entered owner name. Free text, no validation.
    #[serde(rename = "propietario")]
    pub owner: String,

    /// Operator-entered vehicle type. Free text.
    #[serde(rename = "tipo_vehiculo")]
    pub vehicle_type: String,

    /// Operator-entered note. Free text.
    #[serde(rename = "observacion")]
    pub note: String,

    /// Name of the stored image file, unique per record.
    #[serde(rename = "imagen")]
    pub image_filename: String,
}

/// A record about to be appended; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub captured_at: String,
    pub plate_text: String,
    pub owner: String,
    pub vehicle_type: String,
    pub note: String,
    pub image_filename: String,
}

impl NewRecord {
    /// Attach the store-assigned id.
    pub fn into_record(self, id: u32) -> PlateRecord {
        PlateRecord {
            id,
            captured_at: self.captured_at,
            plate_text: self.plate_text,
            owner: self.owner,
            vehicle_type: self.vehicle_type,
            note: self.note,
            image_filename: self.image_filename,
        }
    }
}
