//! HTTP handlers for the six platelog routes.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use platelog_core::defaults::{CAPTURED_AT_FORMAT, DOWNLOAD_NAME};
use platelog_core::NewRecord;
use platelog_store::{capture_filename, ImageStore, RecordStore};

use crate::pages::{self, Flash};
use crate::{ApiError, AppState};

/// Flash banner parameters carried across a redirect.
#[derive(Debug, Deserialize)]
pub struct FlashParams {
    level: Option<String>,
    msg: Option<String>,
}

impl FlashParams {
    fn into_flash(self) -> Option<Flash> {
        match (self.level, self.msg) {
            (Some(level), Some(msg)) => Some((level, msg)),
            _ => None,
        }
    }
}

fn flash_redirect(path: &str, level: &str, msg: &str) -> Redirect {
    Redirect::to(&format!(
        "{}?level={}&msg={}",
        path,
        level,
        urlencoding::encode(msg)
    ))
}

/// `GET /` — the upload form.
pub async fn index(Query(params): Query<FlashParams>) -> Html<String> {
    Html(pages::index_page(&params.into_flash()))
}

/// `POST /guardar` — store the image, extract the plate, append one record.
///
/// Multipart fields: `imagen` (file, required), `propietario`,
/// `tipo_vehiculo`, `observacion` (optional text). A missing or empty file
/// redirects back to the form with a warning; nothing is created.
pub async fn guardar(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;
    let mut owner = String::new();
    let mut vehicle_type = String::new();
    let mut note = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("imagen") => {
                content_type = field.content_type().map(|c| c.to_string());
                image_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                        .to_vec(),
                );
            }
            Some("propietario") => {
                owner = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
            }
            Some("tipo_vehiculo") => {
                vehicle_type = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
            }
            Some("observacion") => {
                note = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
            }
            _ => {} // ignore unknown fields
        }
    }

    let image_data = match image_data {
        Some(data) if !data.is_empty() => data,
        _ => return Ok(flash_redirect("/", "error", "Debes subir una imagen")),
    };

    let now = Local::now();
    let filename = capture_filename(now);
    state.images.save(&filename, &image_data).await?;

    let mime_type = content_type.as_deref().unwrap_or("image/jpeg");
    let plate = state.reader.read(&image_data, mime_type).await;

    let record = state
        .records
        .append(NewRecord {
            captured_at: now.format(CAPTURED_AT_FORMAT).to_string(),
            plate_text: plate.into_csv_field(),
            owner,
            vehicle_type,
            note,
            image_filename: filename,
        })
        .await?;

    info!(
        id = record.id,
        plate = %record.plate_text,
        image = %record.image_filename,
        "Saved capture"
    );

    Ok(flash_redirect("/", "ok", "Registro guardado correctamente"))
}

/// `GET /registros` — the record list.
pub async fn registros(
    State(state): State<AppState>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, ApiError> {
    let records = state.records.read_all().await?;
    Ok(Html(pages::records_page(&records, &params.into_flash())))
}

/// `GET /eliminar/:id` — delete a record and its image.
///
/// Always redirects to the list with a success flash, including when no
/// record matches (a non-numeric id matches nothing either).
pub async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    if let Ok(id) = id.parse::<u32>() {
        if let Some(removed) = state.records.delete_by_id(id).await? {
            state.images.delete(&removed.image_filename).await?;
            info!(id, image = %removed.image_filename, "Deleted record");
        }
    }

    Ok(flash_redirect(
        "/registros",
        "ok",
        "Registro eliminado correctamente",
    ))
}

/// `GET /uploads/:filename` — stream a stored capture image.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let data = state.images.open(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], data).into_response())
}

/// `GET /descargar` — download the flat file as `registros.csv`.
pub async fn descargar(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = state.records.export().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}
