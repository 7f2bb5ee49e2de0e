//! platelog-api - HTTP server for the plate-capture registry

mod handlers;
mod pages;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use platelog_core::defaults::{
    DATA_PATH, ENV_DATA_PATH, ENV_UPLOADS_DIR, MAX_BODY_SIZE_BYTES, SERVER_HOST, SERVER_PORT,
    UPLOADS_DIR,
};
use platelog_ocr::{OpenAiVisionBackend, PlateReader, TesseractOcr, VisionBackend};
use platelog_store::{CsvRecordStore, DirImageStore, ImageStore, RecordStore};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    records: Arc<dyn RecordStore>,
    images: Arc<dyn ImageStore>,
    reader: Arc<PlateReader>,
}

/// HTTP-facing error wrapper.
enum ApiError {
    Internal(String),
    NotFound(String),
    BadRequest(String),
}

impl From<platelog_core::Error> for ApiError {
    fn from(err: platelog_core::Error) -> Self {
        match err {
            platelog_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/guardar", post(handlers::guardar))
        .route("/registros", get(handlers::registros))
        .route("/eliminar/:id", get(handlers::eliminar))
        .route("/uploads/:filename", get(handlers::serve_upload))
        .route("/descargar", get(handlers::descargar))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE_BYTES))
        .with_state(state)
}

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT - "json" or "text" (default: "text")
///   RUST_LOG   - standard env filter (default: "platelog_api=debug,tower_http=info")
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "platelog_api=debug,tower_http=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing();

    // Get configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| SERVER_HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(SERVER_PORT);
    let data_path = std::env::var(ENV_DATA_PATH).unwrap_or_else(|_| DATA_PATH.to_string());
    let uploads_dir = std::env::var(ENV_UPLOADS_DIR).unwrap_or_else(|_| UPLOADS_DIR.to_string());

    let records = Arc::new(CsvRecordStore::new(&data_path));
    records.ensure().await?;
    info!(path = %data_path, "Record store ready");

    let images = Arc::new(DirImageStore::new(&uploads_dir));

    let vision = OpenAiVisionBackend::from_env()?;
    match &vision {
        Some(backend) => info!(model = backend.model_name(), "Remote vision tier enabled"),
        None => info!("OPENAI_API_KEY not set; remote vision tier disabled"),
    }
    let reader = Arc::new(PlateReader::new(
        vision.map(|b| Arc::new(b) as Arc<dyn VisionBackend>),
        Arc::new(TesseractOcr::from_env()),
    ));

    let state = AppState {
        records,
        images,
        reader,
    };
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("platelog listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
