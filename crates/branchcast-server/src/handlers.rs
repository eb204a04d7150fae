//! HTTP request handlers for the Server.
//!
//! Implements generation, feed, export and view-logging endpoints using axum.

use crate::conversions::{
    generation_csv, FeedEntryDto, GenerateBody, GenerateResponse, GenerationDto, MessageResponse,
    ViewBody, ViewResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use branchcast_domain::traits::ArchiveStore;
use branchcast_domain::{now_millis, GenerationId, GenerationRequest, Stance, ViewEvent};
use branchcast_fetcher::FetchError;
use branchcast_generator::{GenerationPipeline, PipelineError};
use branchcast_store::{SqliteArchive, StoreError};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Fetch, generate and persist pipeline
    pub pipeline: Arc<dyn GenerationPipeline>,
    /// Archive the pipeline writes into
    pub store: Arc<Mutex<SqliteArchive>>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing request input
    Validation(String),
    /// Unknown generation or branch
    NotFound(String),
    /// Fetched page had no readable text
    EmptyArticle,
    /// Generation batch failed
    Pipeline(PipelineError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::EmptyArticle => (
                StatusCode::BAD_REQUEST,
                "No text could be extracted from the article".to_string(),
            ),
            AppError::Pipeline(e) => {
                error!("Generation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate content".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Fetch(FetchError::EmptyContent) => AppError::EmptyArticle,
            PipelineError::Fetch(FetchError::InvalidUrl(msg)) => {
                AppError::Validation(format!("Invalid article URL: {}", msg))
            }
            other => AppError::Pipeline(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl AppState {
    /// Run one synchronous store call under the lock
    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut SqliteArchive) -> Result<T, StoreError>,
    ) -> Result<T, AppError> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| AppError::Internal(format!("Store lock error: {}", e)))?;
        Ok(f(&mut store)?)
    }
}

/// Ids that do not parse cannot exist
fn parse_generation_id(raw: &str) -> Result<GenerationId, AppError> {
    GenerationId::parse(raw).map_err(|_| AppError::NotFound(format!("Generation not found: {}", raw)))
}

/// GET / - Liveness
async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Branchcast API is running".to_string(),
    })
}

/// POST /generate - Generate and store posts for every branch
async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let Json(body) = body?;

    let url = body
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("url is required".to_string()))?;
    let raw_type = body
        .stance
        .ok_or_else(|| AppError::Validation("type is required".to_string()))?;
    let stance = Stance::parse(&raw_type)
        .ok_or_else(|| AppError::Validation(format!("type must be PRO or ANTI, got '{}'", raw_type)))?;

    info!("Generate request: {} ({})", url, stance);

    let id = state
        .pipeline
        .run_batch(GenerationRequest {
            source_url: url,
            stance,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            message: "Content generated successfully".to_string(),
            id: id.to_string(),
        }),
    ))
}

/// GET /generations - Every generation, newest first
async fn list_generations(
    State(state): State<AppState>,
) -> Result<Json<Vec<GenerationDto>>, AppError> {
    let records = state.with_store(|store| store.list_generations())?;
    Ok(Json(records.iter().map(GenerationDto::from).collect()))
}

/// GET /generations/:branchId - One branch's feed, newest first
async fn branch_feed(
    State(state): State<AppState>,
    Path(raw_branch): Path<String>,
) -> Result<Json<Vec<FeedEntryDto>>, AppError> {
    let branch = state
        .pipeline
        .registry()
        .resolve(&raw_branch)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Unknown branch: {}", raw_branch)))?;

    let entries = state.with_store(|store| store.list_for_branch(&branch))?;
    Ok(Json(entries.iter().map(FeedEntryDto::from).collect()))
}

/// GET /generations/:id/export - One generation as CSV
async fn export_generation(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_generation_id(&raw_id)?;
    let record = state
        .with_store(|store| store.get_generation(id))?
        .ok_or_else(|| AppError::NotFound(format!("Generation not found: {}", raw_id)))?;

    let disposition = format!("attachment; filename=\"generation-{}.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        generation_csv(&record),
    )
        .into_response())
}

/// POST /view - Record that a branch viewed a generation
async fn record_view(
    State(state): State<AppState>,
    body: Result<Json<ViewBody>, JsonRejection>,
) -> Result<Json<ViewResponse>, AppError> {
    let Json(body) = body?;

    let (Some(raw_id), Some(raw_branch)) = (body.generation_id, body.branch_id) else {
        return Err(AppError::Validation(
            "generationId and branchId are required".to_string(),
        ));
    };

    let branch = state
        .pipeline
        .registry()
        .resolve(&raw_branch)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Unknown branch: {}", raw_branch)))?;
    let id = parse_generation_id(&raw_id)?;

    let view = ViewEvent {
        branch_id: branch,
        viewed_at: now_millis(),
    };
    let appended = state.with_store(|store| store.record_view(id, view))?;

    if !appended {
        warn!("View for unknown generation {}", raw_id);
        return Err(AppError::NotFound(format!("Generation not found: {}", raw_id)));
    }

    info!("Recorded view of {} by '{}'", id, raw_branch);
    Ok(Json(ViewResponse { success: true }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    // Both routes share one parameter name at this position
    AxumRouter::new()
        .route("/", get(health))
        .route("/generate", post(generate))
        .route("/generations", get(list_generations))
        .route("/generations/:key", get(branch_feed))
        .route("/generations/:key/export", get(export_generation))
        .route("/view", post(record_view))
        .with_state(state)
}
