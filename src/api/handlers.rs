//! Route handlers.

use super::types::{
    ErrorResponse, HealthResponse, NotesRequest, NotesResponse, PdfRequest, StyleInfo,
    StylesResponse, TranscriptQuery, TranscriptResponse,
};
use super::AppState;
use crate::error::NotesError;
use crate::notes::NoteStyle;
use crate::pdf::{download_filename, NotesDocument};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Error returned by a handler, rendered as `{ success: false, error }`.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<NotesError> for ApiError {
    fn from(e: NotesError) -> Self {
        let status = if e.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        } else {
            warn!("Rejected request: {}", self.message);
        }
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "YouTube Notes Generator API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "generate_notes": "/generate-notes",
            "generate_pdf": "/generate-pdf",
            "download_pdf": "/download-pdf",
            "health": "/health",
            "styles": "/styles",
        },
        "features": [
            "YouTube video transcript extraction",
            "AI-powered note generation",
            "Multiple note styles (comprehensive, summary, detailed, bullet points)",
            "PDF generation with formatting",
            "Video metadata extraction",
        ],
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "YouTube Notes Generator API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn styles() -> Json<StylesResponse> {
    Json(StylesResponse {
        styles: NoteStyle::ALL.into_iter().map(StyleInfo::from).collect(),
    })
}

pub async fn generate_notes(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NotesRequest>, JsonRejection>,
) -> ApiResult<Json<NotesResponse>> {
    let Json(req) = payload?;

    let style = match req.style.as_deref().map(str::trim) {
        None | Some("") => state.settings.notes.default_style,
        Some(value) => value.parse::<NoteStyle>().map_err(ApiError::bad_request)?,
    };

    info!("Generating {} notes for {}", style, req.url.trim());
    let generated = state.pipeline.generate_notes(req.url.trim(), style).await?;

    Ok(Json(NotesResponse::from(generated)))
}

/// Serves both `/generate-pdf` and `/download-pdf`.
pub async fn generate_pdf(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PdfRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;

    if req.notes.trim().is_empty() || req.title.trim().is_empty() {
        return Err(ApiError::bad_request("Missing notes or title"));
    }

    let renderer = state.renderer.clone();
    let filename = download_filename(&req.title);
    let bytes = tokio::task::spawn_blocking(move || {
        renderer.render(&NotesDocument {
            title: &req.title,
            notes: &req.notes,
            source_url: req.youtube_url.as_deref(),
            details: req.metadata.as_ref(),
        })
    })
    .await
    .map_err(|e| NotesError::Render(e.to_string()))??;

    info!("Rendered {} ({} bytes)", filename, bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Transcript check for a single video.
pub async fn test_youtube(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TranscriptQuery>,
) -> ApiResult<Json<TranscriptResponse>> {
    let transcript = state.pipeline.transcript_text(query.url.trim()).await?;
    Ok(Json(TranscriptResponse { transcript }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: "Method not allowed".to_string(),
    }
}

pub async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "Not found".to_string(),
    }
}
