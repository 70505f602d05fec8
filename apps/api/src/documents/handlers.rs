//! Axum route handlers for the resume and application stores.

use std::path::PathBuf;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::documents::applications::{self, NewApplication};
use crate::documents::import::{ensure_importable, import_resume_file};
use crate::documents::resumes;
use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::resume::ResumeSummary;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub user_id: i64,
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ResumeCreated {
    pub id: i64,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeTextResponse {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AddApplicationRequest {
    pub user_id: i64,
    #[serde(flatten)]
    pub application: NewApplication,
}

#[derive(Debug, Deserialize)]
pub struct LatestApplicationQuery {
    pub user_id: i64,
    pub company: String,
    pub position: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationKeyQuery {
    pub user_id: i64,
    pub company: String,
    pub position: String,
    pub date: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(resumes::list_resumes(&state.db, params.user_id).await?))
}

/// POST /api/v1/resumes?user_id=
///
/// Multipart upload; the `file` field carries the resume.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeCreated>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("file field has no file name".to_string()))?;
        ensure_importable(&filename)?;

        let content: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let id = resumes::add_resume(&state.db, params.user_id, &filename, &content).await?;
        return Ok((StatusCode::CREATED, Json(ResumeCreated { id, filename })));
    }

    Err(AppError::Validation("missing 'file' field".to_string()))
}

/// POST /api/v1/resumes/import
///
/// Imports a file from the local filesystem by path.
pub async fn handle_import_resume(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<(StatusCode, Json<ResumeCreated>), AppError> {
    let id = import_resume_file(&state.db, req.user_id, &req.path).await?;
    let filename = req
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((StatusCode::CREATED, Json(ResumeCreated { id, filename })))
}

/// GET /api/v1/resumes/:filename/text?user_id=
pub async fn handle_resume_text(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeTextResponse>, AppError> {
    let text = resumes::open_resume_text(&state.db, params.user_id, &filename).await?;
    Ok(Json(ResumeTextResponse { filename, text }))
}

/// DELETE /api/v1/resumes/:filename?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    resumes::delete_resume(&state.db, params.user_id, &filename).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/applications?user_id=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(
        applications::list_applications(&state.db, params.user_id).await?,
    ))
}

/// POST /api/v1/applications
pub async fn handle_add_application(
    State(state): State<AppState>,
    Json(req): Json<AddApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let stored = applications::add_application(&state.db, req.user_id, &req.application).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/v1/applications/latest?user_id=&company=&position=
pub async fn handle_latest_application(
    State(state): State<AppState>,
    Query(q): Query<LatestApplicationQuery>,
) -> Result<Json<Application>, AppError> {
    applications::get_latest_application(&state.db, q.user_id, &q.company, &q.position)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("No application for {} at {}", q.position, q.company))
        })
}

/// GET /api/v1/applications/exact?user_id=&company=&position=&date=
pub async fn handle_get_application(
    State(state): State<AppState>,
    Query(q): Query<ApplicationKeyQuery>,
) -> Result<Json<Application>, AppError> {
    applications::get_application(&state.db, q.user_id, &q.company, &q.position, &q.date)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No application for {} at {} on {}",
                q.position, q.company, q.date
            ))
        })
}

/// DELETE /api/v1/applications?user_id=&company=&position=&date=
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Query(q): Query<ApplicationKeyQuery>,
) -> Result<StatusCode, AppError> {
    applications::delete_application(&state.db, q.user_id, &q.company, &q.position, &q.date)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
