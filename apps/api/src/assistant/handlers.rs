//! Axum route handlers for the assistant.
//!
//! Store misses and unreadable resumes are reported as errors. Once the
//! documents are loaded, the reply is always 200: remote failures come back
//! as the assistant's apology text.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::documents::applications::get_latest_application;
use crate::documents::resumes::open_resume_text;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeRef {
    pub user_id: i64,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationRef {
    pub user_id: i64,
    pub company: String,
    pub position: String,
}

#[derive(Debug, Deserialize)]
pub struct PairRef {
    pub user_id: i64,
    pub filename: String,
    pub company: String,
    pub position: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub reply: String,
}

impl From<String> for AssistantReply {
    fn from(reply: String) -> Self {
        Self { reply }
    }
}

async fn load_application_text(
    pool: &SqlitePool,
    user_id: i64,
    company: &str,
    position: &str,
) -> Result<String, AppError> {
    get_latest_application(pool, user_id, company, position)
        .await?
        .map(|app| app.description_text().to_owned())
        .ok_or_else(|| AppError::NotFound(format!("No application for {position} at {company}")))
}

/// POST /api/v1/assistant/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AssistantReply>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    Ok(Json(state.assistant.respond(&req.message).await.into()))
}

/// POST /api/v1/assistant/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(req): Json<ResumeRef>,
) -> Result<Json<AssistantReply>, AppError> {
    let resume = open_resume_text(&state.db, req.user_id, &req.filename).await?;
    Ok(Json(state.assistant.analyze_resume(&resume).await.into()))
}

/// POST /api/v1/assistant/analyze-application
pub async fn handle_analyze_application(
    State(state): State<AppState>,
    Json(req): Json<ApplicationRef>,
) -> Result<Json<AssistantReply>, AppError> {
    let application =
        load_application_text(&state.db, req.user_id, &req.company, &req.position).await?;
    Ok(Json(
        state.assistant.analyze_application(&application).await.into(),
    ))
}

/// POST /api/v1/assistant/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(req): Json<PairRef>,
) -> Result<Json<AssistantReply>, AppError> {
    let resume = open_resume_text(&state.db, req.user_id, &req.filename).await?;
    let application =
        load_application_text(&state.db, req.user_id, &req.company, &req.position).await?;
    Ok(Json(state.assistant.compare(&resume, &application).await.into()))
}

/// POST /api/v1/assistant/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<PairRef>,
) -> Result<Json<AssistantReply>, AppError> {
    let resume = open_resume_text(&state.db, req.user_id, &req.filename).await?;
    let application =
        load_application_text(&state.db, req.user_id, &req.company, &req.position).await?;
    Ok(Json(
        state
            .assistant
            .generate_cover_letter(&resume, &application)
            .await
            .into(),
    ))
}
