#![allow(dead_code)]

use serde::Serialize;
use sqlx::FromRow;

/// A stored resume, including its raw file bytes (PDF, DOCX or plain text).
#[derive(Debug, Clone, FromRow)]
pub struct Resume {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub content: Vec<u8>,
}

/// Listing view of a resume; the blob stays in the store.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeSummary {
    pub id: i64,
    pub filename: String,
    pub size_bytes: i64,
}
