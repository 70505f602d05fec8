use sqlx::SqlitePool;
use tracing::info;

use crate::documents::extract::{extract_text_lenient, DocumentKind};
use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeSummary};

/// Stores a resume's raw bytes under its file name. Returns the new row id.
pub async fn add_resume(
    pool: &SqlitePool,
    user_id: i64,
    filename: &str,
    content: &[u8],
) -> Result<i64, AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::Validation("filename cannot be empty".to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO resumes (user_id, filename, content) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(filename)
    .bind(content)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::NotFound(format!("User {user_id} not found"))
        }
        other => AppError::Database(other),
    })?;

    info!(
        "Stored resume {filename} ({} bytes) for user {user_id}",
        content.len()
    );
    Ok(id)
}

pub async fn list_resumes(pool: &SqlitePool, user_id: i64) -> Result<Vec<ResumeSummary>, AppError> {
    Ok(sqlx::query_as::<_, ResumeSummary>(
        "SELECT id, filename, length(content) AS size_bytes FROM resumes WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Most recently uploaded resume with this file name.
pub async fn get_resume_by_filename(
    pool: &SqlitePool,
    user_id: i64,
    filename: &str,
) -> Result<Option<Resume>, AppError> {
    Ok(sqlx::query_as::<_, Resume>(
        "SELECT * FROM resumes WHERE user_id = ? AND filename = ? ORDER BY id DESC LIMIT 1",
    )
    .bind(user_id)
    .bind(filename)
    .fetch_optional(pool)
    .await?)
}

/// Deletes every resume the user stored under `filename`.
pub async fn delete_resume(pool: &SqlitePool, user_id: i64, filename: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE user_id = ? AND filename = ?")
        .bind(user_id)
        .bind(filename)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {filename} not found")));
    }

    info!("Deleted resume {filename} for user {user_id}");
    Ok(())
}

/// Loads a stored resume and extracts its plain text for viewing or analysis.
pub async fn open_resume_text(
    pool: &SqlitePool,
    user_id: i64,
    filename: &str,
) -> Result<String, AppError> {
    let resume = get_resume_by_filename(pool, user_id, filename)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {filename} not found")))?;

    // PDF and DOCX parsing is CPU-bound; keep it off the async workers.
    let kind = DocumentKind::from_filename(&resume.filename);
    let text = tokio::task::spawn_blocking(move || extract_text_lenient(&resume.content, kind))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
        })??;
    Ok(text)
}
