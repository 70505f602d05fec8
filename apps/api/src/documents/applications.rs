use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::application::Application;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields supplied when a job application is recorded.
#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub contact_person: String,
    pub date: String,
}

impl NewApplication {
    /// Checks required fields and returns the canonical form of `date`.
    fn validate(&self) -> Result<String, AppError> {
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("company cannot be empty".to_string()));
        }
        if self.position.trim().is_empty() {
            return Err(AppError::Validation("position cannot be empty".to_string()));
        }
        canonical_date(&self.date)
    }
}

/// Parses a calendar date and re-renders it zero-padded (`2024-6-1` becomes
/// `2024-06-01`). Stored dates are compared as text, so every date written
/// or used as a key goes through here.
pub fn canonical_date(date: &str) -> Result<String, AppError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map(|parsed| parsed.format(DATE_FORMAT).to_string())
        .map_err(|_| AppError::Validation(format!("date '{date}' must be YYYY-MM-DD")))
}

pub async fn add_application(
    pool: &SqlitePool,
    user_id: i64,
    new: &NewApplication,
) -> Result<Application, AppError> {
    let date = new.validate()?;

    let application = sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications (user_id, company, position, job_description, contact_person, date)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&new.company)
    .bind(&new.position)
    .bind(&new.job_description)
    .bind(&new.contact_person)
    .bind(&date)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::NotFound(format!("User {user_id} not found"))
        }
        other => AppError::Database(other),
    })?;

    info!(
        "Recorded application {} ({} at {}) for user {user_id}",
        application.id, application.position, application.company
    );
    Ok(application)
}

pub async fn list_applications(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Application>, AppError> {
    Ok(sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Most recent application for a company/position. Latest date wins; on equal
/// dates the later insert wins.
pub async fn get_latest_application(
    pool: &SqlitePool,
    user_id: i64,
    company: &str,
    position: &str,
) -> Result<Option<Application>, AppError> {
    Ok(sqlx::query_as::<_, Application>(
        r#"
        SELECT * FROM applications
        WHERE user_id = ? AND company = ? AND position = ?
        ORDER BY date DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(company)
    .bind(position)
    .fetch_optional(pool)
    .await?)
}

/// Application matching the full (company, position, date) key.
pub async fn get_application(
    pool: &SqlitePool,
    user_id: i64,
    company: &str,
    position: &str,
    date: &str,
) -> Result<Option<Application>, AppError> {
    let date = canonical_date(date)?;
    Ok(sqlx::query_as::<_, Application>(
        r#"
        SELECT * FROM applications
        WHERE user_id = ? AND company = ? AND position = ? AND date = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(company)
    .bind(position)
    .bind(&date)
    .fetch_optional(pool)
    .await?)
}

pub async fn delete_application(
    pool: &SqlitePool,
    user_id: i64,
    company: &str,
    position: &str,
    date: &str,
) -> Result<(), AppError> {
    let date = canonical_date(date)?;
    let result = sqlx::query(
        "DELETE FROM applications WHERE user_id = ? AND company = ? AND position = ? AND date = ?",
    )
    .bind(user_id)
    .bind(company)
    .bind(position)
    .bind(&date)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Application {position} at {company} on {date} not found"
        )));
    }

    info!("Deleted application {position} at {company} on {date} for user {user_id}");
    Ok(())
}
