use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub company: String,
    pub position: String,
    /// NULL for rows written before the column existed.
    pub job_description: Option<String>,
    pub contact_person: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
}

impl Application {
    /// Text handed to the assistant when this application is analyzed.
    pub fn description_text(&self) -> &str {
        self.job_description.as_deref().unwrap_or_default()
    }
}
