use serde::Serialize;
use sqlx::FromRow;

pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// PHC-formatted Argon2id hash. Never leaves the process.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}
