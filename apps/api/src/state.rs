use sqlx::SqlitePool;

use crate::assistant::chief::Assistant;

/// Shared application state injected into all route handlers via Axum extractors.
/// The pool is the only store handle; it is opened once in `main` and closed on shutdown.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub assistant: Assistant,
}
