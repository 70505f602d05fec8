pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::accounts::handlers as accounts;
use crate::assistant::handlers as assistant;
use crate::documents::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Credential store
        .route("/api/v1/auth/register", post(accounts::handle_register))
        .route("/api/v1/auth/login", post(accounts::handle_login))
        .route(
            "/api/v1/users/:id/password",
            put(accounts::handle_change_password),
        )
        .route("/api/v1/users/:id/role", get(accounts::handle_get_role))
        .route(
            "/api/v1/users/:id",
            delete(accounts::handle_delete_user),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(documents::handle_list_resumes).post(documents::handle_upload_resume),
        )
        .route("/api/v1/resumes/import", post(documents::handle_import_resume))
        .route(
            "/api/v1/resumes/:filename/text",
            get(documents::handle_resume_text),
        )
        .route(
            "/api/v1/resumes/:filename",
            delete(documents::handle_delete_resume),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(documents::handle_list_applications)
                .post(documents::handle_add_application)
                .delete(documents::handle_delete_application),
        )
        .route(
            "/api/v1/applications/latest",
            get(documents::handle_latest_application),
        )
        .route(
            "/api/v1/applications/exact",
            get(documents::handle_get_application),
        )
        // Assistant
        .route("/api/v1/assistant/chat", post(assistant::handle_chat))
        .route(
            "/api/v1/assistant/analyze-resume",
            post(assistant::handle_analyze_resume),
        )
        .route(
            "/api/v1/assistant/analyze-application",
            post(assistant::handle_analyze_application),
        )
        .route("/api/v1/assistant/compare", post(assistant::handle_compare))
        .route(
            "/api/v1/assistant/cover-letter",
            post(assistant::handle_cover_letter),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
