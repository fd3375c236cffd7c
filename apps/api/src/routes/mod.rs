pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Ingest
        .route("/api/v1/resume/parse", post(profile::handle_parse))
        .route("/api/v1/resume/import", post(profile::handle_import))
        .route(
            "/api/v1/resume/import/file",
            post(profile::handle_import_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Master profile
        .route(
            "/api/v1/master",
            get(profile::handle_get_master).delete(profile::handle_reset_master),
        )
        .route("/api/v1/master/merge", post(profile::handle_merge_master))
        // Workspace session
        .route(
            "/api/v1/session",
            get(profile::handle_get_session)
                .put(profile::handle_save_session)
                .delete(profile::handle_clear_session),
        )
        // Assistant
        .route("/api/v1/tailor", post(assistant::handle_tailor))
        .route("/api/v1/chat", post(assistant::handle_chat))
        .with_state(state)
}
