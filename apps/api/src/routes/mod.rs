pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::editor::handlers as editor;
use crate::pdf::handlers as pdf;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analysis/job-match",
            post(analysis::handle_job_match),
        )
        .route("/api/v1/resumes/:id", get(analysis::handle_get_resume))
        .route("/api/v1/resumes/:id/ats", get(analysis::handle_ats_score))
        .route(
            "/api/v1/resumes/:id/readiness",
            get(analysis::handle_readiness),
        )
        // Draft sessions (undo/redo)
        .route(
            "/api/v1/drafts/:id",
            get(editor::handle_get_draft).put(editor::handle_apply_edit),
        )
        .route("/api/v1/drafts/:id/undo", post(editor::handle_undo))
        .route("/api/v1/drafts/:id/redo", post(editor::handle_redo))
        .route("/api/v1/drafts/:id/reset", post(editor::handle_reset))
        // Public download
        .route(
            "/api/public/:username/:slug/download",
            post(pdf::handle_download),
        )
        .with_state(state)
}
