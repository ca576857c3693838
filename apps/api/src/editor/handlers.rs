//! Axum route handlers for the draft-session API.
//!
//! Sessions are in-memory and per-resume: created on first touch (seeded
//! from the stored snapshot) and gone on process restart. The session map
//! mutex is the single writer lock the session type requires.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::handlers::load_resume_data;
use crate::editor::session::DraftSession;
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DraftView {
    pub state: ResumeData,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl DraftView {
    fn of(session: &DraftSession<ResumeData>) -> Self {
        Self {
            state: session.state().clone(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
        }
    }
}

/// GET /api/v1/drafts/:id
///
/// Returns the live draft, creating the session from the stored resume if
/// this is the first touch.
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    ensure_session(&state, resume_id).await?;
    let drafts = state.drafts.lock().await;
    let session = drafts
        .get(&resume_id)
        .ok_or_else(|| AppError::NotFound(format!("Draft {resume_id} not found")))?;
    Ok(Json(DraftView::of(session)))
}

/// PUT /api/v1/drafts/:id
///
/// Applies an edited snapshot to the draft.
pub async fn handle_apply_edit(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(snapshot): Json<ResumeData>,
) -> Result<Json<DraftView>, AppError> {
    ensure_session(&state, resume_id).await?;
    let mut drafts = state.drafts.lock().await;
    let session = drafts
        .get_mut(&resume_id)
        .ok_or_else(|| AppError::NotFound(format!("Draft {resume_id} not found")))?;
    session.apply_edit(snapshot);
    Ok(Json(DraftView::of(session)))
}

/// POST /api/v1/drafts/:id/undo
pub async fn handle_undo(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    step_history(&state, resume_id, |s| {
        s.undo();
    })
    .await
}

/// POST /api/v1/drafts/:id/redo
pub async fn handle_redo(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    step_history(&state, resume_id, |s| {
        s.redo();
    })
    .await
}

/// POST /api/v1/drafts/:id/reset
///
/// Replaces the draft and its entire history with the given snapshot.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(snapshot): Json<ResumeData>,
) -> Result<Json<DraftView>, AppError> {
    ensure_session(&state, resume_id).await?;
    let mut drafts = state.drafts.lock().await;
    let session = drafts
        .get_mut(&resume_id)
        .ok_or_else(|| AppError::NotFound(format!("Draft {resume_id} not found")))?;
    session.reset(snapshot);
    Ok(Json(DraftView::of(session)))
}

/// Undo/redo are no-ops at the history boundary rather than errors, matching
/// how editors treat a disabled button press.
async fn step_history(
    state: &AppState,
    resume_id: Uuid,
    step: impl FnOnce(&mut DraftSession<ResumeData>),
) -> Result<Json<DraftView>, AppError> {
    let mut drafts = state.drafts.lock().await;
    let session = drafts
        .get_mut(&resume_id)
        .ok_or_else(|| AppError::NotFound(format!("Draft {resume_id} not found")))?;
    step(session);
    Ok(Json(DraftView::of(session)))
}

/// Seeds the session from the stored snapshot on first touch.
async fn ensure_session(state: &AppState, resume_id: Uuid) -> Result<(), AppError> {
    {
        let drafts = state.drafts.lock().await;
        if drafts.contains_key(&resume_id) {
            return Ok(());
        }
    }
    // Load outside the lock; a racing first touch just seeds the same state.
    let data = load_resume_data(state, resume_id).await?;
    let mut drafts = state.drafts.lock().await;
    drafts
        .entry(resume_id)
        .or_insert_with(|| DraftSession::new(data, state.config.history_depth));
    Ok(())
}
