//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::ats::{calculate_ats_score, AtsReport};
use crate::analysis::job_match::{analyze_job_match, JobAnalysis};
use crate::analysis::readiness::{analyze_readiness, ReadinessReport};
use crate::errors::AppError;
use crate::models::resume::{ResumeData, ResumeRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub resume_id: Uuid,
    /// May be empty; an empty description still yields a valid score.
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct JobMatchResponse {
    pub analysis: JobAnalysis,
}

/// POST /api/v1/analysis/job-match
///
/// Scores the stored resume against a pasted job description.
pub async fn handle_job_match(
    State(state): State<AppState>,
    Json(request): Json<JobMatchRequest>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let data = load_resume_data(&state, request.resume_id).await?;
    let analysis = analyze_job_match(&request.job_description, &data);
    Ok(Json(JobMatchResponse { analysis }))
}

/// GET /api/v1/resumes/:id/ats
pub async fn handle_ats_score(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<AtsReport>, AppError> {
    let data = load_resume_data(&state, resume_id).await?;
    Ok(Json(calculate_ats_score(&data)))
}

/// GET /api/v1/resumes/:id/readiness
pub async fn handle_readiness(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ReadinessReport>, AppError> {
    let data = load_resume_data(&state, resume_id).await?;
    Ok(Json(analyze_readiness(&data)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(find_resume(&state, resume_id).await?))
}

pub(crate) async fn find_resume(state: &AppState, resume_id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

pub(crate) async fn load_resume_data(
    state: &AppState,
    resume_id: Uuid,
) -> Result<ResumeData, AppError> {
    let row = find_resume(state, resume_id).await?;
    row.resume_data()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt resume snapshot {resume_id}: {e}")))
}
