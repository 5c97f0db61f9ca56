//! Axum route handler for email drafting.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::drafting::analyzer::{draft_email, DraftedEmail};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::profile::store::get_profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_description: Option<String>,
    pub applicant: Option<Value>,
    pub resume_text: Option<String>,
    /// When set, missing applicant/resume details are filled from the stored profile.
    pub user_id: Option<Uuid>,
}

/// POST /analyze
///
/// Drafts a recruiter email for a job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Result<Json<DraftedEmail>, AppError> {
    let job_description = request
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jobDescription is required".to_string()))?;

    let mut applicant = request.applicant;
    let mut resume_text = request.resume_text;
    if let Some(user_id) = request.user_id {
        if applicant.is_none() || resume_text.is_none() {
            if let Some(profile) = get_profile(&state.db, user_id).await? {
                if applicant.is_none() {
                    applicant = Some(profile.applicant());
                }
                if resume_text.is_none() {
                    resume_text = profile.resume_text;
                }
            }
        }
    }

    let draft = draft_email(
        &state.llm,
        &job_description,
        applicant.as_ref(),
        resume_text.as_deref(),
    )
    .await?;

    Ok(Json(draft))
}
