use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::credentials::Envelope;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::profile::ProfileRow;
use crate::profile::store::{get_profile, upsert_profile, ProfileChanges};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub resume_text: Option<String>,
    pub from_email: Option<String>,
    pub mail_password: Option<Envelope>,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = get_profile(&state.db, params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", params.user_id)))?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Omitted fields keep their stored values. A supplied `mail_password`
/// must be a well-formed envelope and replaces the stored one.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<Json<ProfileRow>, AppError> {
    let mail_password = update
        .mail_password
        .as_ref()
        .map(|envelope| -> Result<serde_json::Value, AppError> {
            envelope.check_shape()?;
            serde_json::to_value(envelope).map_err(|e| AppError::Internal(e.into()))
        })
        .transpose()?;

    let profile = upsert_profile(
        &state.db,
        ProfileChanges {
            user_id: update.user_id,
            full_name: trimmed(&update.full_name),
            phone: trimmed(&update.phone),
            email: trimmed(&update.email),
            github: trimmed(&update.github),
            linkedin: trimmed(&update.linkedin),
            portfolio: trimmed(&update.portfolio),
            resume_text: update.resume_text.as_deref(),
            from_email: trimmed(&update.from_email),
            mail_password,
        },
    )
    .await?;

    Ok(Json(profile))
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}
