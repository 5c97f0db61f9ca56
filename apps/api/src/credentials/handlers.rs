//! Axum route handlers for mail credentials.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::credentials::Envelope;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::mail::SenderCredentials;
use crate::state::AppState;

/// Gmail app passwords are 16 letters/digits, shown to users in groups of four.
const APP_PASSWORD_LEN: usize = 16;

#[derive(Debug, Deserialize)]
pub struct EncryptRequest {
    /// Anything other than a non-empty string counts as missing.
    pub password: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: Option<Value>,
    /// Numbers are accepted and checked like their decimal text.
    pub password: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResponse {
    fn failed(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                ok: false,
                error: Some(error.into()),
            }),
        )
    }
}

/// POST /encrypt
///
/// Seals a mail app password into an AES-256-GCM envelope for storage.
pub async fn handle_encrypt(
    State(state): State<AppState>,
    AppJson(request): AppJson<EncryptRequest>,
) -> Result<Json<Envelope>, AppError> {
    let password = match request.password {
        Some(Value::String(p)) if !p.is_empty() => Zeroizing::new(p),
        _ => return Err(AppError::Validation("Missing 'password'".to_string())),
    };

    let envelope = state.codec()?.encrypt(&password)?;
    Ok(Json(envelope))
}

/// POST /verify-mailpass
///
/// Checks an app password against the mail server before the user saves it.
/// Format and authentication failures are reported in the body with 200.
pub async fn handle_verify_mailpass(
    State(state): State<AppState>,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> (StatusCode, Json<VerifyResponse>) {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return VerifyResponse::failed(StatusCode::BAD_REQUEST, rejection.body_text())
        }
    };

    let email = match &request.email {
        Some(Value::String(email)) => email.trim().to_string(),
        _ => String::new(),
    };
    if email.is_empty() {
        return VerifyResponse::failed(StatusCode::BAD_REQUEST, "Missing email");
    }

    let raw_password = match request.password {
        Some(Value::String(p)) => Zeroizing::new(p),
        Some(Value::Number(n)) => Zeroizing::new(n.to_string()),
        _ => Zeroizing::new(String::new()),
    };
    let password = normalize_app_password(&raw_password);
    if password.is_empty() {
        return VerifyResponse::failed(StatusCode::BAD_REQUEST, "Missing password");
    }
    if !is_app_password_format(&password) {
        return VerifyResponse::failed(
            StatusCode::OK,
            "App Password should be 16 letters/numbers (paste without spaces)",
        );
    }

    let sender = SenderCredentials::new(email, password);
    match state.mailer.verify(&sender).await {
        Ok(()) => {
            info!("Verified mail credentials for {}", sender.email);
            (
                StatusCode::OK,
                Json(VerifyResponse {
                    ok: true,
                    error: None,
                }),
            )
        }
        Err(e) => {
            warn!("Mail credential verification failed for {}: {e}", sender.email);
            VerifyResponse::failed(StatusCode::OK, e.to_string())
        }
    }
}

/// Drops all whitespace users paste along with the grouped password.
fn normalize_app_password(raw: &str) -> Zeroizing<String> {
    Zeroizing::new(raw.chars().filter(|c| !c.is_whitespace()).collect())
}

fn is_app_password_format(password: &str) -> bool {
    password.len() == APP_PASSWORD_LEN && password.chars().all(|c| c.is_ascii_alphanumeric())
}
