pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::credentials::handlers::{handle_encrypt, handle_verify_mailpass};
use crate::drafting::handlers::handle_analyze;
use crate::mail::handlers::handle_send;
use crate::profile::handlers::{handle_get_profile, handle_put_profile};
use crate::resume::handlers::{handle_parse_resume, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Base64 attachments grow by a third over the raw upload size.
const MAX_SEND_BYTES: usize = MAX_UPLOAD_BYTES * 3 / 2;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Mail credentials
        .route("/encrypt", post(handle_encrypt))
        .route("/verify-mailpass", post(handle_verify_mailpass))
        .route(
            "/send",
            post(handle_send).layer(DefaultBodyLimit::max(MAX_SEND_BYTES)),
        )
        // Drafting and resume ingestion
        .route("/analyze", post(handle_analyze))
        .route(
            "/parse-resume",
            post(handle_parse_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Profile API
        .route(
            "/api/v1/profile",
            get(handle_get_profile).put(handle_put_profile),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DEFAULT_SMTP_HOST};
    use crate::credentials::key::KEY_SIZE;
    use crate::credentials::{CredentialKey, Envelope, EnvelopeCodec};
    use crate::llm_client::LlmClient;
    use crate::mail::transport::testing::RecordingMailer;
    use crate::mail::{MailTransport, SmtpMailer};

    const APP_PASSWORD: &str = "abcd1234efgh5678";

    fn codec(byte: u8) -> EnvelopeCodec {
        EnvelopeCodec::new(CredentialKey::from_bytes(&[byte; KEY_SIZE]).unwrap())
    }

    fn test_state(codec: Option<EnvelopeCodec>, mailer: Arc<RecordingMailer>) -> AppState {
        state_with_transport(codec, mailer)
    }

    fn state_with_transport(
        codec: Option<EnvelopeCodec>,
        mailer: Arc<dyn MailTransport>,
    ) -> AppState {
        let config = Config {
            database_url: "postgres://localhost/applymate_test".to_string(),
            gemini_api_key: "test-key".to_string(),
            gemini_model: None,
            mail_pass_key: None,
            mail_pass_key_encoding: "hex".to_string(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            port: 0,
            rust_log: "info".to_string(),
        };
        AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            llm: LlmClient::new(config.gemini_api_key, None).unwrap(),
            codec: codec.map(Arc::new),
            mailer,
        }
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send_json(app, "POST", uri, body).await
    }

    async fn send_json(app: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn send_body(envelope: &Envelope) -> Value {
        json!({
            "to": "recruiter@example.com",
            "subject": "Application for Backend Engineer",
            "body": "Hello",
            "html": "<p>Hello</p>",
            "attachments": [{
                "filename": "resume.pdf",
                "content": "JVBERi0xLjQ=",
                "contentType": "application/pdf"
            }],
            "fromEmail": "me@gmail.com",
            "mailPassword": {
                "cipher": envelope.encrypted,
                "iv": envelope.iv,
                "tag": envelope.tag
            }
        })
    }

    #[tokio::test]
    async fn test_health_reports_codec_state() {
        for (maybe_codec, expected) in [(None, "disabled"), (Some(codec(1)), "ready")] {
            let app = build_router(test_state(maybe_codec, Arc::default()));
            let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["mailCredentials"], expected);
        }
    }

    #[tokio::test]
    async fn test_encrypt_returns_envelope() {
        let app = build_router(test_state(Some(codec(1)), Arc::default()));
        let (status, body) = post_json(app, "/encrypt", json!({ "password": APP_PASSWORD })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alg"], "AES-256-GCM");
        assert_eq!(body["keyVersion"], 1);
        assert_eq!(body["iv"].as_str().unwrap().len(), 32);
        assert_eq!(body["tag"].as_str().unwrap().len(), 32);

        let envelope: Envelope = serde_json::from_value(body).unwrap();
        assert_eq!(codec(1).decrypt(&envelope).unwrap().as_str(), APP_PASSWORD);
    }

    #[tokio::test]
    async fn test_encrypt_requires_password() {
        for body in [json!({}), json!({ "password": "" })] {
            let app = build_router(test_state(Some(codec(1)), Arc::default()));
            let (status, body) = post_json(app, "/encrypt", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Missing 'password'");
        }
    }

    #[tokio::test]
    async fn test_encrypt_non_string_password_is_missing() {
        for password in [json!(12345), json!(["abcd"]), Value::Null] {
            let app = build_router(test_state(Some(codec(1)), Arc::default()));
            let (status, body) = post_json(app, "/encrypt", json!({ "password": password })).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Missing 'password'");
        }
    }

    #[tokio::test]
    async fn test_encrypt_malformed_json_is_json_error() {
        let app = build_router(test_state(Some(codec(1)), Arc::default()));
        let request = Request::builder()
            .method("POST")
            .uri("/encrypt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"password\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_encrypt_without_key_is_server_error() {
        let app = build_router(test_state(None, Arc::default()));
        let (status, body) = post_json(app, "/encrypt", json!({ "password": APP_PASSWORD })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_send_decrypts_and_delivers() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(Some(codec(2)), mailer.clone()));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();

        let (status, body) = post_json(app, "/send", send_body(&envelope)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "me@gmail.com");
        assert_eq!(sent[0].subject, "Application for Backend Engineer");
        assert_eq!(sent[0].password, APP_PASSWORD);
        assert_eq!(sent[0].recipients, 1);
        assert_eq!(sent[0].attachments, 1);
    }

    #[tokio::test]
    async fn test_send_accepts_encrypted_alias() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(Some(codec(2)), mailer.clone()));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();
        let mut body = send_body(&envelope);
        body["mailPassword"] = serde_json::to_value(&envelope).unwrap();

        let (status, _) = post_json(app, "/send", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_missing_message_fields() {
        let mailer = Arc::new(RecordingMailer::default());
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();

        for field in ["to", "subject"] {
            let app = build_router(test_state(Some(codec(2)), mailer.clone()));
            let mut body = send_body(&envelope);
            body.as_object_mut().unwrap().remove(field);
            let (status, body) = post_json(app, "/send", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }

        let app = build_router(test_state(Some(codec(2)), mailer.clone()));
        let mut body = send_body(&envelope);
        body.as_object_mut().unwrap().remove("body");
        body.as_object_mut().unwrap().remove("html");
        let (status, _) = post_json(app, "/send", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_incomplete_envelope_is_validation_error() {
        let app = build_router(test_state(Some(codec(2)), Arc::default()));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();
        let mut body = send_body(&envelope);
        body["mailPassword"].as_object_mut().unwrap().remove("tag");

        let (status, body) = post_json(app, "/send", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_send_mistyped_envelope_field_is_validation_error() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(Some(codec(2)), mailer.clone()));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();
        let mut body = send_body(&envelope);
        body["mailPassword"]["iv"] = json!(42);

        let (status, body) = post_json(app, "/send", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].is_string());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_invalid_sender_address_is_validation_error() {
        let transport: Arc<dyn MailTransport> = Arc::new(SmtpMailer::new("smtp.invalid"));
        let app = build_router(state_with_transport(Some(codec(2)), transport));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();
        let mut body = send_body(&envelope);
        body["fromEmail"] = json!("not-an-address");

        let (status, body) = post_json(app, "/send", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"], "Invalid sender address 'not-an-address'");
    }

    #[tokio::test]
    async fn test_profile_put_rejects_malformed_envelope() {
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();
        let mut foreign_alg = serde_json::to_value(&envelope).unwrap();
        foreign_alg["alg"] = json!("AES-128-CBC");
        let mut bad_hex = serde_json::to_value(&envelope).unwrap();
        bad_hex["iv"] = json!("not-hex");
        let mut short_tag = serde_json::to_value(&envelope).unwrap();
        short_tag["tag"] = json!("abcd");

        for mail_password in [foreign_alg, bad_hex, short_tag] {
            let app = build_router(test_state(Some(codec(2)), Arc::default()));
            let (status, body) = send_json(
                app,
                "PUT",
                "/api/v1/profile",
                json!({
                    "user_id": "7d1c3a52-4b1e-4c55-9f0e-2f6a1d9b8c01",
                    "from_email": "me@gmail.com",
                    "mail_password": mail_password,
                }),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_profile_get_bad_user_id_is_json_error() {
        let app = build_router(test_state(None, Arc::default()));
        let request = Request::builder()
            .uri("/api/v1/profile?user_id=nope")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_send_tampered_envelope_is_opaque_failure() {
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();

        let mut bad_tag = envelope.clone();
        bad_tag.tag = "00".repeat(16);
        let mut short_iv = envelope.clone();
        short_iv.iv.truncate(16);
        let mut bad_hex = envelope.clone();
        bad_hex.encrypted = "zz".to_string();

        for tampered in [bad_tag, short_iv, bad_hex] {
            let mailer = Arc::new(RecordingMailer::default());
            let app = build_router(test_state(Some(codec(2)), mailer.clone()));
            let (status, body) = post_json(app, "/send", send_body(&tampered)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "DECRYPTION_FAILED");
            assert_eq!(body["error"], "Unable to decrypt mail credentials");
            assert!(mailer.sent.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_send_with_rotated_key_fails() {
        let app = build_router(test_state(Some(codec(3)), Arc::default()));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();

        let (status, body) = post_json(app, "/send", send_body(&envelope)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DECRYPTION_FAILED");
    }

    #[tokio::test]
    async fn test_send_without_key_is_server_error() {
        let app = build_router(test_state(None, Arc::default()));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();

        let (status, body) = post_json(app, "/send", send_body(&envelope)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_send_transport_failure_is_server_error() {
        let mailer = Arc::new(RecordingMailer::failing("535 Username and Password not accepted"));
        let app = build_router(test_state(Some(codec(2)), mailer));
        let envelope = codec(2).encrypt(APP_PASSWORD).unwrap();

        let (status, body) = post_json(app, "/send", send_body(&envelope)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "MAIL_ERROR");
        assert!(body["error"].as_str().unwrap().contains("535"));
    }

    #[tokio::test]
    async fn test_verify_mailpass_format_check() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(None, mailer.clone()));
        let (status, body) = post_json(
            app,
            "/verify-mailpass",
            json!({ "email": "me@gmail.com", "password": "too short" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], false);
        assert!(mailer.verified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_mailpass_accepts_grouped_password() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(None, mailer.clone()));
        let (status, body) = post_json(
            app,
            "/verify-mailpass",
            json!({ "email": " me@gmail.com ", "password": "abcd 1234 efgh 5678" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
        assert_eq!(*mailer.verified.lock().unwrap(), vec!["me@gmail.com".to_string()]);
    }

    #[tokio::test]
    async fn test_verify_mailpass_reports_rejection_in_body() {
        let mailer = Arc::new(RecordingMailer::failing("Invalid login"));
        let app = build_router(test_state(None, mailer));
        let (status, body) = post_json(
            app,
            "/verify-mailpass",
            json!({ "email": "me@gmail.com", "password": APP_PASSWORD }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Invalid login");
    }

    #[tokio::test]
    async fn test_verify_mailpass_non_string_fields() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = build_router(test_state(None, mailer.clone()));
        let (status, body) = post_json(
            app,
            "/verify-mailpass",
            json!({ "email": 7, "password": APP_PASSWORD }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);

        let app = build_router(test_state(None, mailer.clone()));
        let (status, body) = post_json(
            app,
            "/verify-mailpass",
            json!({ "email": "me@gmail.com", "password": 12345 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], false);
        assert!(mailer.verified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_mailpass_missing_fields() {
        for body in [json!({ "password": APP_PASSWORD }), json!({ "email": "me@gmail.com" })] {
            let app = build_router(test_state(None, Arc::default()));
            let (status, body) = post_json(app, "/verify-mailpass", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["ok"], false);
        }
    }

    #[tokio::test]
    async fn test_analyze_requires_job_description() {
        for body in [json!({}), json!({ "jobDescription": "   " })] {
            let app = build_router(test_state(None, Arc::default()));
            let (status, body) = post_json(app, "/analyze", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "jobDescription is required");
        }
    }

    #[tokio::test]
    async fn test_parse_resume_requires_file_field() {
        let app = build_router(test_state(None, Arc::default()));
        let boundary = "XBOUNDARY";
        let payload = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/parse-resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_resume_rejects_non_pdf() {
        let app = build_router(test_state(None, Arc::default()));
        let boundary = "XBOUNDARY";
        let payload = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.docx\"\r\nContent-Type: application/octet-stream\r\n\r\nPK not a pdf\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/parse-resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
