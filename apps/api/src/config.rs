use anyhow::{Context, Result};

use crate::credentials::{CodecError, CredentialKey, KeyEncoding};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_model: Option<String>,
    /// Raw mail-password key. Decoded once via `credential_key`.
    pub mail_pass_key: Option<String>,
    pub mail_pass_key_encoding: String,
    pub smtp_host: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL"),
            mail_pass_key: optional_env("MAIL_PASS_ENC_KEY")
                .or_else(|| optional_env("MAIL_PASSWORD_KEY")),
            mail_pass_key_encoding: optional_env("MAIL_PASS_KEY_ENCODING")
                .unwrap_or_else(|| "hex".to_string()),
            smtp_host: optional_env("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Decodes the configured mail-password key using the declared encoding.
    pub fn credential_key(&self) -> Result<CredentialKey, CodecError> {
        let raw = self
            .mail_pass_key
            .as_deref()
            .ok_or_else(|| CodecError::configuration("Encryption key is not set (MAIL_PASS_ENC_KEY)"))?;
        let encoding: KeyEncoding = self.mail_pass_key_encoding.parse()?;
        CredentialKey::decode(raw, encoding)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("gemini_api_key", &"[REDACTED]")
            .field("gemini_model", &self.gemini_model)
            .field("mail_pass_key", &self.mail_pass_key.as_ref().map(|_| "[REDACTED]"))
            .field("mail_pass_key_encoding", &self.mail_pass_key_encoding)
            .field("smtp_host", &self.smtp_host)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
