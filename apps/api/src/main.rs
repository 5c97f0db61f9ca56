mod config;
mod credentials;
mod db;
mod drafting;
mod errors;
mod extract;
mod llm_client;
mod mail;
mod models;
mod profile;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::EnvelopeCodec;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::mail::SmtpMailer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ApplyMate API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())?;
    info!("LLM client initialized (primary model: {})", llm.primary_model());

    // Credential codec. A bad key disables the credential endpoints rather than the service.
    let codec = match config.credential_key() {
        Ok(key) => {
            info!("Mail credential codec initialized");
            Some(Arc::new(EnvelopeCodec::new(key)))
        }
        Err(e) => {
            error!("Mail credential codec disabled: {e}");
            None
        }
    };

    // Initialize mail transport
    let mailer = Arc::new(SmtpMailer::new(config.smtp_host.clone()));
    info!("Mail transport initialized (relay: {})", config.smtp_host);

    // Build app state
    let state = AppState {
        db,
        llm,
        codec,
        mailer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the web app origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
