//! Branchcast Server
//!
//! HTTP front end for the generation pipeline: accepts article URLs,
//! serves the archive and per-branch feeds, and records branch views.

#![warn(missing_docs)]

pub mod config;
pub mod conversions;
pub mod handlers;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use branchcast_fetcher::HttpArticleFetcher;
use branchcast_generator::BatchOrchestrator;
use branchcast_llm::{GeminiProvider, LlmError};
use branchcast_store::SqliteArchive;
use config::{ConfigError, GeminiSettings, ServerConfig};
use handlers::{create_router, AppState};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Archive could not be opened
    #[error("Failed to open archive: {0}")]
    Store(#[from] branchcast_store::StoreError),

    /// LLM provider could not be built
    #[error("Failed to create LLM provider: {0}")]
    Llm(#[from] LlmError),

    /// Article fetcher could not be built
    #[error("Failed to create article fetcher: {0}")]
    Fetch(#[from] branchcast_fetcher::FetchError),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the CORS layer from the configured origin allow-list
///
/// A `*` entry allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let allow_origin = if origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        let origins = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .map_err(|_| ConfigError::Invalid(format!("Invalid CORS origin: {}", o)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Build the Gemini provider from the `[gemini]` table
pub fn gemini_provider(settings: &GeminiSettings) -> Result<GeminiProvider, LlmError> {
    let mut llm = GeminiProvider::with_timeout(
        settings.api_key.clone(),
        settings.model.clone(),
        settings.timeout(),
    )?;
    if let Some(endpoint) = &settings.endpoint {
        llm = llm.with_endpoint(endpoint.clone());
    }
    if let Some(temperature) = settings.temperature {
        llm = llm.with_temperature(temperature);
    }
    if let Some(safety) = &settings.safety_settings {
        llm = llm.with_safety_settings(safety.clone());
    }
    Ok(llm)
}

/// Routes plus CORS
pub fn build_app(state: AppState, config: &ServerConfig) -> Result<Router, ConfigError> {
    Ok(create_router(state).layer(cors_layer(&config.allowed_origins)?))
}

/// Start the HTTP server
///
/// Validates configuration, opens the archive, wires the Gemini provider
/// and article fetcher into the batch orchestrator, and starts the axum
/// server.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    config.validate()?;

    info!("Starting Branchcast server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!("Model: {}", config.gemini.model);

    let registry = config.registry()?;
    info!("Branches: {}", registry.len());

    let store = Arc::new(Mutex::new(SqliteArchive::new(&config.database_path)?));

    let llm = gemini_provider(&config.gemini)?;

    let fetcher = HttpArticleFetcher::new(config.fetcher.clone())?;

    let pipeline = BatchOrchestrator::new(
        fetcher,
        llm,
        Arc::clone(&store),
        registry,
        config.generator.clone(),
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        store,
    };

    let app = build_app(state, &config)?;

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
