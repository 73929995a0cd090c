//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use facecoder_analytics::{AnalyticsClientConfig, DefaultAnalyticsClient};
use facecoder_core::paths::database_path;
use facecoder_core::{AppCore, EncodingCoordinatorConfig, EncodingServicePort, Repos};
use facecoder_db::{CoreFactory, setup_database};
use tracing::info;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Database file. Resolved under the data root when `None`.
    pub database: Option<PathBuf>,
    /// Analytics service client settings.
    pub analytics: AnalyticsClientConfig,
    /// Encoding coordinator settings.
    pub encoding: EncodingCoordinatorConfig,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9890,
            database: None,
            analytics: AnalyticsClientConfig::default(),
            encoding: EncodingCoordinatorConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// Use an explicit database file.
    #[must_use]
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The core application facade.
    pub core: Arc<AppCore>,
}

impl AxumContext {
    /// Assemble a context from already-built repositories and encoder.
    pub fn new(
        repos: Repos,
        encoder: Arc<dyn EncodingServicePort>,
        encoding: EncodingCoordinatorConfig,
    ) -> Self {
        Self {
            core: Arc::new(AppCore::new(repos, encoder, encoding)),
        }
    }
}

/// Bootstrap the server: open the database and build the analytics client.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let db_path = match &config.database {
        Some(path) => path.clone(),
        None => database_path()?,
    };

    info!(
        target: "facecoder.paths",
        database_path = %db_path.display(),
        analytics_url = %config.analytics.base_url(),
        "Axum bootstrap resolved paths"
    );

    let pool = setup_database(&db_path).await?;
    let encoder: Arc<dyn EncodingServicePort> =
        Arc::new(DefaultAnalyticsClient::new(&config.analytics)?);

    Ok(AxumContext::new(
        CoreFactory::build_repos(pool),
        encoder,
        config.encoding,
    ))
}

/// Start the web server on the configured port.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(&config).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("facecoder listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
