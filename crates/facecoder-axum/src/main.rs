//! `facecoder` server binary - process entry point.
//!
//! Loads `.env`, parses flags (each one also readable from the
//! environment), initialises logging and starts the web server.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use facecoder_analytics::AnalyticsClientConfig;
use facecoder_axum::{ServerConfig, start_server};
use facecoder_core::EncodingCoordinatorConfig;

/// Face embedding registry and encoding coordinator.
#[derive(Debug, Parser)]
#[command(name = "facecoder", version, about)]
struct Args {
    /// Port for the HTTP server
    #[arg(long, env = "FACECODER_PORT", default_value_t = 9890)]
    port: u16,

    /// SQLite database file (defaults to <data root>/data/facecoder.db)
    #[arg(long, env = "FACECODER_DATABASE")]
    database: Option<PathBuf>,

    /// Host of the face analytics service
    #[arg(long, env = "FACE_ANALYTICS_SERVER", default_value = "127.0.0.1")]
    analytics_host: String,

    /// Port of the face analytics service
    #[arg(long, env = "FACE_ANALYTICS_PORT", default_value_t = 5000)]
    analytics_port: u16,

    /// Timeout of one request to the analytics service, in seconds
    #[arg(long, env = "FACECODER_ANALYTICS_TIMEOUT_SECS", default_value_t = 30)]
    analytics_timeout_secs: u64,

    /// Timeout of each per-image embedding write, in seconds (0 disables it)
    #[arg(long, env = "FACECODER_PERSIST_TIMEOUT_SECS", default_value_t = 10)]
    persist_timeout_secs: u64,

    /// Allowed CORS origin; repeat for several. All origins when absent.
    #[arg(long = "allowed-origin", env = "FACECODER_ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let analytics =
            AnalyticsClientConfig::from_host_port(&self.analytics_host, self.analytics_port)
                .with_timeout(Duration::from_secs(self.analytics_timeout_secs));
        let persist_timeout =
            (self.persist_timeout_secs > 0).then(|| Duration::from_secs(self.persist_timeout_secs));

        let mut config = ServerConfig {
            port: self.port,
            database: self.database,
            analytics,
            encoding: EncodingCoordinatorConfig::default().with_persist_timeout(persist_timeout),
            ..ServerConfig::default()
        };
        if !self.allowed_origins.is_empty() {
            config = config.with_allowed_origins(self.allowed_origins);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads env-backed flags
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    start_server(args.into_config()).await
}
