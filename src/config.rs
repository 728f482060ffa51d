//! Configuration via CLI arguments and environment variables
//!
//! Parsed once at startup and passed by reference to the components that
//! need it. A `.env` file in the working directory is honored.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// habit-tracker-api - REST API for habit tracking with AI suggestions
#[derive(Parser, Debug, Clone)]
#[command(name = "habit-tracker-api")]
#[command(about = "REST API server for habit tracking with AI-generated suggestions")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "DATABASE_PATH")]
    pub database: Option<PathBuf>,

    /// API key for the text-generation provider
    /// When absent, the AI endpoints are disabled with a clear
    /// "unavailable" response rather than a crash
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Provider model name
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    /// Timeout for each provider call, in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "30")]
    pub provider_timeout_secs: u64,

    /// Comma-separated list of allowed CORS origins; empty means permissive
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub cors_allowed_origins: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
