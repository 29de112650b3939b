use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{Result, ServerError};

/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment (a `.env` file is
/// loaded first by `main`):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | daytrip.db | SQLite file |
/// | HTTP_PORT | 8080 | HTTP listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | default tracing filter |
/// | LOG_DIR | (unset) | daily rolling log files when set |
/// | LOG_JSON | false | JSON log lines |
/// | MAX_PAX_PER_DATE | 3 | daily confirmed pax cap |
/// | GRATUITY_RATE_PER_PAX | 5.0 | gratuity per active guest |
/// | ENFORCE_STATUS_TRANSITIONS | false | reject illegal status changes |
/// | IMAGE_STORAGE_BASE_PATH | ./storage | blob storage root |
/// | IMAGE_STORAGE_BASE_URL | http://localhost:8081 | public URL of the storage root |
/// | MAX_UPLOAD_BYTES | 104857600 | multipart body limit |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
///
/// # Example
///
/// ```ignore
/// MAX_PAX_PER_DATE=40 HTTP_PORT=9000 cargo run -p daytrip-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Default log filter directive
    pub log_level: String,
    /// Directory for rolling log files
    pub log_dir: Option<String>,
    /// Emit JSON log lines
    pub log_json: bool,

    // === Booking rules ===
    /// Maximum confirmed pax per calendar date
    pub max_pax_per_date: i64,
    /// Gratuity charged per active guest
    pub gratuity_rate_per_pax: f64,
    /// Reject status changes outside the lifecycle graph
    pub enforce_status_transitions: bool,

    // === Uploads ===
    /// Local root for stored receipts and images
    pub image_storage_base_path: PathBuf,
    /// Public base URL that maps onto `image_storage_base_path`
    pub image_storage_base_url: String,
    /// Request body limit for multipart uploads
    pub max_upload_bytes: usize,

    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "daytrip.db".into()),
            http_port: env_or("HTTP_PORT", 8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            log_json: env_or("LOG_JSON", false),

            max_pax_per_date: env_or("MAX_PAX_PER_DATE", 3),
            gratuity_rate_per_pax: env_or("GRATUITY_RATE_PER_PAX", 5.0),
            enforce_status_transitions: env_or("ENFORCE_STATUS_TRANSITIONS", false),

            image_storage_base_path: std::env::var("IMAGE_STORAGE_BASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./storage")),
            image_storage_base_url: std::env::var("IMAGE_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8081".into()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 100 * 1024 * 1024),

            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
        }
    }

    /// Configuration for tests: in-memory database, default rules
    pub fn for_tests(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_path: ":memory:".into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "warn".into(),
            log_dir: None,
            log_json: false,
            max_pax_per_date: 3,
            gratuity_rate_per_pax: 5.0,
            enforce_status_transitions: false,
            image_storage_base_path: storage_dir.into(),
            image_storage_base_url: "http://localhost:8081".into(),
            max_upload_bytes: 100 * 1024 * 1024,
            request_timeout_ms: 30_000,
        }
    }

    /// Reject booking rules and limits the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_pax_per_date < 0 {
            return Err(ServerError::Config(format!(
                "MAX_PAX_PER_DATE must not be negative, got {}",
                self.max_pax_per_date
            )));
        }
        if !self.gratuity_rate_per_pax.is_finite() || self.gratuity_rate_per_pax < 0.0 {
            return Err(ServerError::Config(format!(
                "GRATUITY_RATE_PER_PAX must be a non-negative number, got {}",
                self.gratuity_rate_per_pax
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ServerError::Config("MAX_UPLOAD_BYTES must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is a development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
