/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATA_DIR | /var/lib/catalog | Working directory for the embedded store and logs |
/// | HTTP_PORT | 8080 | HTTP API port |
/// | CHANNEL_CAPACITY | 1024 | Per-topic event channel capacity |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Tracing level filter |
///
/// # Example
///
/// ```ignore
/// DATA_DIR=/data/catalog HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory, holds the embedded database and log files
    pub data_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Per-topic bounded channel capacity for the event broker
    pub channel_capacity: usize,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Log level filter
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Falls back to defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/catalog".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            channel_capacity: std::env::var("CHANNEL_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Path of the embedded database inside the working directory
    pub fn db_path(&self) -> String {
        format!("{}/catalog.db", self.data_dir)
    }

    /// Whether we are running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
