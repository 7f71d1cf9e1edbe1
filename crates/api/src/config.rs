use std::path::PathBuf;

use dermalens_core::assessment::ConfidenceLevels;
use dermalens_core::stats::StatsWindow;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// the credentials, which are required up front -- a deployment with missing
/// secrets must fail at startup, not on the first request.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret).
    pub jwt: JwtConfig,
    /// Statistics presentation settings.
    pub stats: StatsConfig,
    /// Directory for upload scratch files (default: the system temp dir).
    pub scratch_dir: PathBuf,
}

/// Settings for the dashboard statistics and result projection.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Which twelve months the scan histogram covers.
    pub window: StatsWindow,
    /// Numeric values for qualitative confidence levels in model output.
    pub confidence_levels: ConfidenceLevels,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `UPLOAD_SCRATCH_DIR`   | system temp dir         |
    /// | `STATS_WINDOW`         | `calendar-year`         |
    /// | `CONFIDENCE_HIGH`      | `0.9`                   |
    /// | `CONFIDENCE_MEDIUM`    | `0.6`                   |
    /// | `CONFIDENCE_LOW`       | `0.3`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let scratch_dir = std::env::var("UPLOAD_SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            stats: StatsConfig::from_env(),
            scratch_dir,
        }
    }
}

impl StatsConfig {
    /// Load statistics settings from environment variables.
    ///
    /// # Panics
    ///
    /// Panics on an unrecognized `STATS_WINDOW` value or a non-numeric
    /// confidence override.
    pub fn from_env() -> Self {
        let window = match std::env::var("STATS_WINDOW") {
            Ok(value) => StatsWindow::parse(&value)
                .unwrap_or_else(|| panic!("STATS_WINDOW must be 'calendar-year' or 'trailing', got '{value}'")),
            Err(_) => StatsWindow::default(),
        };

        let defaults = ConfidenceLevels::default();
        let confidence_levels = ConfidenceLevels {
            high: env_f64("CONFIDENCE_HIGH", defaults.high),
            medium: env_f64("CONFIDENCE_MEDIUM", defaults.medium),
            low: env_f64("CONFIDENCE_LOW", defaults.low),
        };

        Self {
            window,
            confidence_levels,
        }
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid f64, got '{value}'")),
        Err(_) => default,
    }
}
