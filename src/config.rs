//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file via `dotenvy`.

use std::env;
use std::path::Path;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://dreamy.db?mode=rwc";
pub const DEFAULT_STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },

  #[error("Failed to read {path}: {reason}")]
  EnvFile { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub database_url: String,
  pub db_max_connections: u32,
  pub strava_access_token: Option<String>,
  pub strava_api_base: String,
  pub log_level: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      db_max_connections: DEFAULT_MAX_CONNECTIONS,
      strava_access_token: None,
      strava_api_base: DEFAULT_STRAVA_API_BASE.to_string(),
      log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
  }
}

impl Config {
  /// Load `.env` (if present) and read the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  /// Load a specific env file, then read the environment.
  ///
  /// Variables already set in the process win over the file.
  pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
      path: path.display().to_string(),
      reason: e.to_string(),
    })?;
    Self::from_env()
  }

  /// Read configuration from the current environment only
  pub fn from_env() -> Result<Self, ConfigError> {
    let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
      Ok(raw) => match raw.trim().parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => {
          return Err(ConfigError::Invalid {
            key: "DB_MAX_CONNECTIONS".into(),
            value: raw,
          })
        }
      },
      Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    Ok(Self {
      database_url: non_empty_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
      db_max_connections,
      strava_access_token: non_empty_var("STRAVA_ACCESS_TOKEN"),
      strava_api_base: non_empty_var("STRAVA_API_BASE")
        .map(|base| base.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_STRAVA_API_BASE.to_string()),
      log_level: non_empty_var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
    })
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
