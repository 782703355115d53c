//! Async entry points for host applications
//!
//! Each command loads what it needs through `db`, runs the pure analysis and
//! returns a serializable result.

pub mod insights;
pub mod splits;

pub use insights::{get_fitness_trend, get_recovery_status, get_weekly_load_analysis};
pub use splits::{get_mile_splits, import_strava_splits};

use crate::db::DbError;
use crate::strava::StravaError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
  #[error(transparent)]
  Db(#[from] DbError),

  #[error(transparent)]
  Strava(#[from] StravaError),

  #[error("Invalid argument: {0}")]
  InvalidArgument(String),
}

impl Serialize for CommandError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
