pub mod acwr;
pub mod commands;
pub mod config;
pub mod db;
pub mod fitness;
pub mod load;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod recovery;
pub mod splits;
pub mod strava;
pub mod vdot;

#[cfg(test)]
pub mod test_utils;

pub use acwr::analyze_weekly_load;
pub use config::Config;
pub use db::{AppState, DbError};
pub use load::estimate_load;
pub use recovery::compute_recovery_status;
pub use splits::{
  build_interpolated_mile_splits_from_laps, build_interpolated_mile_splits_from_stream,
  build_mile_splits,
};

use tracing::info;

/// Install logging at the configured level and open the database
pub async fn initialize(config: &Config) -> Result<AppState, DbError> {
  logging::init_logging(&config.log_level);

  let pool = db::connect(config).await?;
  info!("Database ready");

  Ok(AppState { db: pool })
}
