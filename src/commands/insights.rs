use crate::acwr::{acwr_window_start, analyze_weekly_load};
use crate::commands::CommandError;
use crate::db::{fetch_workouts_since, AppState};
use crate::fitness::{fitness_trend, FitnessPoint, CTL_TIME_CONSTANT_DAYS, MAX_TREND_DAYS};
use crate::models::{FatigueSnapshot, WeeklyLoadAnalysis};
use crate::recovery::{compute_recovery_status, recovery_window_start};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// ---------------------------------------------------------------------------
/// Recovery and Load Commands
/// ---------------------------------------------------------------------------

/// Fatigue snapshot from the trailing three days
pub async fn get_recovery_status(
  state: &AppState,
  now: DateTime<Utc>,
) -> Result<FatigueSnapshot, CommandError> {
  let workouts = fetch_workouts_since(&state.db, recovery_window_start(now)).await?;
  let snapshot = compute_recovery_status(&workouts, now);

  info!(
    fatigue = snapshot.fatigue_factor,
    form = snapshot.form_status.as_str(),
    "computed recovery status"
  );
  Ok(snapshot)
}

/// ACWR analysis from the trailing four weeks
pub async fn get_weekly_load_analysis(
  state: &AppState,
  now: DateTime<Utc>,
) -> Result<WeeklyLoadAnalysis, CommandError> {
  let workouts = fetch_workouts_since(&state.db, acwr_window_start(now)).await?;
  let analysis = analyze_weekly_load(&workouts, now);

  info!(
    ratio = analysis.acute_to_chronic_ratio,
    risk = analysis.risk_level.as_str(),
    "computed weekly load"
  );
  Ok(analysis)
}

/// CTL/ATL/TSB for the last `days` days, with one CTL time constant of warm-up history.
///
/// `days` above [`MAX_TREND_DAYS`] is rejected.
pub async fn get_fitness_trend(
  state: &AppState,
  now: DateTime<Utc>,
  days: u32,
) -> Result<Vec<FitnessPoint>, CommandError> {
  if days > MAX_TREND_DAYS {
    return Err(CommandError::InvalidArgument(format!(
      "days must be at most {}, got {}",
      MAX_TREND_DAYS, days
    )));
  }

  let history_days = i64::from(days) + CTL_TIME_CONSTANT_DAYS as i64;
  let workouts = fetch_workouts_since(&state.db, now - Duration::days(history_days)).await?;

  Ok(fitness_trend(&workouts, now.date_naive(), days))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
