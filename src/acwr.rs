//! Acute:chronic workload ratio
//!
//! Compares the trailing 7-day load against the 28-day weekly average.
//! The risk thresholds are the standard sports-science bands and are fixed.

use crate::load::workout_load;
use crate::models::{RiskLevel, WeeklyLoadAnalysis, WorkoutRecord};
use chrono::{DateTime, Duration, Utc};

pub const ACWR_WINDOW_DAYS: i64 = 28;

/// Start of the window the analyzer reads
pub fn acwr_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
  now - Duration::days(ACWR_WINDOW_DAYS)
}

/// Risk band for a ratio
pub fn classify_acwr(ratio: f64) -> RiskLevel {
  if ratio < 0.8 {
    RiskLevel::Low
  } else if ratio <= 1.3 {
    RiskLevel::Optimal
  } else if ratio <= 1.5 {
    RiskLevel::High
  } else {
    RiskLevel::VeryHigh
  }
}

/// Analyze the trailing four weeks at `now`.
///
/// Rows older than the 28-day window are ignored; future-dated rows count as
/// current. With no chronic load the ratio
/// is reported as 1.
pub fn analyze_weekly_load(workouts: &[WorkoutRecord], now: DateTime<Utc>) -> WeeklyLoadAnalysis {
  let mut current = 0_i64;
  let mut previous = 0_i64;
  let mut total = 0_i64;

  for workout in workouts {
    // Future-dated rows (clock skew) count as just finished, as in recovery
    let age_days = ((now - workout.started_at).num_seconds() as f64 / 86_400.0).max(0.0);
    if age_days >= ACWR_WINDOW_DAYS as f64 {
      continue;
    }

    let load = workout_load(workout);
    total += load;
    if age_days < 7.0 {
      current += load;
    } else if age_days < 14.0 {
      previous += load;
    }
  }

  let four_week_avg_load = total as f64 / 4.0;
  let acute_to_chronic_ratio = if four_week_avg_load > 0.0 {
    (current as f64 / four_week_avg_load * 100.0).round() / 100.0
  } else {
    1.0
  };

  let risk_level = classify_acwr(acute_to_chronic_ratio);

  WeeklyLoadAnalysis {
    current_7_day_load: current,
    previous_7_day_load: previous,
    four_week_avg_load,
    acute_to_chronic_ratio,
    risk_level,
    recommendation: risk_level.recommendation().to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
