//! Fitness / fatigue / form trend (CTL / ATL / TSB)
//!
//! Daily loads feed two exponentially weighted averages: chronic training
//! load with a 42-day time constant and acute training load with a 7-day
//! one. Form (TSB) is yesterday's CTL minus yesterday's ATL.

use crate::load::workout_load;
use crate::models::WorkoutRecord;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CTL_TIME_CONSTANT_DAYS: f64 = 42.0;
pub const ATL_TIME_CONSTANT_DAYS: f64 = 7.0;

/// Longest trend the commands will report
pub const MAX_TREND_DAYS: u32 = 3650;

/// One day of the trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessPoint {
  pub date: NaiveDate,
  pub load: i64,
  /// Chronic Training Load (fitness)
  pub ctl: f64,
  /// Acute Training Load (fatigue)
  pub atl: f64,
  /// Training Stress Balance (form)
  pub tsb: f64,
}

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// Sum of workout loads per UTC calendar day
pub fn daily_loads(workouts: &[WorkoutRecord]) -> BTreeMap<NaiveDate, i64> {
  let mut days = BTreeMap::new();
  for workout in workouts {
    *days.entry(workout.started_at.date_naive()).or_insert(0) += workout_load(workout);
  }
  days
}

/// Trend for the `days` days ending at `today`.
///
/// The averages are seeded at zero on the earliest workout day (or the first
/// reported day, whichever is earlier), so pass enough history for CTL to
/// settle.
pub fn fitness_trend(workouts: &[WorkoutRecord], today: NaiveDate, days: u32) -> Vec<FitnessPoint> {
  if days == 0 {
    return Vec::new();
  }

  let Some(report_start) = today.checked_sub_days(Days::new(u64::from(days) - 1)) else {
    return Vec::new();
  };

  let loads = daily_loads(workouts);
  let seed_day = loads
    .keys()
    .next()
    .copied()
    .map_or(report_start, |first| first.min(report_start));

  let ctl_k = 1.0 - (-1.0 / CTL_TIME_CONSTANT_DAYS).exp();
  let atl_k = 1.0 - (-1.0 / ATL_TIME_CONSTANT_DAYS).exp();

  let mut ctl = 0.0;
  let mut atl = 0.0;
  let mut points = Vec::with_capacity(days.min(MAX_TREND_DAYS) as usize);

  let mut day = seed_day;
  while day <= today {
    let load = loads.get(&day).copied().unwrap_or(0);
    let tsb = ctl - atl;

    ctl += (load as f64 - ctl) * ctl_k;
    atl += (load as f64 - atl) * atl_k;

    if day >= report_start {
      points.push(FitnessPoint {
        date: day,
        load,
        ctl: round1(ctl),
        atl: round1(atl),
        tsb: round1(tsb),
      });
    }

    match day.succ_opt() {
      Some(next) => day = next,
      None => break,
    }
  }

  points
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
