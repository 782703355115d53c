//! Fatigue and recovery model
//!
//! Recent loads decay with a 24-hour half-life and sum into a 0-100 fatigue
//! factor. Readiness combines that factor with the recovery time still owed
//! to the most recent workout. Nothing is persisted; the snapshot is rebuilt
//! from the trailing three days on every call.

use crate::load::{recovery_hours_for, workout_load};
use crate::models::{FatigueSnapshot, FormStatus, WorkoutRecord};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

pub const RECOVERY_WINDOW_HOURS: i64 = 72;
const FATIGUE_HALF_LIFE_HOURS: f64 = 24.0;
const MAX_FATIGUE: i64 = 100;

/// Fatigue factor reported when nothing was logged in the window
const RESTED_FATIGUE: i64 = 10;

/// Start of the window the model reads
pub fn recovery_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
  now - Duration::hours(RECOVERY_WINDOW_HOURS)
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
  let hours = (later - earlier).num_seconds() as f64 / 3600.0;
  hours.max(0.0)
}

/// ---------------------------------------------------------------------------
/// Snapshot Computation
/// ---------------------------------------------------------------------------

/// Snapshot for an athlete with nothing logged in the last three days
pub fn fully_rested() -> FatigueSnapshot {
  FatigueSnapshot {
    fatigue_factor: RESTED_FATIGUE,
    form_status: FormStatus::Fresh,
    recovery_hours: 0,
    ready_for_hard_workout: true,
    ready_for_easy_run: true,
    suggestion: "Fully rested. You're ready for any workout.".to_string(),
    hours_since_last_workout: None,
  }
}

/// Compute the recovery snapshot at `now`.
///
/// Workouts older than the three-day window are ignored, so callers may pass
/// a wider slice of history.
pub fn compute_recovery_status(workouts: &[WorkoutRecord], now: DateTime<Utc>) -> FatigueSnapshot {
  let window_start = recovery_window_start(now);
  let recent: Vec<&WorkoutRecord> = workouts
    .iter()
    .filter(|w| w.started_at >= window_start)
    .collect();

  let Some(latest) = recent.iter().max_by_key(|w| w.started_at) else {
    return fully_rested();
  };

  let total_fatigue: f64 = recent
    .iter()
    .map(|w| {
      let hours_since = hours_between(w.started_at, now);
      let decay = 0.5_f64.powf(hours_since / FATIGUE_HALF_LIFE_HOURS);
      workout_load(w) as f64 * decay
    })
    .sum();

  let fatigue_factor = ((total_fatigue / 2.0).round() as i64).clamp(0, MAX_FATIGUE);
  let form_status = FormStatus::from_fatigue(fatigue_factor);

  let hours_since_last = hours_between(latest.started_at, now);
  let recovery_needed = recovery_hours_for(&latest.workout_type);
  let recovery_remaining = (recovery_needed - hours_since_last).max(0.0);

  let readiness = Readiness::decide(recovery_remaining, fatigue_factor, hours_since_last);

  debug!(
    workouts = recent.len(),
    fatigue_factor,
    recovery_remaining,
    "computed recovery status"
  );

  FatigueSnapshot {
    fatigue_factor,
    form_status,
    recovery_hours: recovery_remaining.round() as i64,
    ready_for_hard_workout: readiness.hard,
    ready_for_easy_run: readiness.easy,
    suggestion: readiness.suggestion.to_string(),
    hours_since_last_workout: Some((hours_since_last * 10.0).round() / 10.0),
  }
}

/// ---------------------------------------------------------------------------
/// Readiness Decision Table
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Readiness {
  hard: bool,
  easy: bool,
  suggestion: &'static str,
}

impl Readiness {
  fn decide(recovery_remaining: f64, fatigue_factor: i64, hours_since_last: f64) -> Self {
    if recovery_remaining <= 0.0 && fatigue_factor < 50 {
      Self {
        hard: true,
        easy: true,
        suggestion: "Recovered and fresh. A good day for a quality session.",
      }
    } else if recovery_remaining <= 6.0 && fatigue_factor < 65 {
      Self {
        hard: false,
        easy: true,
        suggestion: "Almost recovered. Keep today to an easy run.",
      }
    } else if fatigue_factor < 80 {
      if hours_since_last > 12.0 {
        Self {
          hard: false,
          easy: true,
          suggestion: "Still carrying fatigue. Light activity only, like a short shakeout or a walk.",
        }
      } else {
        Self {
          hard: false,
          easy: false,
          suggestion: "You trained recently. Give it a few more hours before any light activity.",
        }
      }
    } else {
      Self {
        hard: false,
        easy: false,
        suggestion: "Fatigue is high. Take a rest day.",
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{fixed_now, mock_workout};

  #[test]
  fn test_no_recent_workouts_is_fully_rested() {
    let now = fixed_now();
    let snapshot = compute_recovery_status(&[], now);

    assert_eq!(snapshot.fatigue_factor, 10);
    assert_eq!(snapshot.form_status, FormStatus::Fresh);
    assert!(snapshot.ready_for_hard_workout);
    assert!(snapshot.ready_for_easy_run);
    assert_eq!(snapshot.recovery_hours, 0);

    // Anything older than 72h is outside the window
    let old = vec![mock_workout(1, "race", 80.0, Some(180.0))];
    assert_eq!(compute_recovery_status(&old, now), fully_rested());
  }

  #[test]
  fn test_fatigue_halves_every_24_hours() {
    let now = fixed_now();
    // Stored load of 100 right now → fatigue 50; 24h later → 25
    let mut fresh = mock_workout(1, "easy", 0.0, Some(60.0));
    fresh.training_load = Some(100);
    assert_eq!(compute_recovery_status(&[fresh.clone()], now).fatigue_factor, 50);

    let mut day_old = fresh;
    day_old.started_at = now - Duration::hours(24);
    assert_eq!(compute_recovery_status(&[day_old], now).fatigue_factor, 25);
  }

  #[test]
  fn test_fatigue_is_capped() {
    let now = fixed_now();
    let workouts: Vec<WorkoutRecord> = (0..3)
      .map(|i| {
        let mut w = mock_workout(i, "race", i as f64 * 2.0, Some(180.0));
        w.training_load = Some(300);
        w
      })
      .collect();
    let snapshot = compute_recovery_status(&workouts, now);

    assert_eq!(snapshot.fatigue_factor, 100);
    assert_eq!(snapshot.form_status, FormStatus::VeryTired);
    assert!(!snapshot.ready_for_easy_run);
    assert!(!snapshot.ready_for_hard_workout);
  }

  #[test]
  fn test_recovered_after_easy_run() {
    let now = fixed_now();
    // 45 min easy 20h ago: load 19, decayed ≈ 10.7 → fatigue 5
    let workouts = vec![mock_workout(1, "easy", 20.0, Some(45.0))];
    let snapshot = compute_recovery_status(&workouts, now);

    assert_eq!(snapshot.fatigue_factor, 5);
    assert_eq!(snapshot.form_status, FormStatus::Peaked);
    assert_eq!(snapshot.recovery_hours, 0);
    assert!(snapshot.ready_for_hard_workout);
    assert_eq!(snapshot.hours_since_last_workout, Some(20.0));
  }

  #[test]
  fn test_recovery_remaining_uses_latest_workout_type() {
    let now = fixed_now();
    // Race 30h ago, easy shakeout 4h ago: recovery keys off the shakeout
    let workouts = vec![
      mock_workout(1, "race", 30.0, Some(40.0)),
      mock_workout(2, "easy", 4.0, Some(20.0)),
    ];
    let snapshot = compute_recovery_status(&workouts, now);

    assert_eq!(snapshot.recovery_hours, 14);
    assert!(!snapshot.ready_for_hard_workout);
  }

  #[test]
  fn test_easy_only_when_nearly_recovered() {
    let now = fixed_now();
    // Tempo 26h ago: 4h of recovery still owed
    let workouts = vec![mock_workout(1, "tempo", 26.0, Some(50.0))];
    let snapshot = compute_recovery_status(&workouts, now);

    assert_eq!(snapshot.recovery_hours, 4);
    assert!(!snapshot.ready_for_hard_workout);
    assert!(snapshot.ready_for_easy_run);
  }

  #[test]
  fn test_light_activity_gated_on_hours_since_last() {
    assert!(Readiness::decide(20.0, 70, 14.0).easy);
    assert!(!Readiness::decide(20.0, 70, 8.0).easy);
    assert!(!Readiness::decide(20.0, 70, 14.0).hard);
    assert!(!Readiness::decide(0.0, 85, 48.0).easy);
    assert!(Readiness::decide(0.0, 49, 48.0).hard);
    assert!(!Readiness::decide(0.0, 50, 48.0).hard);
    assert!(Readiness::decide(6.0, 64, 1.0).easy);
  }

  #[test]
  fn test_unknown_type_uses_default_recovery() {
    let now = fixed_now();
    let workouts = vec![mock_workout(1, "cross_training", 10.0, Some(30.0))];
    let snapshot = compute_recovery_status(&workouts, now);

    assert_eq!(snapshot.recovery_hours, 14);
  }

  #[test]
  fn test_future_dated_workout_does_not_amplify() {
    let now = fixed_now();
    let mut future = mock_workout(1, "easy", 0.0, Some(60.0));
    future.started_at = now + Duration::hours(5);
    future.training_load = Some(100);
    let snapshot = compute_recovery_status(&[future], now);

    assert_eq!(snapshot.fatigue_factor, 50);
  }

  #[test]
  fn test_fatigue_always_in_bounds() {
    let now = fixed_now();
    for load in [0, 1, 50, 199, 201, 1000, 10_000] {
      let mut w = mock_workout(1, "steady", 1.0, Some(60.0));
      w.training_load = Some(load);
      let snapshot = compute_recovery_status(&[w], now);
      assert!((0..=100).contains(&snapshot.fatigue_factor));
    }
  }
}
