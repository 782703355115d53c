//! Training load estimation
//!
//! When a workout carries no device-measured load, its load is estimated as
//! `duration_minutes × intensity²`. Squaring makes hard efforts cost
//! disproportionately more than their duration alone.

use crate::models::WorkoutRecord;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Workout Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
  Recovery,
  Easy,
  Long,
  Steady,
  Tempo,
  Threshold,
  Interval,
  Race,
}

impl WorkoutType {
  pub const ALL: [WorkoutType; 8] = [
    WorkoutType::Recovery,
    WorkoutType::Easy,
    WorkoutType::Long,
    WorkoutType::Steady,
    WorkoutType::Tempo,
    WorkoutType::Threshold,
    WorkoutType::Interval,
    WorkoutType::Race,
  ];

  /// Parse a stored label, case-insensitively. `None` for unknown labels.
  pub fn parse(label: &str) -> Option<Self> {
    match label.trim().to_lowercase().as_str() {
      "recovery" => Some(WorkoutType::Recovery),
      "easy" => Some(WorkoutType::Easy),
      "long" => Some(WorkoutType::Long),
      "steady" => Some(WorkoutType::Steady),
      "tempo" => Some(WorkoutType::Tempo),
      "threshold" => Some(WorkoutType::Threshold),
      "interval" => Some(WorkoutType::Interval),
      "race" => Some(WorkoutType::Race),
      _ => None,
    }
  }

  /// Parse a label, counting anything unrecognized as an easy run
  pub fn parse_or_easy(label: &str) -> Self {
    Self::parse(label).unwrap_or(WorkoutType::Easy)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutType::Recovery => "recovery",
      WorkoutType::Easy => "easy",
      WorkoutType::Long => "long",
      WorkoutType::Steady => "steady",
      WorkoutType::Tempo => "tempo",
      WorkoutType::Threshold => "threshold",
      WorkoutType::Interval => "interval",
      WorkoutType::Race => "race",
    }
  }

  /// Relative effort, 1.0 = race effort
  pub fn intensity_factor(&self) -> f64 {
    match self {
      WorkoutType::Recovery => 0.5,
      WorkoutType::Easy => 0.65,
      WorkoutType::Long => 0.7,
      WorkoutType::Steady => 0.75,
      WorkoutType::Tempo => 0.85,
      WorkoutType::Threshold => 0.9,
      WorkoutType::Interval => 0.95,
      WorkoutType::Race => 1.0,
    }
  }

  /// Hours needed to absorb a workout of this type
  pub fn base_recovery_hours(&self) -> f64 {
    match self {
      WorkoutType::Recovery => 12.0,
      WorkoutType::Easy => 18.0,
      WorkoutType::Long => 36.0,
      WorkoutType::Steady => 24.0,
      WorkoutType::Tempo => 30.0,
      WorkoutType::Threshold => 36.0,
      WorkoutType::Interval => 36.0,
      WorkoutType::Race => 72.0,
    }
  }
}

/// Recovery hours for types outside the table
pub const DEFAULT_RECOVERY_HOURS: f64 = 24.0;

/// Recovery hours for a stored label, with the table's fallback for unknown labels
pub fn recovery_hours_for(label: &str) -> f64 {
  WorkoutType::parse(label).map_or(DEFAULT_RECOVERY_HOURS, |t| t.base_recovery_hours())
}

/// ---------------------------------------------------------------------------
/// Load Estimation
/// ---------------------------------------------------------------------------

/// Estimate load from duration and workout type.
///
/// A missing, zero or unusable duration contributes nothing rather than
/// failing. Pace is accepted for signature parity with stored rows but the
/// intensity comes from the workout type.
pub fn estimate_load(
  duration_minutes: Option<f64>,
  _avg_pace_seconds: Option<f64>,
  workout_type: &str,
) -> i64 {
  let duration = match duration_minutes {
    Some(d) if d.is_finite() && d > 0.0 => d,
    _ => return 0,
  };

  let intensity = WorkoutType::parse_or_easy(workout_type).intensity_factor();
  (duration * intensity.powi(2)).round() as i64
}

/// Stored load when present (including zero), otherwise the estimate
pub fn workout_load(workout: &WorkoutRecord) -> i64 {
  workout.training_load.unwrap_or_else(|| {
    estimate_load(
      workout.duration_minutes,
      workout.avg_pace_seconds,
      &workout.workout_type,
    )
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
