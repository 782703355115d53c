use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logged workout as the host application stores it.
///
/// `training_load` is the device-measured (or previously computed) load. A stored
/// `Some(0)` is a real value and must not be replaced by an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutRecord {
  pub id: i64,
  pub workout_type: String,
  pub started_at: DateTime<Utc>,
  pub duration_minutes: Option<f64>,
  pub avg_pace_seconds: Option<f64>,
  pub distance_miles: Option<f64>,
  pub training_load: Option<i64>,
}
