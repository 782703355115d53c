//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown with the host schema
//! - Seeders for workouts, laps and streams
//! - Mock data factories pinned to a fixed clock
//! - Helper assertions

use crate::models::{Lap, RawStream, WorkoutRecord};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Tables as the host application creates them
const SCHEMA: &str = r#"
CREATE TABLE workouts (
  id INTEGER PRIMARY KEY,
  workout_type TEXT NOT NULL,
  started_at DATETIME NOT NULL,
  duration_minutes REAL,
  avg_pace_seconds REAL,
  distance_miles REAL,
  training_load INTEGER
);

CREATE TABLE workout_laps (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  workout_id INTEGER NOT NULL REFERENCES workouts(id),
  lap_number INTEGER NOT NULL,
  distance_miles REAL,
  duration_seconds REAL,
  avg_pace_seconds REAL,
  avg_heart_rate REAL,
  max_heart_rate REAL,
  elevation_gain_feet REAL,
  lap_type TEXT
);

CREATE TABLE workout_streams (
  workout_id INTEGER PRIMARY KEY REFERENCES workouts(id),
  distance_json TEXT NOT NULL,
  time_json TEXT NOT NULL,
  heartrate_json TEXT,
  altitude_json TEXT
);
"#;

/// Create an in-memory SQLite database with the workout schema
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::raw_sql(SCHEMA)
    .execute(&pool)
    .await
    .expect("Failed to create schema");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert workouts with their ids preserved
pub async fn seed_workouts(pool: &SqlitePool, workouts: &[WorkoutRecord]) {
  for workout in workouts {
    sqlx::query(
      r#"
      INSERT INTO workouts (
        id, workout_type, started_at, duration_minutes,
        avg_pace_seconds, distance_miles, training_load
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      "#,
    )
    .bind(workout.id)
    .bind(&workout.workout_type)
    .bind(workout.started_at)
    .bind(workout.duration_minutes)
    .bind(workout.avg_pace_seconds)
    .bind(workout.distance_miles)
    .bind(workout.training_load)
    .execute(pool)
    .await
    .expect("Failed to insert test workout");
  }
}

/// Insert device laps (lap_type NULL) numbered from 1
pub async fn seed_laps(pool: &SqlitePool, workout_id: i64, laps: &[Lap]) {
  for (i, lap) in laps.iter().enumerate() {
    let pace = (lap.distance_miles > 0.0).then(|| lap.duration_seconds / lap.distance_miles);

    sqlx::query(
      r#"
      INSERT INTO workout_laps (
        workout_id, lap_number, distance_miles, duration_seconds,
        avg_pace_seconds, avg_heart_rate, max_heart_rate, elevation_gain_feet, lap_type
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL)
      "#,
    )
    .bind(workout_id)
    .bind(i as i64 + 1)
    .bind(lap.distance_miles)
    .bind(lap.duration_seconds)
    .bind(pace)
    .bind(lap.avg_heart_rate)
    .bind(lap.max_heart_rate)
    .bind(lap.elevation_gain_feet)
    .execute(pool)
    .await
    .expect("Failed to insert test lap");
  }
}

/// Store a stream as JSON arrays; empty optional channels are stored as NULL
pub async fn seed_stream(pool: &SqlitePool, workout_id: i64, stream: &RawStream) {
  let optional = |values: &[Option<f64>]| {
    (!values.is_empty()).then(|| serde_json::to_string(values).expect("Failed to encode channel"))
  };

  sqlx::query(
    r#"
    INSERT INTO workout_streams (workout_id, distance_json, time_json, heartrate_json, altitude_json)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(workout_id)
  .bind(serde_json::to_string(&stream.distance_meters).expect("Failed to encode distance"))
  .bind(serde_json::to_string(&stream.time_seconds).expect("Failed to encode time"))
  .bind(optional(&stream.heartrate))
  .bind(optional(&stream.altitude_meters))
  .execute(pool)
  .await
  .expect("Failed to insert test stream");
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Reference clock for deterministic tests: 2026-03-01 12:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Workout that started `hours_ago` before [`fixed_now`], no stored load
pub fn mock_workout(
  id: i64,
  workout_type: &str,
  hours_ago: f64,
  duration_minutes: Option<f64>,
) -> WorkoutRecord {
  WorkoutRecord {
    id,
    workout_type: workout_type.to_string(),
    started_at: fixed_now() - Duration::seconds((hours_ago * 3600.0) as i64),
    duration_minutes,
    avg_pace_seconds: None,
    distance_miles: None,
    training_load: None,
  }
}

/// ---------------------------------------------------------------------------
/// Assertion Helpers
/// ---------------------------------------------------------------------------

/// Assert that two floating point values are approximately equal
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workouts', 'workout_laps', 'workout_streams')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_workouts_inserts_all() {
    let pool = setup_test_db().await;

    seed_workouts(
      &pool,
      &[mock_workout(10, "easy", 1.0, None), mock_workout(11, "long", 30.0, Some(90.0))],
    )
    .await;

    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM workouts ORDER BY id")
      .fetch_all(&pool)
      .await
      .expect("Failed to read ids");

    assert_eq!(ids, vec![10, 11]);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_workout_offsets_from_fixed_now() {
    let workout = mock_workout(1, "tempo", 1.5, Some(50.0));
    assert_eq!(fixed_now() - workout.started_at, Duration::minutes(90));
    assert_eq!(workout.training_load, None);
  }

  #[test]
  fn test_assert_approx_eq_macro() {
    assert_approx_eq!(1.0_f64, 1.0001, 0.001);
  }

  #[test]
  #[should_panic(expected = "Values not approximately equal")]
  fn test_assert_approx_eq_macro_fails() {
    assert_approx_eq!(1.0_f64, 1.1, 0.001);
  }
}
