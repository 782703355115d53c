//! SQLite access for workout rows
//!
//! The schema belongs to the host application. This module only reads the
//! `workouts`, `workout_laps` and `workout_streams` tables and rewrites the
//! interpolated split rows it produces.

use crate::config::Config;
use crate::models::{Lap, MileSplit, RawStream, WorkoutRecord};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Failed to decode stored stream: {0}")]
  Decode(#[from] serde_json::Error),
}

/// ---------------------------------------------------------------------------
/// Connection
/// ---------------------------------------------------------------------------

/// Open the connection pool described by `config`
pub async fn connect(config: &Config) -> Result<DbPool, DbError> {
  info!(url = %config.database_url, "connecting to database");

  let pool = SqlitePoolOptions::new()
    .max_connections(config.db_max_connections)
    .connect(&config.database_url)
    .await?;

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

/// Workouts started at or after `since`, newest first
pub async fn fetch_workouts_since(
  pool: &DbPool,
  since: DateTime<Utc>,
) -> Result<Vec<WorkoutRecord>, DbError> {
  let workouts = sqlx::query_as::<_, WorkoutRecord>(
    r#"
    SELECT id, workout_type, started_at, duration_minutes,
           avg_pace_seconds, distance_miles, training_load
    FROM workouts
    WHERE started_at >= ?1
    ORDER BY started_at DESC
    "#,
  )
  .bind(since)
  .fetch_all(pool)
  .await?;

  debug!(count = workouts.len(), since = %since, "fetched workouts");
  Ok(workouts)
}

/// ---------------------------------------------------------------------------
/// Laps and Streams
/// ---------------------------------------------------------------------------

/// Device laps for a workout in run order. Interpolated rows are excluded.
pub async fn fetch_laps(pool: &DbPool, workout_id: i64) -> Result<Vec<Lap>, DbError> {
  let rows: Vec<(Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>)> =
    sqlx::query_as(
      r#"
      SELECT CAST(distance_miles AS REAL), CAST(duration_seconds AS REAL),
             CAST(avg_heart_rate AS REAL), CAST(max_heart_rate AS REAL),
             CAST(elevation_gain_feet AS REAL)
      FROM workout_laps
      WHERE workout_id = ?1
        AND (lap_type IS NULL OR lap_type NOT LIKE 'interpolated%')
      ORDER BY lap_number
      "#,
    )
    .bind(workout_id)
    .fetch_all(pool)
    .await?;

  let laps = rows
    .into_iter()
    .filter_map(|(distance, duration, avg_hr, max_hr, elevation)| {
      Some(Lap {
        distance_miles: distance?,
        duration_seconds: duration?,
        avg_heart_rate: avg_hr,
        max_heart_rate: max_hr,
        elevation_gain_feet: elevation,
      })
    })
    .collect();

  Ok(laps)
}

/// Stored GPS stream for a workout. Arrays are JSON in metric units.
pub async fn fetch_stream(pool: &DbPool, workout_id: i64) -> Result<Option<RawStream>, DbError> {
  let row: Option<(String, String, Option<String>, Option<String>)> = sqlx::query_as(
    r#"
    SELECT distance_json, time_json, heartrate_json, altitude_json
    FROM workout_streams
    WHERE workout_id = ?1
    "#,
  )
  .bind(workout_id)
  .fetch_optional(pool)
  .await?;

  let Some((distance, time, heartrate, altitude)) = row else {
    return Ok(None);
  };

  Ok(Some(RawStream {
    distance_meters: serde_json::from_str(&distance)?,
    time_seconds: serde_json::from_str(&time)?,
    heartrate: match heartrate {
      Some(json) => serde_json::from_str(&json)?,
      None => Vec::new(),
    },
    altitude_meters: match altitude {
      Some(json) => serde_json::from_str(&json)?,
      None => Vec::new(),
    },
  }))
}

/// ---------------------------------------------------------------------------
/// Interpolated Splits
/// ---------------------------------------------------------------------------

/// Replace any previously interpolated splits for a workout
pub async fn replace_interpolated_splits(
  pool: &DbPool,
  workout_id: i64,
  splits: &[MileSplit],
) -> Result<(), DbError> {
  let mut tx = pool.begin().await?;

  sqlx::query(
    "DELETE FROM workout_laps WHERE workout_id = ?1 AND lap_type LIKE 'interpolated%'",
  )
  .bind(workout_id)
  .execute(&mut *tx)
  .await?;

  for split in splits {
    sqlx::query(
      r#"
      INSERT INTO workout_laps (
        workout_id, lap_number, distance_miles, duration_seconds,
        avg_pace_seconds, avg_heart_rate, max_heart_rate,
        elevation_gain_feet, lap_type
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
      "#,
    )
    .bind(workout_id)
    .bind(split.lap_number)
    .bind(split.distance_miles)
    .bind(split.duration_seconds)
    .bind(split.avg_pace_seconds)
    .bind(split.avg_heart_rate)
    .bind(split.max_heart_rate)
    .bind(split.elevation_gain_feet)
    .bind(split.lap_type.as_str())
    .execute(&mut *tx)
    .await?;
  }

  tx.commit().await?;

  debug!(workout_id, count = splits.len(), "stored interpolated splits");
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::LapType;
  use crate::test_utils::{
    fixed_now, mock_workout, seed_laps, seed_stream, seed_workouts, setup_test_db, teardown_test_db,
  };
  use chrono::Duration;

  #[tokio::test]
  async fn test_fetch_workouts_since_filters_and_orders() {
    let pool = setup_test_db().await;
    let now = fixed_now();
    seed_workouts(
      &pool,
      &[
        mock_workout(1, "easy", 10.0, Some(40.0)),
        mock_workout(2, "tempo", 50.0, Some(55.0)),
        mock_workout(3, "long", 100.0, Some(120.0)),
      ],
    )
    .await;

    let recent = fetch_workouts_since(&pool, now - Duration::hours(72)).await.unwrap();

    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, 1);
    assert_eq!(recent[1].id, 2);
    assert_eq!(recent[1].duration_minutes, Some(55.0));
    assert_eq!(recent[1].training_load, None);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_fetch_laps_skips_interpolated_rows() {
    let pool = setup_test_db().await;
    seed_workouts(&pool, &[mock_workout(1, "easy", 2.0, Some(30.0))]).await;
    seed_laps(&pool, 1, &[Lap::new(0.5, 240.0), Lap::new(0.75, 350.0)]).await;

    let split = MileSplit {
      lap_number: 1,
      distance_miles: 1.0,
      duration_seconds: 470,
      avg_pace_seconds: 470,
      avg_heart_rate: None,
      max_heart_rate: None,
      elevation_gain_feet: None,
      lap_type: LapType::InterpolatedMileLap,
    };
    replace_interpolated_splits(&pool, 1, &[split.clone()]).await.unwrap();
    // Second write replaces rather than appends
    replace_interpolated_splits(&pool, 1, &[split]).await.unwrap();

    let laps = fetch_laps(&pool, 1).await.unwrap();
    assert_eq!(laps.len(), 2);
    assert_eq!(laps[0].distance_miles, 0.5);
    assert_eq!(laps[1].duration_seconds, 350.0);

    let interpolated: i64 = sqlx::query_scalar(
      "SELECT COUNT(*) FROM workout_laps WHERE workout_id = 1 AND lap_type LIKE 'interpolated%'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(interpolated, 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_fetch_stream_round_trips_arrays() {
    let pool = setup_test_db().await;
    seed_workouts(&pool, &[mock_workout(7, "easy", 2.0, Some(30.0))]).await;

    let stream = RawStream {
      distance_meters: vec![0.0, 800.0, 1609.344],
      time_seconds: vec![0.0, 240.0, 480.0],
      heartrate: vec![Some(140.0), None, Some(150.0)],
      altitude_meters: vec![],
    };
    seed_stream(&pool, 7, &stream).await;

    assert_eq!(fetch_stream(&pool, 7).await.unwrap(), Some(stream));
    assert_eq!(fetch_stream(&pool, 8).await.unwrap(), None);

    teardown_test_db(pool).await;
  }
}
