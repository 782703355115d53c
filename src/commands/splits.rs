use crate::commands::CommandError;
use crate::db::{fetch_laps, fetch_stream, replace_interpolated_splits, AppState};
use crate::models::MileSplit;
use crate::splits::build_mile_splits;
use crate::strava::StravaClient;
use tracing::{info, warn};

/// ---------------------------------------------------------------------------
/// Mile Split Commands
/// ---------------------------------------------------------------------------

/// Mile splits for a stored workout, from its stream when present and its laps otherwise
pub async fn get_mile_splits(state: &AppState, workout_id: i64) -> Result<Vec<MileSplit>, CommandError> {
  let stream = fetch_stream(&state.db, workout_id).await?;
  let laps = fetch_laps(&state.db, workout_id).await?;

  Ok(build_mile_splits(stream.as_ref(), &laps))
}

/// Pull a Strava activity's streams and laps, build splits and store them on the workout.
///
/// Existing interpolated rows are left untouched when Strava yields nothing usable.
pub async fn import_strava_splits(
  state: &AppState,
  client: &StravaClient,
  workout_id: i64,
  activity_id: i64,
) -> Result<Vec<MileSplit>, CommandError> {
  let (stream, laps) = tokio::try_join!(client.fetch_streams(activity_id), client.fetch_laps(activity_id))?;

  let splits = build_mile_splits(stream.as_ref(), &laps);
  if splits.is_empty() {
    warn!(workout_id, activity_id, "no usable stream or laps for mile splits");
    return Ok(splits);
  }

  replace_interpolated_splits(&state.db, workout_id, &splits).await?;

  info!(workout_id, activity_id, count = splits.len(), "imported mile splits");
  Ok(splits)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
