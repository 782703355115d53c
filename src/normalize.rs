//! Stream and lap normalization
//!
//! Turns raw GPS arrays into a monotonic, zero-based sample sequence and
//! decides whether lap records are fine-grained enough to interpolate.
//! Noisy points are dropped, never corrected.

use crate::models::{Lap, RawStream, Sample};
use tracing::debug;

/// ---------------------------------------------------------------------------
/// Unit Conversions
/// ---------------------------------------------------------------------------

pub const METERS_PER_MILE: f64 = 1609.344;
pub const FEET_PER_METER: f64 = 3.28084;

pub fn meters_to_miles(meters: f64) -> f64 {
  meters / METERS_PER_MILE
}

pub fn meters_to_feet(meters: f64) -> f64 {
  meters * FEET_PER_METER
}

/// ---------------------------------------------------------------------------
/// Stream Normalization
/// ---------------------------------------------------------------------------

/// Normalize a raw stream into monotonic samples starting at (0, 0).
///
/// Points that are non-finite, negative, regress distance or time against the
/// last accepted point, or exactly repeat it are skipped. Returns an empty
/// vector when fewer than two usable points remain.
pub fn normalize_stream(raw: &RawStream) -> Vec<Sample> {
  let len = raw.distance_meters.len().min(raw.time_seconds.len());
  let mut accepted: Vec<Sample> = Vec::with_capacity(len);

  for i in 0..len {
    let distance = raw.distance_meters[i];
    let time = raw.time_seconds[i];

    if !distance.is_finite() || !time.is_finite() || distance < 0.0 || time < 0.0 {
      continue;
    }

    let distance_miles = meters_to_miles(distance);

    if let Some(prev) = accepted.last() {
      if distance_miles < prev.distance_miles || time < prev.elapsed_seconds {
        continue;
      }
      if distance_miles == prev.distance_miles && time == prev.elapsed_seconds {
        continue;
      }
    }

    let heart_rate = raw
      .heartrate
      .get(i)
      .copied()
      .flatten()
      .filter(|hr| hr.is_finite())
      .map(|hr| hr.round() as i64);

    let altitude_feet = raw
      .altitude_meters
      .get(i)
      .copied()
      .flatten()
      .filter(|alt| alt.is_finite())
      .map(meters_to_feet);

    accepted.push(Sample {
      distance_miles,
      elapsed_seconds: time,
      heart_rate,
      altitude_feet,
    });
  }

  if accepted.len() < 2 {
    debug!(points = len, usable = accepted.len(), "stream has too few usable points");
    return Vec::new();
  }

  if accepted.len() < len {
    debug!(dropped = len - accepted.len(), "dropped noisy stream points");
  }

  let origin_distance = accepted[0].distance_miles;
  let origin_time = accepted[0].elapsed_seconds;
  for sample in &mut accepted {
    sample.distance_miles -= origin_distance;
    sample.elapsed_seconds -= origin_time;
  }

  accepted
}

/// ---------------------------------------------------------------------------
/// Lap Screening
/// ---------------------------------------------------------------------------

/// Median lap distance above which laps are considered auto-laps
const COARSE_MEDIAN_MILES: f64 = 1.25;

/// A lap at or below this distance marks the set as fine-grained regardless of median
const SHORT_LAP_MILES: f64 = 0.8;

/// Laps with a finite, positive distance and duration
pub fn measurable_laps(laps: &[Lap]) -> Vec<Lap> {
  laps
    .iter()
    .filter(|lap| {
      lap.distance_miles.is_finite()
        && lap.duration_seconds.is_finite()
        && lap.distance_miles > 0.0
        && lap.duration_seconds > 0.0
    })
    .copied()
    .collect()
}

/// Whether laps are short enough for meaningful per-mile interpolation.
///
/// A single 8-mile auto-lap would produce eight identical fabricated splits;
/// such inputs are rejected.
pub fn laps_are_fine_grained(laps: &[Lap]) -> bool {
  let measurable = measurable_laps(laps);
  if measurable.len() < 2 {
    return false;
  }

  let mut distances: Vec<f64> = measurable.iter().map(|lap| lap.distance_miles).collect();
  distances.sort_by(|a, b| a.total_cmp(b));

  let mid = distances.len() / 2;
  let median = if distances.len() % 2 == 0 {
    (distances[mid - 1] + distances[mid]) / 2.0
  } else {
    distances[mid]
  };

  let has_short_lap = distances.iter().any(|d| *d <= SHORT_LAP_MILES);
  !(median > COARSE_MEDIAN_MILES && !has_short_lap)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
