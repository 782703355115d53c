//! Mile-split interpolation
//!
//! Produces per-mile splits either from a normalized GPS stream (exact
//! boundary times by linear interpolation) or from fine-grained device laps
//! (constant pace within each lap, prorated across mile boundaries).

use crate::models::{Lap, LapType, MileSplit, RawStream, Sample};
use crate::normalize::{laps_are_fine_grained, measurable_laps, normalize_stream};
use tracing::debug;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// Leftover distance below this is rounding noise, not a partial mile
const PARTIAL_EPSILON_MILES: f64 = 1e-4;

/// Tolerance for "the current mile is complete" in the lap path
const MILE_COMPLETE_EPSILON: f64 = 1e-6;

/// A stream split this close to 1.0 mi is tagged as a full mile
const FULL_MILE_TOLERANCE: f64 = 0.01;

/// Plausible heart rate bounds (exclusive)
const MIN_VALID_HR: i64 = 40;
const MAX_VALID_HR: i64 = 240;

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// ---------------------------------------------------------------------------
/// Stream Path
/// ---------------------------------------------------------------------------

/// Build per-mile splits from normalized samples.
///
/// Samples must be monotonic in distance and time (see `normalize_stream`).
pub fn build_interpolated_mile_splits_from_stream(samples: &[Sample]) -> Vec<MileSplit> {
  if samples.len() < 2 {
    return Vec::new();
  }

  let total_distance = samples[samples.len() - 1].distance_miles;
  if !total_distance.is_finite() || total_distance <= PARTIAL_EPSILON_MILES {
    return Vec::new();
  }

  let full_miles = total_distance.floor() as u32;
  let mut boundaries: Vec<f64> = (0..=full_miles).map(f64::from).collect();
  if total_distance - f64::from(full_miles) > PARTIAL_EPSILON_MILES {
    boundaries.push(total_distance);
  }

  let mut splits = Vec::with_capacity(boundaries.len());

  for window in boundaries.windows(2) {
    let (start_distance, end_distance) = (window[0], window[1]);
    let start_time = time_at_distance(samples, start_distance);
    let end_time = time_at_distance(samples, end_distance);

    let distance = end_distance - start_distance;
    let duration = end_time - start_time;
    if duration <= 0.0 || distance <= 0.0 {
      continue;
    }

    let pace = duration / distance;
    if !pace.is_finite() {
      continue;
    }

    let (avg_heart_rate, max_heart_rate) = heart_rate_in_window(samples, start_time, end_time);
    let elevation_gain_feet = elevation_gain_in_window(samples, start_time, end_time);

    let lap_type = if (distance - 1.0).abs() <= FULL_MILE_TOLERANCE {
      LapType::InterpolatedMileStream
    } else {
      LapType::InterpolatedPartialStream
    };

    splits.push(MileSplit {
      lap_number: splits.len() as u32 + 1,
      distance_miles: round2(distance),
      duration_seconds: duration.round() as i64,
      avg_pace_seconds: pace.round() as i64,
      avg_heart_rate,
      max_heart_rate,
      elevation_gain_feet,
      lap_type,
    });
  }

  splits
}

/// Elapsed time at a target distance, interpolated inside the bracketing segment.
/// Targets beyond the last sample clamp to its time.
fn time_at_distance(samples: &[Sample], target: f64) -> f64 {
  let idx = samples.partition_point(|s| s.distance_miles < target);

  if idx >= samples.len() {
    return samples[samples.len() - 1].elapsed_seconds;
  }
  if idx == 0 {
    return samples[0].elapsed_seconds;
  }

  let prev = &samples[idx - 1];
  let next = &samples[idx];
  let span = next.distance_miles - prev.distance_miles;
  if span <= 0.0 {
    return next.elapsed_seconds;
  }

  let fraction = (target - prev.distance_miles) / span;
  prev.elapsed_seconds + fraction * (next.elapsed_seconds - prev.elapsed_seconds)
}

/// Average and max of in-range heart rates sampled strictly inside the window
fn heart_rate_in_window(samples: &[Sample], start: f64, end: f64) -> (Option<i64>, Option<i64>) {
  let readings: Vec<i64> = samples
    .iter()
    .filter(|s| s.elapsed_seconds > start && s.elapsed_seconds < end)
    .filter_map(|s| s.heart_rate)
    .filter(|hr| *hr > MIN_VALID_HR && *hr < MAX_VALID_HR)
    .collect();

  if readings.is_empty() {
    return (None, None);
  }

  let sum: i64 = readings.iter().sum();
  let avg = (sum as f64 / readings.len() as f64).round() as i64;
  (Some(avg), readings.iter().max().copied())
}

/// Positive altitude change inside the window, with partially overlapping
/// intervals weighted by their overlap fraction.
///
/// `None` when no altitude-bearing interval touches the window.
fn elevation_gain_in_window(samples: &[Sample], start: f64, end: f64) -> Option<i64> {
  let mut gain = 0.0;
  let mut has_altitude = false;

  for pair in samples.windows(2) {
    let (a, b) = (&pair[0], &pair[1]);
    let (alt_a, alt_b) = match (a.altitude_feet, b.altitude_feet) {
      (Some(x), Some(y)) => (x, y),
      _ => continue,
    };

    let interval = b.elapsed_seconds - a.elapsed_seconds;
    if interval <= 0.0 {
      continue;
    }

    let overlap = b.elapsed_seconds.min(end) - a.elapsed_seconds.max(start);
    if overlap <= 0.0 {
      continue;
    }

    has_altitude = true;
    let delta = alt_b - alt_a;
    if delta > 0.0 {
      gain += delta * (overlap / interval);
    }
  }

  has_altitude.then(|| gain.round() as i64)
}

/// ---------------------------------------------------------------------------
/// Lap Path
/// ---------------------------------------------------------------------------

/// Running totals for the mile currently being filled
#[derive(Debug, Default)]
struct MileAccumulator {
  distance: f64,
  time: f64,
  hr_weighted_sum: f64,
  hr_weight: f64,
  max_hr: Option<f64>,
  elevation: f64,
  has_elevation: bool,
}

impl MileAccumulator {
  fn to_split(&self, lap_number: u32, lap_type: LapType) -> MileSplit {
    let avg_heart_rate = if self.hr_weight > 0.0 {
      Some((self.hr_weighted_sum / self.hr_weight).round() as i64)
    } else {
      None
    };

    MileSplit {
      lap_number,
      distance_miles: round2(self.distance),
      duration_seconds: self.time.round() as i64,
      avg_pace_seconds: (self.time / self.distance).round() as i64,
      avg_heart_rate,
      max_heart_rate: self.max_hr.map(|hr| hr.round() as i64),
      elevation_gain_feet: self.has_elevation.then(|| self.elevation.round() as i64),
      lap_type,
    }
  }
}

/// Build per-mile splits from device laps.
///
/// Returns an empty vector when the laps are too coarse to interpolate.
pub fn build_interpolated_mile_splits_from_laps(laps: &[Lap]) -> Vec<MileSplit> {
  if !laps_are_fine_grained(laps) {
    debug!(laps = laps.len(), "laps too coarse for mile interpolation");
    return Vec::new();
  }

  let mut splits = Vec::new();
  let mut current = MileAccumulator::default();

  for lap in measurable_laps(laps) {
    let pace = lap.duration_seconds / lap.distance_miles;
    let avg_hr = lap.avg_heart_rate.filter(|hr| hr.is_finite() && *hr > 0.0);
    let max_hr = lap.max_heart_rate.filter(|hr| hr.is_finite() && *hr > 0.0);
    let elevation = lap.elevation_gain_feet.filter(|e| e.is_finite());

    let mut remaining = lap.distance_miles;

    while remaining > 0.0 {
      let needed = 1.0 - current.distance;
      let take = remaining.min(needed);
      let fraction = take / lap.distance_miles;

      current.distance += take;
      current.time += take * pace;

      if let Some(hr) = avg_hr {
        current.hr_weighted_sum += hr * take;
        current.hr_weight += take;
      }
      if let Some(hr) = max_hr {
        current.max_hr = Some(current.max_hr.map_or(hr, |m| m.max(hr)));
      }
      if let Some(gain) = elevation {
        current.elevation += gain * fraction;
        current.has_elevation = true;
      }

      remaining -= take;

      if 1.0 - current.distance <= MILE_COMPLETE_EPSILON {
        let lap_number = splits.len() as u32 + 1;
        splits.push(current.to_split(lap_number, LapType::InterpolatedMileLap));
        current = MileAccumulator::default();
      }

      if remaining <= MILE_COMPLETE_EPSILON * MILE_COMPLETE_EPSILON {
        break;
      }
    }
  }

  if current.distance > PARTIAL_EPSILON_MILES {
    let lap_number = splits.len() as u32 + 1;
    splits.push(current.to_split(lap_number, LapType::InterpolatedPartialLap));
  }

  splits
}

/// ---------------------------------------------------------------------------
/// Combined Entry Point
/// ---------------------------------------------------------------------------

/// Splits from the stream when it yields any, otherwise from the laps
pub fn build_mile_splits(stream: Option<&RawStream>, laps: &[Lap]) -> Vec<MileSplit> {
  if let Some(raw) = stream {
    let samples = normalize_stream(raw);
    let splits = build_interpolated_mile_splits_from_stream(&samples);
    if !splits.is_empty() {
      return splits;
    }
    debug!("stream produced no splits, falling back to laps");
  }

  build_interpolated_mile_splits_from_laps(laps)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
