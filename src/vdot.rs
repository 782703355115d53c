//! VDOT and training pace zones
//!
//! Jack Daniels' VDOT from a race result, using the Daniels–Gilbert oxygen
//! cost and percent-of-max equations:
//!
//! - VO2 = -4.60 + 0.182258·v + 0.000104·v²  (v in meters/minute)
//! - %max = 0.8 + 0.1894393·e^(-0.012778·t) + 0.2989558·e^(-0.1932605·t)  (t in minutes)
//! - VDOT = VO2 / %max
//!
//! Pace zones invert the oxygen-cost curve at fixed fractions of VDOT.

use crate::normalize::METERS_PER_MILE;
use serde::{Deserialize, Serialize};

const VO2_A: f64 = 0.000_104;
const VO2_B: f64 = 0.182_258;
const VO2_C: f64 = -4.60;

const PCT_BASE: f64 = 0.8;
const PCT_FAST_COEFF: f64 = 0.189_439_3;
const PCT_FAST_RATE: f64 = -0.012_778;
const PCT_SLOW_COEFF: f64 = 0.298_955_8;
const PCT_SLOW_RATE: f64 = -0.193_260_5;

/// Valid race velocity range (m/min)
const MIN_VELOCITY: f64 = 100.0;
const MAX_VELOCITY: f64 = 500.0;

/// ---------------------------------------------------------------------------
/// VDOT From Race
/// ---------------------------------------------------------------------------

fn oxygen_cost(velocity: f64) -> f64 {
  (VO2_A * velocity).mul_add(velocity, VO2_B.mul_add(velocity, VO2_C))
}

fn percent_max(minutes: f64) -> f64 {
  PCT_BASE
    + PCT_FAST_COEFF * (PCT_FAST_RATE * minutes).exp()
    + PCT_SLOW_COEFF * (PCT_SLOW_RATE * minutes).exp()
}

fn raw_vdot(distance_meters: f64, time_seconds: f64) -> f64 {
  let minutes = time_seconds / 60.0;
  oxygen_cost(distance_meters / minutes) / percent_max(minutes)
}

/// VDOT for a race result. `None` for unusable input or implausible velocity.
pub fn vdot_from_race(distance_meters: f64, time_seconds: f64) -> Option<f64> {
  if !distance_meters.is_finite() || !time_seconds.is_finite() {
    return None;
  }
  if distance_meters <= 0.0 || time_seconds <= 0.0 {
    return None;
  }

  let velocity = distance_meters / (time_seconds / 60.0);
  if !(MIN_VELOCITY..=MAX_VELOCITY).contains(&velocity) {
    return None;
  }

  Some(raw_vdot(distance_meters, time_seconds))
}

/// Race time (seconds) at which `distance_meters` yields `vdot`.
///
/// Bisects over the valid velocity range; `None` when the VDOT is not
/// reachable at that distance.
pub fn predict_race_seconds(vdot: f64, distance_meters: f64) -> Option<f64> {
  if !vdot.is_finite() || vdot <= 0.0 || !distance_meters.is_finite() || distance_meters <= 0.0 {
    return None;
  }

  // VDOT falls as time grows
  let mut fast = distance_meters / MAX_VELOCITY * 60.0;
  let mut slow = distance_meters / MIN_VELOCITY * 60.0;
  if vdot > raw_vdot(distance_meters, fast) || vdot < raw_vdot(distance_meters, slow) {
    return None;
  }

  for _ in 0..100 {
    let mid = (fast + slow) / 2.0;
    if raw_vdot(distance_meters, mid) > vdot {
      fast = mid;
    } else {
      slow = mid;
    }
  }

  Some((fast + slow) / 2.0)
}

/// ---------------------------------------------------------------------------
/// Training Paces
/// ---------------------------------------------------------------------------

/// Pace band in seconds per mile; `fast_seconds` ≤ `slow_seconds`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceRange {
  pub fast_seconds: f64,
  pub slow_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceZones {
  pub vdot: f64,
  pub easy: PaceRange,
  pub marathon: PaceRange,
  pub threshold: PaceRange,
  pub interval: PaceRange,
  pub repetition: PaceRange,
}

/// Velocity (m/min) whose oxygen cost equals `vo2`
fn velocity_for_vo2(vo2: f64) -> f64 {
  let discriminant = VO2_B.powi(2) - 4.0 * VO2_A * (VO2_C - vo2);
  (-VO2_B + discriminant.sqrt()) / (2.0 * VO2_A)
}

fn pace_at_fraction(vdot: f64, fraction: f64) -> f64 {
  let velocity = velocity_for_vo2(vdot * fraction);
  METERS_PER_MILE / velocity * 60.0
}

fn range(vdot: f64, low_fraction: f64, high_fraction: f64) -> PaceRange {
  PaceRange {
    fast_seconds: pace_at_fraction(vdot, high_fraction).round(),
    slow_seconds: pace_at_fraction(vdot, low_fraction).round(),
  }
}

/// Daniels training zones for a VDOT
pub fn training_paces(vdot: f64) -> PaceZones {
  PaceZones {
    vdot: (vdot * 10.0).round() / 10.0,
    easy: range(vdot, 0.59, 0.74),
    marathon: range(vdot, 0.75, 0.84),
    threshold: range(vdot, 0.83, 0.88),
    interval: range(vdot, 0.95, 1.0),
    repetition: range(vdot, 1.05, 1.10),
  }
}

/// `m:ss` rendering of a pace or duration in seconds
pub fn format_pace(seconds: f64) -> String {
  let total = seconds.max(0.0).round() as i64;
  format!("{}:{:02}", total / 60, total % 60)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
