use serde::{Deserialize, Serialize};

/// Raw GPS time series as delivered by Strava: parallel arrays, metric units.
///
/// `heartrate` and `altitude_meters` may be empty when the device did not
/// record them. Callers are responsible for keeping the arrays aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStream {
  pub distance_meters: Vec<f64>,
  pub time_seconds: Vec<f64>,
  #[serde(default)]
  pub heartrate: Vec<Option<f64>>,
  #[serde(default)]
  pub altitude_meters: Vec<Option<f64>>,
}

/// One normalized stream point. Miles, seconds, feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
  pub distance_miles: f64,
  pub elapsed_seconds: f64,
  pub heart_rate: Option<i64>,
  pub altitude_feet: Option<f64>,
}

impl Sample {
  pub fn new(distance_miles: f64, elapsed_seconds: f64) -> Self {
    Self {
      distance_miles,
      elapsed_seconds,
      heart_rate: None,
      altitude_feet: None,
    }
  }
}

/// A device lap record (coarse alternative to streams).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lap {
  pub distance_miles: f64,
  pub duration_seconds: f64,
  pub avg_heart_rate: Option<f64>,
  pub max_heart_rate: Option<f64>,
  pub elevation_gain_feet: Option<f64>,
}

impl Lap {
  pub fn new(distance_miles: f64, duration_seconds: f64) -> Self {
    Self {
      distance_miles,
      duration_seconds,
      avg_heart_rate: None,
      max_heart_rate: None,
      elevation_gain_feet: None,
    }
  }
}

/// How a split was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapType {
  InterpolatedMileLap,
  InterpolatedPartialLap,
  InterpolatedMileStream,
  InterpolatedPartialStream,
}

impl LapType {
  pub fn as_str(&self) -> &'static str {
    match self {
      LapType::InterpolatedMileLap => "interpolated_mile_lap",
      LapType::InterpolatedPartialLap => "interpolated_partial_lap",
      LapType::InterpolatedMileStream => "interpolated_mile_stream",
      LapType::InterpolatedPartialStream => "interpolated_partial_stream",
    }
  }

  pub fn is_partial(&self) -> bool {
    matches!(
      self,
      LapType::InterpolatedPartialLap | LapType::InterpolatedPartialStream
    )
  }
}

/// A per-mile split. The trailing split of a run may be a partial mile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileSplit {
  pub lap_number: u32,
  pub distance_miles: f64,
  pub duration_seconds: i64,
  pub avg_pace_seconds: i64,
  pub avg_heart_rate: Option<i64>,
  pub max_heart_rate: Option<i64>,
  pub elevation_gain_feet: Option<i64>,
  pub lap_type: LapType,
}
