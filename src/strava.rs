//! Strava API client for split ingestion
//!
//! Fetches the GPS streams and device laps the split interpolator consumes.
//! Token acquisition belongs to the host; this client is handed a bearer token.

use crate::config::{Config, DEFAULT_STRAVA_API_BASE};
use crate::models::{Lap, RawStream};
use crate::normalize::{meters_to_feet, meters_to_miles};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

const STREAM_KEYS: &str = "distance,time,heartrate,altitude";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StravaError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),

  #[error("API error: {0}")]
  Api(String),

  #[error("Failed to parse response: {0}")]
  Parse(String),

  #[error("Not authenticated with Strava")]
  NotAuthenticated,
}

impl Serialize for StravaError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Response Types
/// ---------------------------------------------------------------------------

/// One stream when requested with key_by_type=true
#[derive(Debug, Clone, Deserialize)]
struct StravaStreamKeyed {
  data: Vec<serde_json::Value>,
}

/// Lap summary from `/activities/{id}/laps`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaLap {
  #[serde(default)]
  pub lap_index: Option<i64>,
  #[serde(default)]
  pub distance: Option<f64>,
  #[serde(default)]
  pub elapsed_time: Option<f64>,
  #[serde(default)]
  pub moving_time: Option<f64>,
  #[serde(default)]
  pub average_heartrate: Option<f64>,
  #[serde(default)]
  pub max_heartrate: Option<f64>,
  #[serde(default)]
  pub total_elevation_gain: Option<f64>,
}

impl StravaLap {
  /// Convert to a lap in miles/feet. `None` when distance or time is missing.
  pub fn to_lap(&self) -> Option<Lap> {
    let duration = self.elapsed_time.or(self.moving_time)?;
    Some(Lap {
      distance_miles: meters_to_miles(self.distance?),
      duration_seconds: duration,
      avg_heart_rate: self.average_heartrate,
      max_heart_rate: self.max_heartrate,
      elevation_gain_feet: self.total_elevation_gain.map(meters_to_feet),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StravaClient {
  http: Client,
  base_url: String,
  access_token: String,
}

impl StravaClient {
  pub fn new(access_token: impl Into<String>) -> Self {
    Self::with_base_url(DEFAULT_STRAVA_API_BASE, access_token)
  }

  pub fn with_base_url(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
      access_token: access_token.into(),
    }
  }

  pub fn from_config(config: &Config) -> Result<Self, StravaError> {
    let token = config
      .strava_access_token
      .clone()
      .ok_or_else(|| StravaError::MissingConfig("STRAVA_ACCESS_TOKEN".into()))?;
    Ok(Self::with_base_url(config.strava_api_base.clone(), token))
  }

  /// GET a JSON body. `Ok(None)` on 404 (activity has no such data).
  async fn get_text(&self, url: Url) -> Result<Option<String>, StravaError> {
    let response = self
      .http
      .get(url)
      .header("Authorization", format!("Bearer {}", self.access_token))
      .send()
      .await?;

    match response.status() {
      StatusCode::UNAUTHORIZED => Err(StravaError::NotAuthenticated),
      StatusCode::NOT_FOUND => Ok(None),
      status if !status.is_success() => {
        let error_text = response.text().await.unwrap_or_default();
        warn!(%status, "Strava request failed");
        Err(StravaError::Api(format!("{}: {}", status, error_text)))
      }
      _ => Ok(Some(response.text().await?)),
    }
  }

  /// Distance/time/heartrate/altitude streams for an activity.
  ///
  /// `None` when Strava has no streams or the distance or time stream is missing.
  pub async fn fetch_streams(&self, activity_id: i64) -> Result<Option<RawStream>, StravaError> {
    let mut url = Url::parse(&format!("{}/activities/{}/streams", self.base_url, activity_id))?;
    url
      .query_pairs_mut()
      .append_pair("keys", STREAM_KEYS)
      .append_pair("key_by_type", "true");

    let Some(body) = self.get_text(url).await? else {
      return Ok(None);
    };

    let mut keyed: HashMap<String, StravaStreamKeyed> = serde_json::from_str(&body)
      .map_err(|e| StravaError::Parse(format!("streams: {}", e)))?;

    let (Some(distance), Some(time)) = (keyed.remove("distance"), keyed.remove("time")) else {
      debug!(activity_id, "activity has no distance/time streams");
      return Ok(None);
    };

    // Unparseable points become NaN / None so indices stay aligned
    let numbers = |values: Vec<serde_json::Value>| -> Vec<f64> {
      values.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect()
    };
    let optional = |stream: Option<StravaStreamKeyed>| -> Vec<Option<f64>> {
      stream
        .map(|s| s.data.iter().map(|v| v.as_f64()).collect())
        .unwrap_or_default()
    };

    let stream = RawStream {
      distance_meters: numbers(distance.data),
      time_seconds: numbers(time.data),
      heartrate: optional(keyed.remove("heartrate")),
      altitude_meters: optional(keyed.remove("altitude")),
    };

    debug!(activity_id, points = stream.time_seconds.len(), "fetched streams");
    Ok(Some(stream))
  }

  /// Device laps for an activity in run order
  pub async fn fetch_laps(&self, activity_id: i64) -> Result<Vec<Lap>, StravaError> {
    let url = Url::parse(&format!("{}/activities/{}/laps", self.base_url, activity_id))?;

    let Some(body) = self.get_text(url).await? else {
      return Ok(Vec::new());
    };

    let mut laps: Vec<StravaLap> =
      serde_json::from_str(&body).map_err(|e| StravaError::Parse(format!("laps: {}", e)))?;
    laps.sort_by_key(|lap| lap.lap_index.unwrap_or(i64::MAX));

    Ok(laps.iter().filter_map(StravaLap::to_lap).collect())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
