use serde::{Deserialize, Serialize};

/// Categorical form derived from the fatigue factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
  Peaked,
  Fresh,
  Neutral,
  Tired,
  VeryTired,
}

impl FormStatus {
  pub fn from_fatigue(fatigue_factor: i64) -> Self {
    match fatigue_factor {
      f if f < 20 => FormStatus::Peaked,
      f if f < 35 => FormStatus::Fresh,
      f if f < 55 => FormStatus::Neutral,
      f if f < 75 => FormStatus::Tired,
      _ => FormStatus::VeryTired,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      FormStatus::Peaked => "peaked",
      FormStatus::Fresh => "fresh",
      FormStatus::Neutral => "neutral",
      FormStatus::Tired => "tired",
      FormStatus::VeryTired => "very_tired",
    }
  }
}

/// Recovery state evaluated at request time. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueSnapshot {
  /// 0-100
  pub fatigue_factor: i64,
  pub form_status: FormStatus,
  /// Hours until the last workout is considered absorbed
  pub recovery_hours: i64,
  pub ready_for_hard_workout: bool,
  pub ready_for_easy_run: bool,
  pub suggestion: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hours_since_last_workout: Option<f64>,
}
