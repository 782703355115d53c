use serde::{Deserialize, Serialize};

/// Injury-risk band for the acute:chronic workload ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
  Low,
  Optimal,
  High,
  VeryHigh,
}

impl RiskLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      RiskLevel::Low => "low",
      RiskLevel::Optimal => "optimal",
      RiskLevel::High => "high",
      RiskLevel::VeryHigh => "very_high",
    }
  }

  pub fn recommendation(&self) -> &'static str {
    match self {
      RiskLevel::Low => {
        "Training load is below your recent average. You can safely build volume."
      }
      RiskLevel::Optimal => "Training load is in the sweet spot. Keep it steady.",
      RiskLevel::High => {
        "Load is climbing faster than your body is used to. Consider an easier few days."
      }
      RiskLevel::VeryHigh => {
        "Load spike detected. Injury risk is elevated, so back off and prioritize recovery."
      }
    }
  }
}

/// Trailing-week load compared against the four-week average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyLoadAnalysis {
  pub current_7_day_load: i64,
  pub previous_7_day_load: i64,
  pub four_week_avg_load: f64,
  pub acute_to_chronic_ratio: f64,
  pub risk_level: RiskLevel,
  pub recommendation: String,
}
