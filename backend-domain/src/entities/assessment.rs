// Risk assessment and processing-time prediction
// Derived read models: recomputed on demand, never the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{RiskLevel, TenantId};

// Closed set of scoring dimensions. Keeping this an enum (instead of the
// loose string keys the factors started out as) makes scoring exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FactorCategory {
    DocumentCompleteness,
    DocumentQuality,
    HistoricalPattern,
    StudentCount,
}

impl FactorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorCategory::DocumentCompleteness => "DOCUMENT_COMPLETENESS",
            FactorCategory::DocumentQuality => "DOCUMENT_QUALITY",
            FactorCategory::HistoricalPattern => "HISTORICAL_PATTERN",
            FactorCategory::StudentCount => "STUDENT_COUNT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: FactorCategory,
    pub score: f64,
    pub severity: RiskLevel,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tenant_id: TenantId,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionFactorCategory {
    DocumentCompleteness,
    DocumentQualityAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionFactor {
    pub category: PredictionFactorCategory,
    pub impact: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingTimePrediction {
    pub estimated_days: u32,
    pub confidence: f64,
    pub range_min_days: u32,
    pub range_max_days: u32,
    pub factors: Vec<PredictionFactor>,
}
