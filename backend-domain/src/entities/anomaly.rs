// Anomaly alert entity
// Append-only rows; `acknowledged` is the only mutable field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AlertId, AlertSeverity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    RejectionSpike,
    ProcessingTimeDrift,
    ApplicationSurge,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::RejectionSpike => "REJECTION_SPIKE",
            AnomalyKind::ProcessingTimeDrift => "PROCESSING_TIME_DRIFT",
            AnomalyKind::ApplicationSurge => "APPLICATION_SURGE",
        }
    }

    pub fn metric(&self) -> &'static str {
        match self {
            AnomalyKind::RejectionSpike => "daily_rejections",
            AnomalyKind::ProcessingTimeDrift => "processing_time",
            AnomalyKind::ApplicationSurge => "daily_applications",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyAlert {
    pub id: AlertId,
    pub kind: AnomalyKind,
    pub severity: AlertSeverity,
    pub description: String,
    pub metric: String,
    pub current_value: f64,
    pub expected_value: f64,
    pub deviation_percent: f64,
    pub detected_at: DateTime<Utc>,
    pub acknowledged: bool,
}

impl AnomalyAlert {
    pub fn raise(
        kind: AnomalyKind,
        severity: AlertSeverity,
        description: String,
        current_value: f64,
        expected_value: f64,
        deviation_percent: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AlertId::generate(),
            kind,
            severity,
            description,
            metric: kind.metric().to_string(),
            current_value,
            expected_value,
            deviation_percent,
            detected_at: now,
            acknowledged: false,
        }
    }
}
