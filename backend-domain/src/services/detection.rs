// Anomaly checks
// Each check compares a current metric against its 30-day baseline and
// yields at most one alert. The checks know nothing about storage or
// scheduling; the detection command feeds them and persists the result.

use chrono::{DateTime, Utc};

use crate::entities::{AnomalyAlert, AnomalyKind};
use crate::value_objects::AlertSeverity;

const SPIKE_ALERT_RATIO: f64 = 2.0;
const SPIKE_HIGH_RATIO: f64 = 4.0;
const DRIFT_ALERT_FRACTION: f64 = 0.5;
const DRIFT_HIGH_FRACTION: f64 = 1.0;
const SURGE_ALERT_RATIO: f64 = 3.0;
const SURGE_HIGH_RATIO: f64 = 6.0;

pub fn rejection_spike(
    rejections_today: u64,
    daily_average: f64,
    now: DateTime<Utc>,
) -> Option<AnomalyAlert> {
    if daily_average <= 0.0 {
        return None;
    }
    let today = rejections_today as f64;
    if today <= daily_average * SPIKE_ALERT_RATIO {
        return None;
    }

    let ratio = today / daily_average;
    let severity = if today > daily_average * SPIKE_HIGH_RATIO {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    };

    Some(AnomalyAlert::raise(
        AnomalyKind::RejectionSpike,
        severity,
        format!(
            "rejection count ({}) is {:.1}x the 30-day daily average",
            rejections_today, ratio
        ),
        today,
        daily_average.round(),
        (today - daily_average) / daily_average * 100.0,
        now,
    ))
}

pub fn processing_time_drift(
    recent_average_days: f64,
    trailing_average_days: f64,
    now: DateTime<Utc>,
) -> Option<AnomalyAlert> {
    if trailing_average_days <= 0.0 {
        return None;
    }
    let fraction =
        (recent_average_days - trailing_average_days).abs() / trailing_average_days;
    if fraction <= DRIFT_ALERT_FRACTION {
        return None;
    }

    let severity = if fraction > DRIFT_HIGH_FRACTION {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    };

    Some(AnomalyAlert::raise(
        AnomalyKind::ProcessingTimeDrift,
        severity,
        format!(
            "recent average processing time ({:.1} days) deviates from the 30-day average ({:.1} days)",
            recent_average_days, trailing_average_days
        ),
        recent_average_days,
        trailing_average_days,
        fraction * 100.0,
        now,
    ))
}

pub fn application_surge(
    applications_today: u64,
    daily_average: f64,
    now: DateTime<Utc>,
) -> Option<AnomalyAlert> {
    if daily_average <= 0.0 {
        return None;
    }
    let today = applications_today as f64;
    if today <= daily_average * SURGE_ALERT_RATIO {
        return None;
    }

    let ratio = today / daily_average;
    let severity = if today > daily_average * SURGE_HIGH_RATIO {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    };

    Some(AnomalyAlert::raise(
        AnomalyKind::ApplicationSurge,
        severity,
        format!(
            "{} new institutions registered today ({:.1}x the 30-day daily average)",
            applications_today, ratio
        ),
        today,
        daily_average.round(),
        (today - daily_average) / daily_average * 100.0,
        now,
    ))
}
