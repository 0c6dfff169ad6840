use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::error;

use crate::{AppError, AppState};
use backend_domain::services::{detection, prediction};
use backend_domain::{AlertId, AnomalyAlert};

const TRAILING_WINDOW_DAYS: i64 = 30;

// One detection pass: three independent checks against the 30-day
// baselines, then a single idempotent batch write. A failing check is
// logged and skipped, it never takes the other two down with it.
pub async fn run_detection(
    state: &AppState,
    now: DateTime<Utc>,
) -> Result<Vec<AnomalyAlert>, AppError> {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let window_start = now - Duration::days(TRAILING_WINDOW_DAYS);

    let mut alerts = Vec::new();

    match rejection_spike_check(state, day_start, window_start, now).await {
        Ok(Some(alert)) => alerts.push(alert),
        Ok(None) => {}
        Err(err) => error!("rejection spike check failed: {}", err),
    }

    match processing_drift_check(state, window_start, now).await {
        Ok(Some(alert)) => alerts.push(alert),
        Ok(None) => {}
        Err(err) => error!("processing time drift check failed: {}", err),
    }

    match application_surge_check(state, day_start, window_start, now).await {
        Ok(Some(alert)) => alerts.push(alert),
        Ok(None) => {}
        Err(err) => error!("application surge check failed: {}", err),
    }

    let stored = state
        .alert_repo
        .insert_for_day(now.date_naive(), alerts)
        .await?;
    state.metrics.record_detection_run(stored.len());

    Ok(stored)
}

pub async fn acknowledge_alert(state: &AppState, alert_id: AlertId) -> Result<(), AppError> {
    state.alert_repo.acknowledge(alert_id).await?;
    Ok(())
}

async fn rejection_spike_check(
    state: &AppState,
    day_start: DateTime<Utc>,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Option<AnomalyAlert>, AppError> {
    let today = state
        .review_repo
        .count_rejections_between(day_start, now)
        .await?;
    let trailing = state
        .review_repo
        .count_rejections_between(window_start, now)
        .await?;
    let daily_average = trailing as f64 / TRAILING_WINDOW_DAYS as f64;
    Ok(detection::rejection_spike(today, daily_average, now))
}

async fn processing_drift_check(
    state: &AppState,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Option<AnomalyAlert>, AppError> {
    let recent = state
        .tenant_repo
        .approved_between(now - Duration::hours(24), now)
        .await?;
    if recent.is_empty() {
        return Ok(None);
    }
    let recent_average = recent
        .iter()
        .map(|t| t.processing_days() as f64)
        .sum::<f64>()
        / recent.len() as f64;

    let trailing = state.tenant_repo.approved_between(window_start, now).await?;
    let trailing_average = prediction::average_processing_days(&trailing);

    Ok(detection::processing_time_drift(
        recent_average,
        trailing_average,
        now,
    ))
}

async fn application_surge_check(
    state: &AppState,
    day_start: DateTime<Utc>,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Option<AnomalyAlert>, AppError> {
    let today = state
        .tenant_repo
        .count_created_between(day_start, now)
        .await?;
    let trailing = state
        .tenant_repo
        .count_created_between(window_start, now)
        .await?;
    let daily_average = trailing as f64 / TRAILING_WINDOW_DAYS as f64;
    Ok(detection::application_surge(today, daily_average, now))
}
