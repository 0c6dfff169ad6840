use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{error, info};

use backend_application::commands::detection_commands;
use backend_application::AppState;
use backend_domain::RuntimeConfig;

// Daily anomaly sweep. Shares its code path with the manual ops endpoint,
// so both obey the same per-day idempotency rule.
pub async fn schedule_detection(state: AppState) {
    loop {
        let next = next_detection_time(&state.config);
        let duration = next.signed_duration_since(Local::now());
        let sleep_ms = duration.num_milliseconds().max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(sleep_ms)).await;

        match detection_commands::run_detection(&state, Utc::now()).await {
            Ok(alerts) => {
                if !alerts.is_empty() {
                    info!("anomaly detection stored {} alerts", alerts.len());
                }
            }
            Err(err) => error!("anomaly detection run failed: {}", err),
        }
    }
}

fn next_detection_time(config: &RuntimeConfig) -> DateTime<Local> {
    let now = Local::now();
    let today = now.date_naive();
    let target = today
        .and_hms_opt(config.detection_hour, config.detection_minute, 0)
        .unwrap();
    let mut dt = Local.from_local_datetime(&target).unwrap();
    if dt <= now {
        let next = today.succ_opt().unwrap();
        let next_target = next
            .and_hms_opt(config.detection_hour, config.detection_minute, 0)
            .unwrap();
        dt = Local.from_local_datetime(&next_target).unwrap();
    }
    dt
}
