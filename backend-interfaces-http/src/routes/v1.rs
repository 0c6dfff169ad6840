use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    analytics_handlers,
    appeal_handlers,
    ops_handlers,
    verification_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/tenants",
            axum::routing::post(verification_handlers::register_tenant),
        )
        .route(
            "/v1/verification/documents",
            axum::routing::post(verification_handlers::submit_document),
        )
        .route(
            "/v1/verification/status",
            axum::routing::get(verification_handlers::verification_status),
        )
        .route(
            "/v1/verification/reviews",
            axum::routing::post(verification_handlers::record_review),
        )
        .route(
            "/v1/verification/appeals",
            axum::routing::post(appeal_handlers::open_appeal),
        )
        .route(
            "/v1/verification/appeals/:appeal_id",
            axum::routing::patch(appeal_handlers::decide_appeal),
        )
        .route(
            "/v1/verification/appeals/:appeal_id/info",
            axum::routing::post(appeal_handlers::provide_appeal_info),
        )
        .route(
            "/v1/verification/risk/:tenant_id",
            axum::routing::get(analytics_handlers::rejection_risk),
        )
        .route(
            "/v1/verification/processing-time/:tenant_id",
            axum::routing::get(analytics_handlers::processing_time),
        )
        .route(
            "/v1/verification/anomalies",
            axum::routing::get(analytics_handlers::list_anomalies),
        )
        .route(
            "/v1/verification/anomalies/:alert_id/ack",
            axum::routing::post(analytics_handlers::acknowledge_anomaly),
        )
        .route(
            "/v1/ops/detect",
            axum::routing::post(ops_handlers::run_detection),
        )
        .route("/v1/ops/audit", axum::routing::get(ops_handlers::audit_trail))
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
