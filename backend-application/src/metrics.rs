use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    documents_submitted: AtomicU64,
    reviews_recorded: AtomicU64,
    appeals_opened: AtomicU64,
    appeals_decided: AtomicU64,
    risk_assessments: AtomicU64,
    predictions: AtomicU64,
    detection_runs: AtomicU64,
    alerts_raised: AtomicU64,
    conflict_retries: AtomicU64,
}

impl Metrics {
    pub fn record_document_submitted(&self) {
        self.documents_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_review_recorded(&self) {
        self.reviews_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_appeal_opened(&self) {
        self.appeals_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_appeal_decided(&self) {
        self.appeals_decided.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_risk_assessment(&self) {
        self.risk_assessments.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prediction(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection_run(&self, alert_count: usize) {
        self.detection_runs.fetch_add(1, Ordering::Relaxed);
        self.alerts_raised
            .fetch_add(alert_count as u64, Ordering::Relaxed);
    }

    pub fn record_conflict_retry(&self) {
        self.conflict_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        format!(
            "# TYPE attest_documents_submitted_total counter\n\
attest_documents_submitted_total {}\n\
# TYPE attest_reviews_recorded_total counter\n\
attest_reviews_recorded_total {}\n\
# TYPE attest_appeals_opened_total counter\n\
attest_appeals_opened_total {}\n\
# TYPE attest_appeals_decided_total counter\n\
attest_appeals_decided_total {}\n\
# TYPE attest_risk_assessments_total counter\n\
attest_risk_assessments_total {}\n\
# TYPE attest_predictions_total counter\n\
attest_predictions_total {}\n\
# TYPE attest_detection_runs_total counter\n\
attest_detection_runs_total {}\n\
# TYPE attest_alerts_raised_total counter\n\
attest_alerts_raised_total {}\n\
# TYPE attest_conflict_retries_total counter\n\
attest_conflict_retries_total {}\n",
            self.documents_submitted.load(Ordering::Relaxed),
            self.reviews_recorded.load(Ordering::Relaxed),
            self.appeals_opened.load(Ordering::Relaxed),
            self.appeals_decided.load(Ordering::Relaxed),
            self.risk_assessments.load(Ordering::Relaxed),
            self.predictions.load(Ordering::Relaxed),
            self.detection_runs.load(Ordering::Relaxed),
            self.alerts_raised.load(Ordering::Relaxed),
            self.conflict_retries.load(Ordering::Relaxed),
        )
    }
}
