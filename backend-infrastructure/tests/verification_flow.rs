// End-to-end exercises of the verification lifecycle over the in-memory
// store: commands and queries wired exactly as the bootstrap layer wires
// them, minus the HTTP transport.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;

use backend_application::commands::{
    appeal_commands,
    detection_commands,
    document_commands,
    review_commands,
    tenant_commands,
};
use backend_application::queries::{prediction_queries, risk_queries, status_queries};
use backend_application::{AppError, AppState, Metrics};
use backend_domain::ports::{DocumentStorage, NotificationDispatcher, NotificationEvent, StoredObject};
use backend_domain::{
    AnomalyKind,
    AppealDecision,
    AuditAction,
    DocumentStatus,
    DocumentType,
    EligibilityStatus,
    FactorCategory,
    ReviewAction,
    RiskLevel,
    Tenant,
};
use backend_infrastructure::{AppConfig, MemoryStore};

struct InlineStorage;

#[async_trait]
impl DocumentStorage for InlineStorage {
    async fn store(
        &self,
        file_name: &str,
        _content_type: &str,
        _bytes: &[u8],
    ) -> anyhow::Result<StoredObject> {
        Ok(StoredObject {
            url: format!("memory://{}", file_name),
        })
    }
}

struct FailingStorage;

#[async_trait]
impl DocumentStorage for FailingStorage {
    async fn store(
        &self,
        _file_name: &str,
        _content_type: &str,
        _bytes: &[u8],
    ) -> anyhow::Result<StoredObject> {
        Err(anyhow!("blob store offline"))
    }
}

struct SilentNotifier;

impl NotificationDispatcher for SilentNotifier {
    fn dispatch(&self, _event: NotificationEvent) {}
}

fn test_state_with_storage(storage: Arc<dyn DocumentStorage>) -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState {
        config: AppConfig::default().to_runtime_config(),
        tenant_repo: store.clone(),
        document_repo: store.clone(),
        review_repo: store.clone(),
        appeal_repo: store.clone(),
        alert_repo: store.clone(),
        audit_repo: store,
        document_storage: storage,
        notifier: Arc::new(SilentNotifier),
        metrics: Arc::new(Metrics::default()),
    }
}

fn test_state() -> AppState {
    test_state_with_storage(Arc::new(InlineStorage))
}

async fn register(state: &AppState, student_count: Option<u32>) -> Tenant {
    tenant_commands::register_tenant(state, "Test Institute".to_string(), student_count)
        .await
        .expect("register tenant")
}

fn upload(
    tenant: &Tenant,
    document_type: DocumentType,
) -> document_commands::SubmitDocumentRequest {
    document_commands::SubmitDocumentRequest {
        tenant_id: tenant.id,
        document_type,
        file_name: "scan.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: vec![0u8; 1024],
    }
}

async fn reject(state: &AppState, tenant: &Tenant) {
    review_commands::record_review(
        state,
        tenant.id,
        review_commands::ReviewRequest {
            action: ReviewAction::Reject,
            reviewer: "reviewer".to_string(),
            notes: "enrollment data could not be confirmed".to_string(),
            requested_types: Vec::new(),
        },
    )
    .await
    .expect("reject tenant");
}

#[tokio::test]
async fn first_submission_moves_pending_into_review() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;

    let document = document_commands::submit_document(&state, upload(&tenant, DocumentType::Accreditation))
        .await
        .expect("submit document");
    assert_eq!(document.status, DocumentStatus::Pending);

    let view = status_queries::verification_status(&state, tenant.id)
        .await
        .expect("status");
    assert_eq!(view.eligibility_status, EligibilityStatus::UnderReview);
    assert_eq!(view.documents.len(), 1);
}

#[tokio::test]
async fn oversized_upload_fails_validation_and_leaves_no_row() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;

    let mut request = upload(&tenant, DocumentType::Accreditation);
    request.bytes = vec![0u8; 11 * 1024 * 1024];

    let err = document_commands::submit_document(&state, request)
        .await
        .expect_err("11 MiB must fail");
    assert!(matches!(err, AppError::Validation(_)));

    let view = status_queries::verification_status(&state, tenant.id)
        .await
        .expect("status");
    assert!(view.documents.is_empty());
    assert_eq!(view.eligibility_status, EligibilityStatus::Pending);
}

#[tokio::test]
async fn storage_failure_aborts_without_a_document_row() {
    let state = test_state_with_storage(Arc::new(FailingStorage));
    let tenant = register(&state, Some(2_000)).await;

    let err = document_commands::submit_document(&state, upload(&tenant, DocumentType::Accreditation))
        .await
        .expect_err("storage failure must surface");
    assert!(matches!(err, AppError::Storage(_)));

    let view = status_queries::verification_status(&state, tenant.id)
        .await
        .expect("status");
    assert!(view.documents.is_empty());
}

#[tokio::test]
async fn resubmission_supersedes_the_previous_document() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;

    document_commands::submit_document(&state, upload(&tenant, DocumentType::Accreditation))
        .await
        .expect("first upload");
    document_commands::submit_document(&state, upload(&tenant, DocumentType::Accreditation))
        .await
        .expect("second upload");

    let all = state
        .document_repo
        .list_for_tenant(tenant.id)
        .await
        .expect("documents");
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter(|d| d.superseded).count(), 1);
    assert_eq!(all.iter().filter(|d| d.is_live()).count(), 1);
}

#[tokio::test]
async fn approval_settles_tenant_documents_and_audit_trail() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;
    document_commands::submit_document(&state, upload(&tenant, DocumentType::Accreditation))
        .await
        .expect("upload");

    let approved = review_commands::record_review(
        &state,
        tenant.id,
        review_commands::ReviewRequest {
            action: ReviewAction::Approve,
            reviewer: "reviewer".to_string(),
            notes: String::new(),
            requested_types: Vec::new(),
        },
    )
    .await
    .expect("approve");
    assert_eq!(approved.eligibility_status, EligibilityStatus::Approved);

    let documents = state
        .document_repo
        .list_for_tenant(tenant.id)
        .await
        .expect("documents");
    assert!(documents.iter().all(|d| d.status == DocumentStatus::Approved));

    let trail = state
        .audit_repo
        .scan_for_tenant(tenant.id)
        .await
        .expect("audit");
    let actions: Vec<_> = trail.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::TenantRegistered,
            AuditAction::DocumentSubmitted,
            AuditAction::ReviewRecorded,
        ]
    );
}

#[tokio::test]
async fn more_info_holds_until_every_requested_type_returns() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;
    document_commands::submit_document(&state, upload(&tenant, DocumentType::Accreditation))
        .await
        .expect("upload");

    review_commands::record_review(
        &state,
        tenant.id,
        review_commands::ReviewRequest {
            action: ReviewAction::RequestMoreInfo,
            reviewer: "reviewer".to_string(),
            notes: "enrollment data and ID samples are missing".to_string(),
            requested_types: vec![DocumentType::EnrollmentData, DocumentType::StudentIdSample],
        },
    )
    .await
    .expect("request more info");

    document_commands::submit_document(&state, upload(&tenant, DocumentType::EnrollmentData))
        .await
        .expect("partial resubmission");
    let view = status_queries::verification_status(&state, tenant.id)
        .await
        .expect("status");
    assert_eq!(view.eligibility_status, EligibilityStatus::RequiresMoreInfo);
    assert_eq!(view.outstanding_types, vec![DocumentType::StudentIdSample]);

    document_commands::submit_document(&state, upload(&tenant, DocumentType::StudentIdSample))
        .await
        .expect("final resubmission");
    let view = status_queries::verification_status(&state, tenant.id)
        .await
        .expect("status");
    assert_eq!(view.eligibility_status, EligibilityStatus::Pending);
    assert!(view.outstanding_types.is_empty());
}

#[tokio::test]
async fn terminal_tenants_reject_further_reviews() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;
    reject(&state, &tenant).await;

    let err = review_commands::record_review(
        &state,
        tenant.id,
        review_commands::ReviewRequest {
            action: ReviewAction::Approve,
            reviewer: "reviewer".to_string(),
            notes: String::new(),
            requested_types: Vec::new(),
        },
    )
    .await
    .expect_err("terminal tenant");
    assert!(matches!(err, AppError::Precondition(_)));
}

#[tokio::test]
async fn rejection_without_notes_fails_validation() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;

    let err = review_commands::record_review(
        &state,
        tenant.id,
        review_commands::ReviewRequest {
            action: ReviewAction::Reject,
            reviewer: "reviewer".to_string(),
            notes: "   ".to_string(),
            requested_types: Vec::new(),
        },
    )
    .await
    .expect_err("notes required");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn appeal_lifecycle_runs_from_rejection_to_overturn() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;
    reject(&state, &tenant).await;

    let reason = "Our enrollment records were audited independently and show well above the \
                  required student population."
        .to_string();

    let err = appeal_commands::open_appeal(&state, tenant.id, "too short".to_string(), Vec::new())
        .await
        .expect_err("short reason");
    assert!(matches!(err, AppError::Validation(_)));

    let appeal = appeal_commands::open_appeal(&state, tenant.id, reason.clone(), Vec::new())
        .await
        .expect("open appeal");

    let err = appeal_commands::open_appeal(&state, tenant.id, reason, Vec::new())
        .await
        .expect_err("duplicate open appeal");
    assert!(matches!(err, AppError::Precondition(_)));

    let appeal = appeal_commands::decide_appeal(
        &state,
        appeal.id,
        AppealDecision::MoreInfoRequested,
        "please attach the auditor's report".to_string(),
        "admin".to_string(),
    )
    .await
    .expect("request info");

    let appeal = appeal_commands::provide_appeal_info(&state, appeal.id, Vec::new())
        .await
        .expect("provide info");
    assert!(appeal.is_open());

    appeal_commands::decide_appeal(
        &state,
        appeal.id,
        AppealDecision::Approved,
        String::new(),
        "admin".to_string(),
    )
    .await
    .expect("grant appeal");

    let tenant = state.tenant_repo.get(tenant.id).await.expect("tenant");
    assert_eq!(tenant.eligibility_status, EligibilityStatus::Approved);
}

#[tokio::test]
async fn a_rejected_appeal_permits_exactly_one_successor() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;
    reject(&state, &tenant).await;

    let reason = "The rejection was based on an outdated document set which has since been \
                  replaced in full."
        .to_string();

    let first = appeal_commands::open_appeal(&state, tenant.id, reason.clone(), Vec::new())
        .await
        .expect("first appeal");
    appeal_commands::decide_appeal(
        &state,
        first.id,
        AppealDecision::Rejected,
        "supporting evidence was insufficient".to_string(),
        "admin".to_string(),
    )
    .await
    .expect("reject appeal");

    let tenant_row = state.tenant_repo.get(tenant.id).await.expect("tenant");
    assert_eq!(tenant_row.eligibility_status, EligibilityStatus::Rejected);

    let second = appeal_commands::open_appeal(&state, tenant.id, reason, Vec::new())
        .await
        .expect("successor appeal");
    assert!(second.is_open());

    let err = appeal_commands::decide_appeal(
        &state,
        first.id,
        AppealDecision::Approved,
        String::new(),
        "admin".to_string(),
    )
    .await
    .expect_err("closed appeal stays closed");
    assert!(matches!(err, AppError::Precondition(_)));
}

#[tokio::test]
async fn appeals_require_a_rejected_tenant() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;

    let reason = "x".repeat(60);
    let err = appeal_commands::open_appeal(&state, tenant.id, reason, Vec::new())
        .await
        .expect_err("pending tenant cannot appeal");
    assert!(matches!(err, AppError::Precondition(_)));
}

#[tokio::test]
async fn racing_reviews_commit_exactly_once() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;

    let approve_state = state.clone();
    let reject_state = state.clone();
    let tenant_id = tenant.id;

    let approve = tokio::spawn(async move {
        review_commands::record_review(
            &approve_state,
            tenant_id,
            review_commands::ReviewRequest {
                action: ReviewAction::Approve,
                reviewer: "first".to_string(),
                notes: String::new(),
                requested_types: Vec::new(),
            },
        )
        .await
    });
    let reject = tokio::spawn(async move {
        review_commands::record_review(
            &reject_state,
            tenant_id,
            review_commands::ReviewRequest {
                action: ReviewAction::Reject,
                reviewer: "second".to_string(),
                notes: "rejected in race".to_string(),
                requested_types: Vec::new(),
            },
        )
        .await
    });

    let outcomes = [
        approve.await.expect("task"),
        reject.await.expect("task"),
    ];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one transition may commit");

    let reviews = state
        .review_repo
        .list_for_tenant(tenant_id)
        .await
        .expect("reviews");
    assert_eq!(reviews.len(), 1);

    let tenant = state.tenant_repo.get(tenant_id).await.expect("tenant");
    assert!(tenant.eligibility_status.is_terminal());
}

#[tokio::test]
async fn risk_assessment_flags_small_institutions_and_logs_the_run() {
    let state = test_state();
    let tenant = register(&state, Some(1_000)).await;

    let assessment = risk_queries::assess_risk(&state, tenant.id)
        .await
        .expect("assess");
    assert!((0.0..=1.0).contains(&assessment.risk_score));

    let student_factor = assessment
        .factors
        .iter()
        .find(|f| f.category == FactorCategory::StudentCount)
        .expect("student factor");
    assert_eq!(student_factor.score, 0.2);
    assert_eq!(student_factor.severity, RiskLevel::High);

    let trail = state
        .audit_repo
        .scan_for_tenant(tenant.id)
        .await
        .expect("audit");
    assert!(trail.iter().any(|e| e.action == AuditAction::RiskAssessed));
}

#[tokio::test]
async fn attached_analysis_feeds_the_quality_factor() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;
    let document =
        document_commands::submit_document(&state, upload(&tenant, DocumentType::Accreditation))
            .await
            .expect("upload");

    state
        .document_repo
        .attach_analysis(
            document.id,
            backend_domain::DocumentAnalysis {
                authenticity_score: 0.9,
                completeness_score: 0.9,
            },
        )
        .await
        .expect("attach analysis");

    let assessment = risk_queries::assess_risk(&state, tenant.id)
        .await
        .expect("assess");
    let quality = assessment
        .factors
        .iter()
        .find(|f| f.category == FactorCategory::DocumentQuality)
        .expect("quality factor");
    assert_eq!(quality.score, 1.0);
    assert_eq!(quality.severity, RiskLevel::Low);
}

#[tokio::test]
async fn prediction_uses_the_default_baseline_without_history() {
    let state = test_state();
    let tenant = register(&state, Some(2_000)).await;

    let prediction = prediction_queries::predict_processing_time(&state, tenant.id)
        .await
        .expect("predict");
    // round(5 days x 1.1 unanalyzed multiplier)
    assert_eq!(prediction.estimated_days, 6);
    assert!((prediction.confidence - 0.75).abs() < f64::EPSILON);
    assert!(prediction.range_min_days >= 1);
    assert!(prediction.range_max_days >= prediction.estimated_days);
}

#[tokio::test]
async fn detection_raises_alerts_once_per_day() {
    let state = test_state();

    // Ten rejections and ten registrations on the same day dwarf the
    // 30-day daily averages, tripping both the spike and surge checks.
    for _ in 0..10 {
        let tenant = register(&state, Some(2_000)).await;
        reject(&state, &tenant).await;
    }

    let now = Utc::now();
    let alerts = detection_commands::run_detection(&state, now)
        .await
        .expect("first run");
    let kinds: Vec<_> = alerts.iter().map(|a| a.kind).collect();
    assert!(kinds.contains(&AnomalyKind::RejectionSpike));
    assert!(kinds.contains(&AnomalyKind::ApplicationSurge));

    let replay = detection_commands::run_detection(&state, now)
        .await
        .expect("second run");
    assert!(replay.is_empty(), "same-day rerun must not duplicate alerts");

    let outstanding = state
        .alert_repo
        .list(Some(false))
        .await
        .expect("outstanding");
    assert_eq!(outstanding.len(), alerts.len());

    detection_commands::acknowledge_alert(&state, outstanding[0].id)
        .await
        .expect("first ack");
    detection_commands::acknowledge_alert(&state, outstanding[0].id)
        .await
        .expect("double ack is a no-op");

    let outstanding = state
        .alert_repo
        .list(Some(false))
        .await
        .expect("outstanding after ack");
    assert_eq!(outstanding.len(), alerts.len() - 1);
}
