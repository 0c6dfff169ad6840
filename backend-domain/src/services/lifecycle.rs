// Verification lifecycle rules
// Every legal edge for eligibility, appeal and document state lives here;
// command handlers load state, ask these functions, and commit the answer.

use thiserror::Error;

use crate::value_objects::{
    AppealDecision,
    AppealStatus,
    DocumentType,
    EligibilityStatus,
    ReviewAction,
};

pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;
pub const MIN_APPEAL_REASON_CHARS: usize = 50;

pub const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
];

#[derive(Debug, Error)]
pub enum RuleViolation {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Precondition(String),
}

pub fn validate_document_upload(size_bytes: u64, content_type: &str) -> Result<(), RuleViolation> {
    if size_bytes > MAX_DOCUMENT_BYTES {
        return Err(RuleViolation::Validation(
            "file size exceeds the 10 MiB limit".to_string(),
        ));
    }
    let normalized = content_type.trim().to_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&normalized.as_str()) {
        return Err(RuleViolation::Validation(format!(
            "unsupported content type '{}', allowed: PDF, JPEG, PNG, WEBP",
            content_type
        )));
    }
    Ok(())
}

pub fn submission_guard(current: EligibilityStatus) -> Result<(), RuleViolation> {
    if current == EligibilityStatus::Approved {
        return Err(RuleViolation::Precondition(
            "institution is already verified".to_string(),
        ));
    }
    Ok(())
}

// Status edge fired by a document submission, if any.
//
// A first submission moves PENDING applications into review. A tenant sent
// back for more information returns to PENDING only once every requested
// type has been resubmitted; until then the status holds.
pub fn submission_transition(
    current: EligibilityStatus,
    outstanding_resubmissions: bool,
) -> Option<EligibilityStatus> {
    match current {
        EligibilityStatus::Pending => Some(EligibilityStatus::UnderReview),
        EligibilityStatus::RequiresMoreInfo if !outstanding_resubmissions => {
            Some(EligibilityStatus::Pending)
        }
        _ => None,
    }
}

pub fn validate_review_notes(action: ReviewAction, notes: &str) -> Result<(), RuleViolation> {
    if action != ReviewAction::Approve && notes.trim().is_empty() {
        return Err(RuleViolation::Validation(
            "review notes are required for non-approval actions".to_string(),
        ));
    }
    Ok(())
}

pub fn review_transition(
    current: EligibilityStatus,
    action: ReviewAction,
) -> Result<EligibilityStatus, RuleViolation> {
    if current.is_terminal() {
        return Err(RuleViolation::Precondition(format!(
            "institution is already {}",
            current.as_str()
        )));
    }
    Ok(match action {
        ReviewAction::Approve => EligibilityStatus::Approved,
        ReviewAction::Reject => EligibilityStatus::Rejected,
        ReviewAction::RequestMoreInfo => EligibilityStatus::RequiresMoreInfo,
    })
}

pub fn appeal_open_guard(
    current: EligibilityStatus,
    has_open_appeal: bool,
    reason: &str,
) -> Result<(), RuleViolation> {
    if reason.trim().chars().count() < MIN_APPEAL_REASON_CHARS {
        return Err(RuleViolation::Validation(format!(
            "appeal reason must be at least {} characters",
            MIN_APPEAL_REASON_CHARS
        )));
    }
    if current != EligibilityStatus::Rejected {
        return Err(RuleViolation::Precondition(
            "appeals can only be opened for rejected institutions".to_string(),
        ));
    }
    if has_open_appeal {
        return Err(RuleViolation::Precondition(
            "an open appeal already exists for this institution".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_appeal_notes(decision: AppealDecision, notes: &str) -> Result<(), RuleViolation> {
    if decision != AppealDecision::Approved && notes.trim().is_empty() {
        return Err(RuleViolation::Validation(
            "review notes are required for non-approval decisions".to_string(),
        ));
    }
    Ok(())
}

pub fn appeal_decision_transition(
    current: AppealStatus,
    decision: AppealDecision,
) -> Result<AppealStatus, RuleViolation> {
    if !current.is_open() {
        return Err(RuleViolation::Precondition(
            "this appeal has already been reviewed".to_string(),
        ));
    }
    Ok(decision.target_status())
}

// Tenant-side resubmission of requested information on an appeal.
pub fn appeal_info_transition(current: AppealStatus) -> Result<AppealStatus, RuleViolation> {
    if current != AppealStatus::MoreInfoRequested {
        return Err(RuleViolation::Precondition(
            "this appeal is not waiting for additional information".to_string(),
        ));
    }
    Ok(AppealStatus::Pending)
}

// Requested types with no fresh submission yet.
pub fn outstanding_requested_types(
    requested: &[DocumentType],
    resubmitted: &[DocumentType],
) -> Vec<DocumentType> {
    requested
        .iter()
        .copied()
        .filter(|t| !resubmitted.contains(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_upload_is_rejected() {
        let err = validate_document_upload(11 * 1024 * 1024, "application/pdf")
            .expect_err("11 MiB must fail");
        assert!(matches!(err, RuleViolation::Validation(_)));
    }

    #[test]
    fn unsupported_content_type_is_rejected() {
        let err =
            validate_document_upload(1024, "image/gif").expect_err("gif must fail");
        assert!(matches!(err, RuleViolation::Validation(_)));
        validate_document_upload(1024, "image/webp").expect("webp allowed");
        validate_document_upload(MAX_DOCUMENT_BYTES, "application/pdf").expect("exact limit allowed");
    }

    #[test]
    fn review_edges_follow_the_transition_table() {
        assert_eq!(
            review_transition(EligibilityStatus::UnderReview, ReviewAction::Approve)
                .expect("approve"),
            EligibilityStatus::Approved
        );
        assert_eq!(
            review_transition(EligibilityStatus::UnderReview, ReviewAction::Reject)
                .expect("reject"),
            EligibilityStatus::Rejected
        );
        assert_eq!(
            review_transition(EligibilityStatus::RequiresMoreInfo, ReviewAction::Approve)
                .expect("direct approve"),
            EligibilityStatus::Approved
        );
    }

    #[test]
    fn terminal_states_admit_no_review() {
        for status in [EligibilityStatus::Approved, EligibilityStatus::Rejected] {
            let err = review_transition(status, ReviewAction::Approve)
                .expect_err("terminal state must fail");
            assert!(matches!(err, RuleViolation::Precondition(_)));
        }
    }

    #[test]
    fn non_approval_reviews_require_notes() {
        let err = validate_review_notes(ReviewAction::Reject, "  ")
            .expect_err("empty notes on reject");
        assert!(matches!(err, RuleViolation::Validation(_)));
        validate_review_notes(ReviewAction::Approve, "").expect("approve without notes");
    }

    #[test]
    fn first_submission_moves_pending_into_review() {
        assert_eq!(
            submission_transition(EligibilityStatus::Pending, false),
            Some(EligibilityStatus::UnderReview)
        );
        assert_eq!(submission_transition(EligibilityStatus::UnderReview, false), None);
    }

    #[test]
    fn more_info_returns_to_pending_only_when_nothing_is_outstanding() {
        assert_eq!(
            submission_transition(EligibilityStatus::RequiresMoreInfo, true),
            None
        );
        assert_eq!(
            submission_transition(EligibilityStatus::RequiresMoreInfo, false),
            Some(EligibilityStatus::Pending)
        );
    }

    #[test]
    fn appeal_requires_rejected_status_and_a_long_reason() {
        let reason = "x".repeat(MIN_APPEAL_REASON_CHARS);
        let err = appeal_open_guard(EligibilityStatus::UnderReview, false, &reason)
            .expect_err("non-rejected tenant");
        assert!(matches!(err, RuleViolation::Precondition(_)));

        let err = appeal_open_guard(EligibilityStatus::Rejected, false, "too short")
            .expect_err("short reason");
        assert!(matches!(err, RuleViolation::Validation(_)));

        let err = appeal_open_guard(EligibilityStatus::Rejected, true, &reason)
            .expect_err("duplicate open appeal");
        assert!(matches!(err, RuleViolation::Precondition(_)));

        appeal_open_guard(EligibilityStatus::Rejected, false, &reason).expect("valid appeal");
    }

    #[test]
    fn decided_appeals_cannot_be_decided_again() {
        let err = appeal_decision_transition(AppealStatus::Approved, AppealDecision::Rejected)
            .expect_err("already decided");
        assert!(matches!(err, RuleViolation::Precondition(_)));

        assert_eq!(
            appeal_decision_transition(AppealStatus::MoreInfoRequested, AppealDecision::Approved)
                .expect("more-info appeal can be decided"),
            AppealStatus::Approved
        );
    }

    #[test]
    fn appeal_info_only_applies_to_more_info_requests() {
        assert_eq!(
            appeal_info_transition(AppealStatus::MoreInfoRequested).expect("resubmission"),
            AppealStatus::Pending
        );
        let err = appeal_info_transition(AppealStatus::Pending).expect_err("pending appeal");
        assert!(matches!(err, RuleViolation::Precondition(_)));
    }

    #[test]
    fn outstanding_types_are_the_unresubmitted_ones() {
        let requested = [DocumentType::Accreditation, DocumentType::EnrollmentData];
        let resubmitted = [DocumentType::Accreditation];
        assert_eq!(
            outstanding_requested_types(&requested, &resubmitted),
            vec![DocumentType::EnrollmentData]
        );
        assert!(outstanding_requested_types(&[], &resubmitted).is_empty());
    }
}
