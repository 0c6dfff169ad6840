// Lifecycle status value objects

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    RequiresMoreInfo,
}

impl EligibilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityStatus::Pending => "PENDING",
            EligibilityStatus::UnderReview => "UNDER_REVIEW",
            EligibilityStatus::Approved => "APPROVED",
            EligibilityStatus::Rejected => "REJECTED",
            EligibilityStatus::RequiresMoreInfo => "REQUIRES_MORE_INFO",
        }
    }

    // Approved and Rejected admit no further review; Rejected still
    // carries the appeal sub-lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EligibilityStatus::Approved | EligibilityStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "PENDING",
            DocumentStatus::UnderReview => "UNDER_REVIEW",
            DocumentStatus::Approved => "APPROVED",
            DocumentStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewAction {
    Approve,
    Reject,
    RequestMoreInfo,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "APPROVE",
            ReviewAction::Reject => "REJECT",
            ReviewAction::RequestMoreInfo => "REQUEST_MORE_INFO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppealStatus {
    Pending,
    Approved,
    Rejected,
    MoreInfoRequested,
}

impl AppealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppealStatus::Pending => "PENDING",
            AppealStatus::Approved => "APPROVED",
            AppealStatus::Rejected => "REJECTED",
            AppealStatus::MoreInfoRequested => "MORE_INFO_REQUESTED",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, AppealStatus::Pending | AppealStatus::MoreInfoRequested)
    }
}

// Admin decision on an open appeal. Pending is not a decision, so this is
// narrower than AppealStatus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppealDecision {
    Approved,
    Rejected,
    MoreInfoRequested,
}

impl AppealDecision {
    pub fn target_status(&self) -> AppealStatus {
        match self {
            AppealDecision::Approved => AppealStatus::Approved,
            AppealDecision::Rejected => AppealStatus::Rejected,
            AppealDecision::MoreInfoRequested => AppealStatus::MoreInfoRequested,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppealDecision::Approved => "APPROVED",
            AppealDecision::Rejected => "REJECTED",
            AppealDecision::MoreInfoRequested => "MORE_INFO_REQUESTED",
        }
    }
}
