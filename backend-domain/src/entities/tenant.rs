// Tenant entity
// An institution moving through eligibility verification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EligibilityStatus, TenantId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub student_count: Option<u32>,
    pub eligibility_status: EligibilityStatus,
    pub eligibility_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Optimistic concurrency token, bumped on every committed transition.
    pub version: u64,
}

impl Tenant {
    pub fn register(name: String, student_count: Option<u32>, now: DateTime<Utc>) -> Self {
        Self {
            id: TenantId::generate(),
            name,
            student_count,
            eligibility_status: EligibilityStatus::Pending,
            eligibility_deadline: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    // Days from registration to the last state change, rounded up.
    // For an approved tenant this is the time-to-decision.
    pub fn processing_days(&self) -> i64 {
        let seconds = (self.updated_at - self.created_at).num_seconds().max(0);
        (seconds + 86_399) / 86_400
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn processing_days_rounds_up_partial_days() {
        let now = Utc::now();
        let mut tenant = Tenant::register("Test Institute".to_string(), Some(2000), now);
        tenant.updated_at = now + Duration::hours(25);
        assert_eq!(tenant.processing_days(), 2);
    }

    #[test]
    fn processing_days_is_zero_at_registration() {
        let now = Utc::now();
        let tenant = Tenant::register("Test Institute".to_string(), None, now);
        assert_eq!(tenant.processing_days(), 0);
    }
}
