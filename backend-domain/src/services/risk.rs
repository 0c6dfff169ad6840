// Rejection-risk scoring
// Pure over its inputs: callers load a snapshot (tenant, live documents,
// comparable tenants) and get the same assessment for the same snapshot.

use chrono::{DateTime, Utc};

use crate::entities::{
    FactorCategory,
    RiskAssessment,
    RiskFactor,
    Tenant,
    VerificationDocument,
};
use crate::value_objects::{DocumentStatus, RiskLevel, REQUIRED_DOCUMENT_TYPES};

pub const STUDENT_COUNT_THRESHOLD: u32 = 1_500;
const STUDENT_COUNT_TARGET: f64 = 3_000.0;
// Comparable institutions are within this many students of the applicant.
pub const PEER_STUDENT_RADIUS: u32 = 500;
// Stand-in score when a factor has no data to judge from.
const NEUTRAL_SCORE: f64 = 0.5;

// The four factors are averaged unweighted on purpose: each is treated as
// an equally important signal until the review history says otherwise.
pub fn assess(
    tenant: &Tenant,
    documents: &[VerificationDocument],
    peers: &[Tenant],
    now: DateTime<Utc>,
) -> RiskAssessment {
    let factors = vec![
        completeness_factor(documents),
        quality_factor(documents),
        historical_factor(peers),
        student_count_factor(tenant.student_count),
    ];

    let risk_score = factors.iter().map(|f| f.score).sum::<f64>() / factors.len() as f64;
    let risk_level = level_for(risk_score);
    let recommendations = recommendations_for(&factors, risk_level);

    RiskAssessment {
        tenant_id: tenant.id,
        risk_score,
        risk_level,
        factors,
        recommendations,
        processed_at: now,
    }
}

pub fn level_for(score: f64) -> RiskLevel {
    if score >= 0.7 {
        RiskLevel::Low
    } else if score >= 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn completeness_factor(documents: &[VerificationDocument]) -> RiskFactor {
    let required_total = REQUIRED_DOCUMENT_TYPES.len();
    let present = REQUIRED_DOCUMENT_TYPES
        .iter()
        .filter(|t| documents.iter().any(|d| d.document_type == **t))
        .count();
    let approved = documents
        .iter()
        .filter(|d| d.status == DocumentStatus::Approved)
        .count();

    let completion = present as f64 / required_total as f64;
    let approved_fraction = if documents.is_empty() {
        0.0
    } else {
        approved as f64 / documents.len() as f64
    };
    let score = completion * 0.7 + approved_fraction * 0.3;

    let severity = if score >= 0.8 {
        RiskLevel::Low
    } else if score >= 0.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    RiskFactor {
        category: FactorCategory::DocumentCompleteness,
        score,
        severity,
        description: format!(
            "{}/{} required documents submitted, {} approved",
            present, required_total, approved
        ),
    }
}

fn quality_factor(documents: &[VerificationDocument]) -> RiskFactor {
    let analyzed: Vec<_> = documents.iter().filter(|d| d.analysis.is_some()).collect();
    let high_quality = analyzed
        .iter()
        .filter(|d| d.analysis.map(|a| a.meets_quality_bar()).unwrap_or(false))
        .count();

    let score = if analyzed.is_empty() {
        NEUTRAL_SCORE
    } else {
        high_quality as f64 / analyzed.len() as f64
    };

    RiskFactor {
        category: FactorCategory::DocumentQuality,
        score,
        severity: level_for(score),
        description: format!(
            "{}/{} analyzed documents meet quality standards",
            high_quality,
            analyzed.len()
        ),
    }
}

fn historical_factor(peers: &[Tenant]) -> RiskFactor {
    if peers.is_empty() {
        return RiskFactor {
            category: FactorCategory::HistoricalPattern,
            score: NEUTRAL_SCORE,
            severity: RiskLevel::Medium,
            description: "no comparable institutions found".to_string(),
        };
    }

    let approved = peers
        .iter()
        .filter(|t| t.eligibility_status == crate::value_objects::EligibilityStatus::Approved)
        .count();
    let approval_rate = approved as f64 / peers.len() as f64;

    RiskFactor {
        category: FactorCategory::HistoricalPattern,
        score: approval_rate,
        severity: level_for(approval_rate),
        description: format!(
            "{:.0}% approval rate across {} comparable institutions",
            approval_rate * 100.0,
            peers.len()
        ),
    }
}

fn student_count_factor(student_count: Option<u32>) -> RiskFactor {
    let count = student_count.unwrap_or(0);
    if count < STUDENT_COUNT_THRESHOLD {
        // Flat floor: how far below the threshold does not matter.
        return RiskFactor {
            category: FactorCategory::StudentCount,
            score: 0.2,
            severity: RiskLevel::High,
            description: format!(
                "student count {} is below the {} threshold",
                count, STUDENT_COUNT_THRESHOLD
            ),
        };
    }

    RiskFactor {
        category: FactorCategory::StudentCount,
        score: (count as f64 / STUDENT_COUNT_TARGET).min(1.0),
        severity: RiskLevel::Low,
        description: format!(
            "student count {} meets the {}+ requirement",
            count, STUDENT_COUNT_THRESHOLD
        ),
    }
}

fn recommendations_for(factors: &[RiskFactor], level: RiskLevel) -> Vec<String> {
    let mut recommendations = Vec::new();

    let severity_of = |category: FactorCategory| {
        factors
            .iter()
            .find(|f| f.category == category)
            .map(|f| f.severity)
    };

    if severity_of(FactorCategory::DocumentCompleteness) != Some(RiskLevel::Low) {
        recommendations
            .push("Upload all required documents to improve approval chances".to_string());
    }
    if severity_of(FactorCategory::DocumentQuality) != Some(RiskLevel::Low) {
        recommendations.push("Ensure uploaded documents are clear and legible".to_string());
        recommendations.push("Avoid submitting blurry or cropped documents".to_string());
    }
    if severity_of(FactorCategory::StudentCount) != Some(RiskLevel::Low) {
        recommendations.push("Provide audited enrollment data showing 1500+ students".to_string());
        recommendations.push("Include official student records with photos".to_string());
    }
    if level == RiskLevel::High {
        recommendations
            .push("Contact support for guidance on completing verification".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DocumentAnalysis;
    use crate::value_objects::{DocumentType, EligibilityStatus};

    fn tenant_with_count(count: Option<u32>) -> Tenant {
        Tenant::register("Test Institute".to_string(), count, Utc::now())
    }

    fn document(document_type: DocumentType, status: DocumentStatus) -> VerificationDocument {
        let mut doc = VerificationDocument::submitted(
            crate::value_objects::TenantId::generate(),
            document_type,
            "scan.pdf".to_string(),
            "/uploads/scan.pdf".to_string(),
            "application/pdf".to_string(),
            1024,
            Utc::now(),
        );
        doc.status = status;
        doc
    }

    fn approved_peer(count: u32) -> Tenant {
        let mut peer = tenant_with_count(Some(count));
        peer.eligibility_status = EligibilityStatus::Approved;
        peer
    }

    #[test]
    fn score_stays_in_range_with_no_documents() {
        let assessment = assess(&tenant_with_count(None), &[], &[], Utc::now());
        assert!((0.0..=1.0).contains(&assessment.risk_score));
        assert_eq!(assessment.factors.len(), 4);
        for factor in &assessment.factors {
            assert!((0.0..=1.0).contains(&factor.score));
        }
    }

    #[test]
    fn below_threshold_student_count_scores_a_flat_floor() {
        for count in [0, 1, 700, 1_499] {
            let assessment =
                assess(&tenant_with_count(Some(count)), &[], &[], Utc::now());
            let factor = assessment
                .factors
                .iter()
                .find(|f| f.category == FactorCategory::StudentCount)
                .expect("student factor");
            assert_eq!(factor.score, 0.2);
            assert_eq!(factor.severity, RiskLevel::High);
        }
    }

    #[test]
    fn student_count_scales_toward_the_target_above_threshold() {
        let assessment = assess(&tenant_with_count(Some(1_500)), &[], &[], Utc::now());
        let factor = &assessment.factors[3];
        assert_eq!(factor.score, 0.5);

        let assessment = assess(&tenant_with_count(Some(6_000)), &[], &[], Utc::now());
        assert_eq!(assessment.factors[3].score, 1.0);
    }

    #[test]
    fn quality_factor_defaults_neutral_without_analysis() {
        let docs = vec![document(DocumentType::Accreditation, DocumentStatus::Pending)];
        let assessment = assess(&tenant_with_count(Some(2_000)), &docs, &[], Utc::now());
        let factor = &assessment.factors[1];
        assert_eq!(factor.score, 0.5);
    }

    #[test]
    fn quality_factor_counts_documents_meeting_both_bars() {
        let mut good = document(DocumentType::Accreditation, DocumentStatus::Pending);
        good.analysis = Some(DocumentAnalysis {
            authenticity_score: 0.9,
            completeness_score: 0.85,
        });
        let mut poor = document(DocumentType::Approval, DocumentStatus::Pending);
        poor.analysis = Some(DocumentAnalysis {
            authenticity_score: 0.9,
            completeness_score: 0.5,
        });

        let assessment = assess(
            &tenant_with_count(Some(2_000)),
            &[good, poor],
            &[],
            Utc::now(),
        );
        assert_eq!(assessment.factors[1].score, 0.5);
    }

    #[test]
    fn historical_factor_defaults_neutral_without_peers() {
        let assessment = assess(&tenant_with_count(Some(2_000)), &[], &[], Utc::now());
        assert_eq!(assessment.factors[2].score, 0.5);
    }

    #[test]
    fn historical_factor_is_the_peer_approval_rate() {
        let peers = vec![
            approved_peer(2_100),
            approved_peer(1_900),
            tenant_with_count(Some(2_050)),
            tenant_with_count(Some(1_950)),
        ];
        let assessment = assess(&tenant_with_count(Some(2_000)), &[], &peers, Utc::now());
        assert_eq!(assessment.factors[2].score, 0.5);
    }

    #[test]
    fn full_documentation_and_strong_peers_score_low_risk() {
        let docs: Vec<_> = REQUIRED_DOCUMENT_TYPES
            .iter()
            .map(|t| {
                let mut doc = document(*t, DocumentStatus::Approved);
                doc.analysis = Some(DocumentAnalysis {
                    authenticity_score: 0.95,
                    completeness_score: 0.9,
                });
                doc
            })
            .collect();
        let peers = vec![approved_peer(2_900), approved_peer(3_100)];
        let assessment = assess(&tenant_with_count(Some(3_000)), &docs, &peers, Utc::now());
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn high_risk_assessments_point_at_support() {
        let assessment = assess(&tenant_with_count(Some(100)), &[], &[], Utc::now());
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("Contact support")));
    }

    #[test]
    fn level_thresholds_match_the_documented_bands() {
        assert_eq!(level_for(0.7), RiskLevel::Low);
        assert_eq!(level_for(0.69), RiskLevel::Medium);
        assert_eq!(level_for(0.4), RiskLevel::Medium);
        assert_eq!(level_for(0.39), RiskLevel::High);
    }
}
