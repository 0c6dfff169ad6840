// Processing-time prediction
// Trailing average over recent approvals, adjusted by how much of the
// document set is in and whether any of it has been analyzed.

use crate::entities::{
    PredictionFactor,
    PredictionFactorCategory,
    ProcessingTimePrediction,
    Tenant,
    VerificationDocument,
};
use crate::value_objects::REQUIRED_DOCUMENT_TYPES;

// Baseline when no application was approved in the trailing window.
pub const DEFAULT_PROCESSING_DAYS: f64 = 5.0;

pub fn average_processing_days(approved: &[Tenant]) -> f64 {
    if approved.is_empty() {
        return DEFAULT_PROCESSING_DAYS;
    }
    let total: i64 = approved.iter().map(|t| t.processing_days()).sum();
    (total as f64 / approved.len() as f64).round()
}

pub fn predict(base_days: f64, documents: &[VerificationDocument]) -> ProcessingTimePrediction {
    let doc_count = documents.len();
    let required_total = REQUIRED_DOCUMENT_TYPES.len();

    let completeness_multiplier = if doc_count >= required_total {
        0.9
    } else {
        0.6 + 0.06 * doc_count as f64
    };

    let analyzed = documents.iter().any(|d| d.analysis.is_some());
    // Unanalyzed documents are assumed to add review time.
    let quality_multiplier = if analyzed { 0.9 } else { 1.1 };

    let factors = vec![
        PredictionFactor {
            category: PredictionFactorCategory::DocumentCompleteness,
            impact: completeness_multiplier - 0.5,
            description: if doc_count >= required_total {
                "all required documents submitted".to_string()
            } else {
                format!("{} documents still required", required_total - doc_count)
            },
        },
        PredictionFactor {
            category: PredictionFactorCategory::DocumentQualityAnalysis,
            impact: quality_multiplier - 1.0,
            description: if analyzed {
                "documents have been analyzed".to_string()
            } else {
                "pending document analysis".to_string()
            },
        },
    ];

    let estimate = (base_days * quality_multiplier).round();
    let confidence = (0.75 + 0.03 * doc_count as f64).min(0.95);

    ProcessingTimePrediction {
        estimated_days: estimate as u32,
        confidence,
        range_min_days: (estimate * 0.6).round().max(1.0) as u32,
        range_max_days: (estimate * 1.4).round() as u32,
        factors,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::value_objects::DocumentType;

    fn approved_tenant(days: i64) -> Tenant {
        let now = Utc::now();
        let mut tenant = Tenant::register("Test Institute".to_string(), Some(2_000), now);
        tenant.updated_at = now + Duration::days(days);
        tenant
    }

    fn document(document_type: DocumentType) -> VerificationDocument {
        VerificationDocument::submitted(
            crate::value_objects::TenantId::generate(),
            document_type,
            "scan.pdf".to_string(),
            "/uploads/scan.pdf".to_string(),
            "application/pdf".to_string(),
            1024,
            Utc::now(),
        )
    }

    #[test]
    fn base_estimate_defaults_without_recent_approvals() {
        assert_eq!(average_processing_days(&[]), DEFAULT_PROCESSING_DAYS);
    }

    #[test]
    fn base_estimate_is_the_rounded_mean_of_approvals() {
        let approved = vec![approved_tenant(3), approved_tenant(6)];
        assert_eq!(average_processing_days(&approved), 5.0);
    }

    #[test]
    fn unanalyzed_documents_lengthen_the_estimate() {
        let prediction = predict(5.0, &[document(DocumentType::Accreditation)]);
        assert_eq!(prediction.estimated_days, 6);
        assert_eq!(prediction.range_min_days, 4);
        assert_eq!(prediction.range_max_days, 8);
    }

    #[test]
    fn analyzed_documents_shorten_the_estimate() {
        let mut doc = document(DocumentType::Accreditation);
        doc.analysis = Some(crate::entities::DocumentAnalysis {
            authenticity_score: 0.9,
            completeness_score: 0.9,
        });
        let prediction = predict(10.0, &[doc]);
        assert_eq!(prediction.estimated_days, 9);
    }

    #[test]
    fn confidence_grows_with_documents_and_caps() {
        let none = predict(5.0, &[]);
        assert!((none.confidence - 0.75).abs() < f64::EPSILON);

        let docs: Vec<_> = (0..10).map(|_| document(DocumentType::Other)).collect();
        let many = predict(5.0, &docs);
        assert!((many.confidence - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn completeness_is_reported_as_a_factor() {
        let prediction = predict(5.0, &[document(DocumentType::Accreditation)]);
        let factor = prediction
            .factors
            .iter()
            .find(|f| f.category == PredictionFactorCategory::DocumentCompleteness)
            .expect("completeness factor");
        assert!(factor.description.contains("4 documents still required"));
    }

    #[test]
    fn range_floor_never_drops_below_one_day() {
        let prediction = predict(1.0, &[]);
        assert!(prediction.range_min_days >= 1);
    }
}
