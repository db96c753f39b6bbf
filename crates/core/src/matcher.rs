//! Specialty classification and doctor selection.
//!
//! Two selection modes exist and are kept apart on purpose:
//!
//! - [`select_least_loaded`] is used at ingestion time. It ignores busy state, falls back to
//!   [`DEFAULT_SPECIALTY`], and balances load by the attended counter.
//! - [`available_for`] is used by interactive assignment. It lists only free doctors of the
//!   exact specialty, without fallback, and leaves the final choice to the caller.

use crate::constants::DEFAULT_SPECIALTY;
use crate::doctor::Doctor;
use crate::doctor_registry::DoctorRegistry;
use clinic_types::DoctorId;

/// Patients younger than this are routed to Pediatrics unless an earlier rule fires.
pub const PEDIATRIC_AGE_LIMIT: u32 = 12;

enum Rule {
    Keywords(&'static [&'static str], &'static str),
    YoungerThan(u32, &'static str),
}

// Evaluated top to bottom, first match wins. The age rule sits third: cardiac and
// orthopaedic complaints outrank it, everything else does not.
const RULES: &[Rule] = &[
    Rule::Keywords(
        &["heart", "cardiac", "chest pain", "blood pressure", "cholesterol"],
        "Cardiology",
    ),
    Rule::Keywords(
        &["bone", "fracture", "arthritis", "shoulder", "back", "knee"],
        "Orthopedics",
    ),
    Rule::YoungerThan(PEDIATRIC_AGE_LIMIT, "Pediatrics"),
    Rule::Keywords(
        &["lung", "respiratory", "breathing", "pneumonia", "screening"],
        "Pulmonology",
    ),
    Rule::Keywords(
        &["brain", "neurological", "headache", "migraine", "memory", "nerve"],
        "Neurology",
    ),
    Rule::Keywords(&["cancer", "tumor", "oncology"], "Oncology"),
    Rule::Keywords(&["child", "kid", "chicken pox", "vaccination"], "Pediatrics"),
    Rule::Keywords(&["skin", "psoriasis", "allergy"], "Dermatology"),
    Rule::Keywords(&["stomach", "ulcer", "digestive"], "Gastroenterology"),
    Rule::Keywords(&["mental", "psychiatric", "health"], "Psychiatry"),
    Rule::Keywords(&["thyroid", "diabetes"], "Endocrinology"),
    Rule::Keywords(&["kidney", "renal"], "Nephrology"),
    Rule::Keywords(&["joint", "inflammation"], "Rheumatology"),
    Rule::Keywords(&["female", "pregnancy"], "Gynecology"),
    Rule::Keywords(&["prostate", "urinary"], "Urology"),
    Rule::Keywords(&["hypertension", "fatigue", "fever"], DEFAULT_SPECIALTY),
];

/// Suggests a specialty for a disease description and patient age.
///
/// Keyword matching is case-insensitive and works on substrings, so "Chronic Fever" matches
/// "fever". Anything unmatched goes to [`DEFAULT_SPECIALTY`].
pub fn classify(disease: &str, age: u32) -> &'static str {
    let disease = disease.to_lowercase();
    RULES
        .iter()
        .find_map(|rule| match rule {
            Rule::Keywords(keywords, specialty) => keywords
                .iter()
                .any(|k| disease.contains(k))
                .then_some(*specialty),
            Rule::YoungerThan(limit, specialty) => (age < *limit).then_some(*specialty),
        })
        .unwrap_or(DEFAULT_SPECIALTY)
}

fn least_loaded<'a>(candidates: impl Iterator<Item = &'a Doctor>) -> Option<DoctorId> {
    // min_by_key keeps the last of equal keys; fold keeps the first.
    candidates
        .fold(None::<&Doctor>, |best, doctor| match best {
            Some(b) if b.patients_attended() <= doctor.patients_attended() => Some(b),
            _ => Some(doctor),
        })
        .map(|d| d.id)
}

/// Picks the doctor of `specialty` with the fewest patients attended, ignoring busy state.
///
/// When no doctor practises `specialty`, the same rule is applied to the
/// [`DEFAULT_SPECIALTY`] pool. Ties go to the earliest-registered doctor. Returns `None`
/// when both pools are empty.
pub fn select_least_loaded(registry: &DoctorRegistry, specialty: &str) -> Option<DoctorId> {
    let pool = |wanted: &str| {
        registry
            .iter()
            .filter(|d| d.practises(wanted))
            .collect::<Vec<_>>()
    };

    let mut candidates = pool(specialty);
    if candidates.is_empty() && specialty != DEFAULT_SPECIALTY {
        tracing::debug!(
            "no doctor practises {}, falling back to {}",
            specialty,
            DEFAULT_SPECIALTY
        );
        candidates = pool(DEFAULT_SPECIALTY);
    }

    least_loaded(candidates.into_iter())
}

/// Free doctors of exactly `specialty`, in registration order.
pub fn available_for<'a>(registry: &'a DoctorRegistry, specialty: &str) -> Vec<&'a Doctor> {
    registry
        .iter()
        .filter(|d| d.practises(specialty) && !d.is_busy())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_types::PatientId;

    fn registry(doctors: &[(u32, &str, u32)]) -> DoctorRegistry {
        let mut registry = DoctorRegistry::new(30).unwrap();
        for (id, specialty, attended) in doctors {
            registry
                .add(Doctor::new(DoctorId(*id), &format!("Dr. {id}"), specialty).unwrap())
                .unwrap();
            for _ in 0..*attended {
                registry.increment_attended(DoctorId(*id)).unwrap();
            }
        }
        registry
    }

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("Chest Pain", 30), "Cardiology");
        assert_eq!(classify("Chickenpox", 5), "Pediatrics");
        assert_eq!(classify("Unknown Ailment", 40), "General Medicine");
    }

    #[test]
    fn test_classify_is_case_insensitive_substring() {
        assert_eq!(classify("HIGH BLOOD PRESSURE", 28), "Cardiology");
        assert_eq!(classify("Knee Replacement", 55), "Orthopedics");
        assert_eq!(classify("Lung Screening", 55), "Pulmonology");
        assert_eq!(classify("Stomach Ulcers", 50), "Gastroenterology");
        assert_eq!(classify("Renal Colic", 50), "Nephrology");
        // "kidney" contains "kid", and the pediatric keywords are checked first.
        assert_eq!(classify("Kidney Function", 50), "Pediatrics");
        assert_eq!(classify("Joint Inflammation", 45), "Rheumatology");
        assert_eq!(classify("Mental Health", 36), "Psychiatry");
        assert_eq!(classify("Chronic Fever", 40), "General Medicine");
    }

    #[test]
    fn test_classify_age_rule_position() {
        // Cardiology and orthopaedics outrank the age rule.
        assert_eq!(classify("Heart Murmur", 6), "Cardiology");
        assert_eq!(classify("Fracture", 9), "Orthopedics");
        // The age rule outranks everything after it.
        assert_eq!(classify("Pneumonia", 8), "Pediatrics");
        assert_eq!(classify("Viral Fever", 7), "Pediatrics");
        // At the limit the child is treated as an adult.
        assert_eq!(classify("Pneumonia", PEDIATRIC_AGE_LIMIT), "Pulmonology");
        // Keyword pediatrics still applies to adults.
        assert_eq!(classify("Vaccination", 30), "Pediatrics");
    }

    #[test]
    fn test_select_least_loaded_prefers_fewest_attended() {
        let registry = registry(&[(1, "Cardiology", 2), (2, "Cardiology", 1)]);
        assert_eq!(select_least_loaded(&registry, "Cardiology"), Some(DoctorId(2)));
    }

    #[test]
    fn test_select_least_loaded_ties_go_to_first_registered() {
        let registry = registry(&[(4, "Neurology", 1), (2, "Neurology", 1), (3, "Neurology", 3)]);
        assert_eq!(select_least_loaded(&registry, "Neurology"), Some(DoctorId(4)));
    }

    #[test]
    fn test_select_least_loaded_falls_back_to_general_medicine() {
        let registry = registry(&[(1, "General Medicine", 3), (2, "General Medicine", 0)]);
        assert_eq!(select_least_loaded(&registry, "Cardiology"), Some(DoctorId(2)));
    }

    #[test]
    fn test_select_least_loaded_is_case_sensitive() {
        let registry = registry(&[(1, "cardiology", 0), (2, "General Medicine", 5)]);
        assert_eq!(select_least_loaded(&registry, "Cardiology"), Some(DoctorId(2)));
    }

    #[test]
    fn test_select_least_loaded_none_when_no_pool() {
        let registry = registry(&[(1, "Dermatology", 0)]);
        assert_eq!(select_least_loaded(&registry, "Cardiology"), None);
        assert_eq!(select_least_loaded(&DoctorRegistry::new(1).unwrap(), "Cardiology"), None);
    }

    #[test]
    fn test_select_least_loaded_ignores_busy_state() {
        let mut registry = registry(&[(1, "Cardiology", 0), (2, "Cardiology", 4)]);
        registry.mark_busy(DoctorId(1), PatientId(10)).unwrap();
        assert_eq!(select_least_loaded(&registry, "Cardiology"), Some(DoctorId(1)));
    }

    #[test]
    fn test_available_for_filters_busy_and_has_no_fallback() {
        let mut registry = registry(&[
            (1, "Cardiology", 0),
            (2, "General Medicine", 0),
            (3, "Cardiology", 0),
        ]);
        registry.mark_busy(DoctorId(1), PatientId(10)).unwrap();

        let ids: Vec<_> = available_for(&registry, "Cardiology")
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![DoctorId(3)]);
        assert!(available_for(&registry, "Oncology").is_empty());
    }
}
