//! Constants used throughout the clinic core crate.
//!
//! Capacities mirror the fixed-size tables of the snapshot format, so changing them
//! changes the on-disk layout as well.

/// Default number of slots in the patient table (and entries in the waiting queue).
pub const DEFAULT_PATIENT_CAPACITY: usize = 100;

/// Default number of doctor slots in the registry.
pub const DEFAULT_DOCTOR_CAPACITY: usize = 30;

/// Number of visit records kept per patient.
pub const VISIT_HISTORY_CAPACITY: usize = 20;

/// Maximum length of names, diseases, specialties and visit notes.
pub const MAX_TEXT_LEN: usize = 49;

/// Maximum accepted patient age.
pub const MAX_AGE: u32 = 150;

/// Number of doctor selections the interactive assignment accepts before giving up.
pub const DEFAULT_ASSIGNMENT_ATTEMPTS: u32 = 3;

/// Specialty used when nothing more specific matches, and the matcher's fallback pool.
pub const DEFAULT_SPECIALTY: &str = "General Medicine";

/// Default snapshot file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "hospital_data.bin";

/// Specialties offered to a caller who declines the suggested classification.
pub const KNOWN_SPECIALTIES: [&str; 15] = [
    "General Medicine",
    "Orthopedics",
    "Cardiology",
    "Neurology",
    "Pulmonology",
    "Gastroenterology",
    "Oncology",
    "Pediatrics",
    "Dermatology",
    "Gynecology",
    "Urology",
    "Psychiatry",
    "Endocrinology",
    "Nephrology",
    "Rheumatology",
];
