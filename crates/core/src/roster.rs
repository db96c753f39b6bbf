//! Seed rosters.
//!
//! A roster is a JSON document listing the doctors and patients a fresh clinic starts with:
//!
//! ```json
//! {
//!   "doctors": [{ "id": 5, "name": "Dr. Suresh Iyer", "specialty": "Cardiology" }],
//!   "patients": [{ "id": 109, "name": "Rajiv Bhatia", "age": 72,
//!                  "disease": "Heart Disease", "emergency": true, "prior_visits": 6 }]
//! }
//! ```
//!
//! `emergency`, `specialty` and `prior_visits` may be omitted. A patient without a
//! `specialty` is classified from its disease and age.

use crate::clinic::{DoctorRegistration, PatientRegistration};
use crate::{ClinicError, ClinicResult};
use clinic_types::{DoctorId, PatientId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub doctors: Vec<DoctorRegistration>,
    #[serde(default)]
    pub patients: Vec<PatientRegistration>,
}

const BUILTIN_DOCTORS: &[(u32, &str, &str)] = &[
    (1, "Dr. Rajesh Kumar", "General Medicine"),
    (2, "Dr. Sunita Desai", "General Medicine"),
    (3, "Dr. Arvind Shah", "General Medicine"),
    (4, "Dr. Neelam Gupta", "General Medicine"),
    (5, "Dr. Suresh Iyer", "Cardiology"),
    (6, "Dr. Rekha Nair", "Cardiology"),
    (7, "Dr. Anil Patel", "Orthopedics"),
    (22, "Dr. Meera Deshmukh", "Orthopedics"),
    (8, "Dr. Priya Sharma", "Pediatrics"),
    (9, "Dr. Ankit Verma", "Pediatrics"),
    (10, "Dr. Vikram Rao", "Gynecology"),
    (11, "Dr. Kavita Nair", "Urology"),
    (12, "Dr. Sushma Joshi", "Neurology"),
    (23, "Dr. Rahul Khanna", "Neurology"),
    (13, "Dr. Neha Desai", "Dermatology"),
    (14, "Dr. Amit Kapoor", "Pulmonology"),
    (15, "Dr. Manoj Yadav", "Gastroenterology"),
    (16, "Dr. Pooja Rani", "Oncology"),
    (17, "Dr. Raghav Sharma", "Psychiatry"),
    (18, "Dr. Ravi Bhatia", "Urology"),
    (19, "Dr. Simran Mehta", "Endocrinology"),
    (20, "Dr. Rajiv Bhatia", "Nephrology"),
    (21, "Dr. Harshika Patil", "Rheumatology"),
];

struct SamplePatient {
    id: u32,
    name: &'static str,
    age: u32,
    disease: &'static str,
    prior_visits: u32,
    emergency: bool,
    specialty: &'static str,
}

const fn sample(
    id: u32,
    name: &'static str,
    age: u32,
    disease: &'static str,
    prior_visits: u32,
    specialty: &'static str,
) -> SamplePatient {
    SamplePatient {
        id,
        name,
        age,
        disease,
        prior_visits,
        emergency: false,
        specialty,
    }
}

// The sample clinic files patients by an exact disease table rather than the keyword
// classifier, so each entry carries its specialty.
const BUILTIN_PATIENTS: &[SamplePatient] = &[
    sample(101, "Amit Mehta", 52, "Hypertension", 3, "General Medicine"),
    sample(102, "Sneha Reddy", 34, "Fatigue", 2, "General Medicine"),
    sample(103, "Rahul Kapoor", 40, "Chronic Fever", 4, "General Medicine"),
    sample(104, "Sunita Verma", 61, "Diabetes", 5, "General Medicine"),
    SamplePatient {
        emergency: true,
        ..sample(109, "Rajiv Bhatia", 72, "Heart Disease", 6, "Cardiology")
    },
    sample(110, "Ishaan Gupta", 19, "Chest Pain", 2, "Cardiology"),
    sample(111, "Nisha Jain", 28, "High Blood Pressure", 4, "Cardiology"),
    sample(112, "Kabir Das", 65, "Cholesterol Management", 3, "Cardiology"),
    sample(113, "Meena Yadav", 65, "Arthritis", 4, "Orthopedics"),
    sample(114, "Simran Kaur", 25, "Shoulder Pain", 2, "Orthopedics"),
    sample(202, "Vikram Singh", 45, "Back Problems", 3, "Orthopedics"),
    sample(203, "Priya Patel", 55, "Knee Replacement", 2, "Orthopedics"),
    sample(115, "Deepa Choudhury", 5, "Chickenpox", 1, "Pediatrics"),
    sample(116, "Kabir Kumar", 7, "Viral Fever", 1, "Pediatrics"),
    sample(117, "Ishaan Gupta", 6, "Growth Checkup", 2, "Pediatrics"),
    sample(118, "Rajiv Bhatia Jr", 8, "Vaccination", 1, "Pediatrics"),
    sample(122, "Sunita Verma", 60, "Migraine", 4, "Neurology"),
    sample(204, "Arun Malhotra", 55, "Memory Loss", 2, "Neurology"),
    sample(205, "Deepika Sharma", 45, "Nerve Pain", 3, "Neurology"),
    sample(123, "Simran Mehta", 30, "Psoriasis", 2, "Dermatology"),
    sample(206, "Ravi Kumar", 35, "Skin Allergy", 1, "Dermatology"),
    sample(124, "Ravi Bhatia", 45, "Pneumonia", 2, "Pulmonology"),
    sample(125, "Priya Rani", 50, "Stomach Ulcers", 3, "Gastroenterology"),
    sample(126, "Amit Kapoor", 55, "Lung Screening", 4, "Pulmonology"),
    sample(127, "Harish Kumar", 36, "Mental Health", 2, "Psychiatry"),
    sample(128, "Kabir Mehta", 60, "Prostate Check", 2, "Urology"),
    sample(129, "Anjali Singh", 40, "Thyroid Issues", 3, "Endocrinology"),
    sample(130, "Neelam Sharma", 50, "Kidney Function", 4, "Urology"),
    sample(131, "Deepika Raj", 45, "Joint Inflammation", 3, "General Medicine"),
];

impl Roster {
    /// The sample clinic: 23 doctors across 15 specialties and 29 patients.
    pub fn builtin() -> Self {
        let doctors = BUILTIN_DOCTORS
            .iter()
            .map(|(id, name, specialty)| DoctorRegistration {
                id: DoctorId(*id),
                name: (*name).to_string(),
                specialty: (*specialty).to_string(),
            })
            .collect();
        let patients = BUILTIN_PATIENTS
            .iter()
            .map(|p| PatientRegistration {
                id: PatientId(p.id),
                name: p.name.to_string(),
                age: p.age,
                disease: p.disease.to_string(),
                emergency: p.emergency,
                specialty: Some(p.specialty.to_string()),
                prior_visits: p.prior_visits,
            })
            .collect();
        Self { doctors, patients }
    }

    pub fn from_json(json: &str) -> ClinicResult<Self> {
        serde_json::from_str(json).map_err(ClinicError::RosterParse)
    }

    pub fn from_path(path: &Path) -> ClinicResult<Self> {
        let json = fs::read_to_string(path).map_err(ClinicError::RosterRead)?;
        Self::from_json(&json)
    }
}
