//! Patient records and their visit history.

use crate::constants::VISIT_HISTORY_CAPACITY;
use crate::validation::{validate_age, validate_note, validate_text_field};
use crate::{ClinicError, ClinicResult};
use chrono::{DateTime, Utc};
use clinic_types::{DoctorId, NonEmptyText, PatientId, Priority};
use serde::{Deserialize, Serialize};

/// One entry of a patient's visit log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Name of the doctor who saw the patient.
    pub doctor_name: String,
    /// Free-text note, written when the doctor is released.
    pub notes: String,
    /// When the visit was opened.
    pub recorded_at: DateTime<Utc>,
}

/// A patient as held in the patient table.
///
/// The visit log is append-only and bounded by [`VISIT_HISTORY_CAPACITY`]. `visit_count` may
/// run ahead of the log length for patients imported with prior visits, but never exceeds the
/// capacity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub age: u32,
    pub disease: NonEmptyText,
    /// Specialty chosen at registration, by classification or by the caller.
    pub required_specialty: NonEmptyText,
    pub emergency: bool,
    visit_count: u32,
    /// Identifier of the last doctor bound to this patient. May dangle after the doctor is
    /// removed; always re-resolve through the registry.
    pub assigned_doctor: Option<DoctorId>,
    visit_history: Vec<VisitRecord>,
}

impl Patient {
    /// Creates a validated patient with no visits and no assigned doctor.
    pub fn new(
        id: PatientId,
        name: &str,
        age: u32,
        disease: &str,
        required_specialty: &str,
        emergency: bool,
    ) -> ClinicResult<Self> {
        validate_age(age)?;
        Ok(Self {
            id,
            name: validate_text_field(name)?,
            age,
            disease: validate_text_field(disease)?,
            required_specialty: validate_text_field(required_specialty)?,
            emergency,
            visit_count: 0,
            assigned_doctor: None,
            visit_history: Vec::new(),
        })
    }

    /// Sets the number of visits the patient had before being registered here.
    pub fn with_prior_visits(mut self, visits: u32) -> ClinicResult<Self> {
        if visits as usize > VISIT_HISTORY_CAPACITY {
            return Err(ClinicError::VisitHistoryFull {
                patient: self.id,
                capacity: VISIT_HISTORY_CAPACITY,
            });
        }
        self.visit_count = visits;
        Ok(self)
    }

    pub fn priority(&self) -> Priority {
        Priority::from_emergency(self.emergency)
    }

    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    pub fn visit_history(&self) -> &[VisitRecord] {
        &self.visit_history
    }

    /// Returns an error if another visit would overflow the log.
    pub fn ensure_visit_capacity(&self) -> ClinicResult<()> {
        if self.visit_count as usize >= VISIT_HISTORY_CAPACITY {
            return Err(ClinicError::VisitHistoryFull {
                patient: self.id,
                capacity: VISIT_HISTORY_CAPACITY,
            });
        }
        Ok(())
    }

    /// Opens a new visit: bumps the visit count and appends a record.
    pub fn record_visit(
        &mut self,
        doctor_name: &str,
        notes: &str,
        recorded_at: DateTime<Utc>,
    ) -> ClinicResult<()> {
        self.ensure_visit_capacity()?;
        let notes = validate_note(notes)?;
        self.visit_history.push(VisitRecord {
            doctor_name: doctor_name.to_string(),
            notes,
            recorded_at,
        });
        self.visit_count += 1;
        Ok(())
    }

    /// Overwrites the note of the most recent visit.
    ///
    /// Returns `Ok(false)` when there is no visit to annotate.
    pub fn close_latest_visit(&mut self, notes: &str) -> ClinicResult<bool> {
        let notes = validate_note(notes)?;
        match self.visit_history.last_mut() {
            Some(latest) => {
                latest.notes = notes;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Checks the structural invariants of a record that did not come through [`Patient::new`].
    pub fn check_invariants(&self) -> ClinicResult<()> {
        validate_age(self.age)?;
        for field in [&self.name, &self.disease, &self.required_specialty] {
            validate_text_field(field.as_str())?;
        }
        for visit in &self.visit_history {
            validate_note(&visit.notes)?;
        }
        if self.visit_count as usize > VISIT_HISTORY_CAPACITY
            || self.visit_history.len() > self.visit_count as usize
        {
            return Err(ClinicError::InvalidInput(format!(
                "patient {} has {} visits and {} history records (capacity {})",
                self.id,
                self.visit_count,
                self.visit_history.len(),
                VISIT_HISTORY_CAPACITY
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_TEXT_LEN;
    use clinic_types::TextError;

    fn patient() -> Patient {
        Patient::new(PatientId(109), "Rajiv Bhatia", 72, "Heart Disease", "Cardiology", true)
            .unwrap()
    }

    #[test]
    fn test_new_patient_defaults() {
        let p = patient();
        assert_eq!(p.visit_count(), 0);
        assert!(p.visit_history().is_empty());
        assert_eq!(p.assigned_doctor, None);
        assert_eq!(p.priority(), Priority::Emergency);
    }

    #[test]
    fn test_new_patient_rejects_blank_name() {
        let err = Patient::new(PatientId(1), " ", 30, "Fever", "General Medicine", false)
            .expect_err("blank name");
        assert!(matches!(err, ClinicError::Text(_)));
    }

    #[test]
    fn test_record_visit_appends_and_counts() {
        let mut p = patient();
        p.record_visit("Dr. Suresh Iyer", "", Utc::now()).unwrap();
        p.record_visit("Dr. Rekha Nair", "ecg normal", Utc::now()).unwrap();

        assert_eq!(p.visit_count(), 2);
        assert_eq!(p.visit_history()[0].doctor_name, "Dr. Suresh Iyer");
        assert_eq!(p.visit_history()[1].notes, "ecg normal");
    }

    #[test]
    fn test_visit_history_is_bounded() {
        let mut p = patient();
        for _ in 0..VISIT_HISTORY_CAPACITY {
            p.record_visit("Dr. Suresh Iyer", "", Utc::now()).unwrap();
        }
        let err = p
            .record_visit("Dr. Suresh Iyer", "", Utc::now())
            .expect_err("log is full");
        assert!(matches!(err, ClinicError::VisitHistoryFull { capacity: 20, .. }));
        assert_eq!(p.visit_history().len(), VISIT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_prior_visits_count_against_capacity() {
        let p = patient().with_prior_visits(19).unwrap();
        assert!(p.ensure_visit_capacity().is_ok());

        let p = patient().with_prior_visits(20).unwrap();
        assert!(p.ensure_visit_capacity().is_err());

        assert!(patient().with_prior_visits(21).is_err());
    }

    #[test]
    fn test_close_latest_visit() {
        let mut p = patient();
        assert!(!p.close_latest_visit("nothing to close").unwrap());

        p.record_visit("Dr. Suresh Iyer", "", Utc::now()).unwrap();
        p.record_visit("Dr. Rekha Nair", "", Utc::now()).unwrap();
        assert!(p.close_latest_visit("discharged").unwrap());
        assert_eq!(p.visit_history()[0].notes, "");
        assert_eq!(p.visit_history()[1].notes, "discharged");
    }

    fn with_field(p: &Patient, field: &str, value: serde_json::Value) -> Patient {
        let mut json = serde_json::to_value(p).unwrap();
        json[field] = value;
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_check_invariants_rejects_overlong_text() {
        let p = patient();
        assert!(p.check_invariants().is_ok());

        let long = "x".repeat(MAX_TEXT_LEN + 1);
        for field in ["name", "disease", "required_specialty"] {
            let imported = with_field(&p, field, long.clone().into());
            let err = imported.check_invariants().expect_err("too long");
            assert!(matches!(err, ClinicError::Text(TextError::TooLong { .. })));
        }
    }

    #[test]
    fn test_check_invariants_rejects_overlong_note() {
        let mut p = patient();
        p.record_visit("Dr. Suresh Iyer", "", Utc::now()).unwrap();
        let mut json = serde_json::to_value(&p).unwrap();
        json["visit_history"][0]["notes"] = "n".repeat(MAX_TEXT_LEN + 1).into();
        let imported: Patient = serde_json::from_value(json).unwrap();

        let err = imported.check_invariants().expect_err("note too long");
        assert!(matches!(err, ClinicError::InvalidInput(_)));
    }
}
