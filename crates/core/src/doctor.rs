//! Doctor records.

use crate::validation::validate_text_field;
use crate::ClinicResult;
use clinic_types::{DoctorId, NonEmptyText, PatientId};
use serde::{Deserialize, Serialize};

/// Who a doctor is seeing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attendance {
    Idle,
    Seeing(PatientId),
    /// The patient was removed mid-consultation. The doctor stays busy until released, but
    /// the id no longer refers to anyone.
    Vacated(PatientId),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: NonEmptyText,
    /// Compared exactly, case included.
    pub specialty: NonEmptyText,
    attendance: Attendance,
    patients_attended: u32,
}

impl Doctor {
    pub fn new(id: DoctorId, name: &str, specialty: &str) -> ClinicResult<Self> {
        Ok(Self {
            id,
            name: validate_text_field(name)?,
            specialty: validate_text_field(specialty)?,
            attendance: Attendance::Idle,
            patients_attended: 0,
        })
    }

    /// A doctor is busy while bound to a patient that has not been released.
    pub fn is_busy(&self) -> bool {
        self.attendance != Attendance::Idle
    }

    pub fn attendance(&self) -> Attendance {
        self.attendance
    }

    /// The live patient being seen. `None` when idle or when that patient was removed.
    pub fn attending(&self) -> Option<PatientId> {
        match self.attendance {
            Attendance::Seeing(patient) => Some(patient),
            Attendance::Idle | Attendance::Vacated(_) => None,
        }
    }

    pub fn patients_attended(&self) -> u32 {
        self.patients_attended
    }

    pub fn practises(&self, specialty: &str) -> bool {
        self.specialty.as_str() == specialty
    }

    /// Checks a record that did not come through [`Doctor::new`].
    pub fn check_invariants(&self) -> ClinicResult<()> {
        validate_text_field(self.name.as_str())?;
        validate_text_field(self.specialty.as_str())?;
        Ok(())
    }

    pub(crate) fn set_attendance(&mut self, attendance: Attendance) {
        self.attendance = attendance;
    }

    pub(crate) fn record_attendance(&mut self) -> u32 {
        self.patients_attended = self.patients_attended.saturating_add(1);
        self.patients_attended
    }
}
