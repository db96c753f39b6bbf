//! Patient-to-doctor assignment.
//!
//! The [`AssignmentController`] borrows the patient table, the doctor registry and the waiting
//! queue mutably for the length of one transaction, so nothing else can observe a patient
//! half-way between queued and assigned.
//!
//! An interactive attempt moves through `Dequeued -> Matching -> Assigned | Unmatched`:
//!
//! - **Dequeued**: the head entry is taken off the queue and its patient re-resolved. A
//!   patient that no longer exists ends the attempt with [`AssignmentOutcome::PatientMissing`].
//! - **Matching**: the required specialty is resolved and the free doctors of that specialty
//!   are offered to a [`DoctorSelector`], which gets a bounded number of tries.
//! - **Assigned** binds the pair. **Unmatched** puts the patient back in the queue with its
//!   original priority.
//!
//! Bulk ingestion ([`AssignmentController::ingest`]) skips the queue entirely: it picks the
//! least-loaded doctor of the classified specialty, busy or not, and never blocks.

use crate::doctor::{Attendance, Doctor};
use crate::doctor_registry::DoctorRegistry;
use crate::matcher::{available_for, select_least_loaded};
use crate::patient::Patient;
use crate::patient_store::PatientStore;
use crate::triage_queue::TriageQueue;
use crate::validation::validate_note;
use crate::{ClinicError, ClinicResult};
use chrono::Utc;
use clinic_types::{DoctorId, PatientId};

/// Why a caller-selected doctor was refused during interactive assignment.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentRejection {
    #[error("doctor {0} not found")]
    DoctorNotFound(DoctorId),
    #[error("doctor {doctor} practises {actual}, patient requires {expected}")]
    SpecialtyMismatch {
        doctor: DoctorId,
        expected: String,
        actual: String,
    },
    #[error("doctor {0} is currently busy")]
    DoctorUnavailable(DoctorId),
}

/// What the selector is shown on each try.
#[derive(Debug)]
pub struct SelectionRequest<'r> {
    pub patient: &'r Patient,
    pub specialty: &'r str,
    /// Free doctors of `specialty`, registration order.
    pub candidates: &'r [Doctor],
    /// 1-based.
    pub attempt: u32,
    pub max_attempts: u32,
}

/// Chooses a doctor for a dequeued patient.
///
/// Implemented by the interactive shell (prompting), by the one-shot CLI (a fixed id) and by
/// tests (a script). Returning `None` gives up and sends the patient back to the queue.
pub trait DoctorSelector {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Option<DoctorId>;

    /// Called after each refused choice.
    fn rejected(&mut self, _rejection: &AssignmentRejection) {}
}

/// Terminal result of one interactive assignment attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignmentOutcome {
    QueueEmpty,
    /// The dequeued id no longer resolves. The entry is consumed.
    PatientMissing(PatientId),
    /// The patient has no room for another visit. The entry is consumed.
    VisitHistoryFull(PatientId),
    /// Nobody of the required specialty is free; the patient was re-enqueued.
    NoDoctorAvailable { patient: PatientId, specialty: String },
    Assigned {
        patient: PatientId,
        doctor: DoctorId,
        attempts: u32,
    },
    /// Every try was refused, or the selector gave up; the patient was re-enqueued.
    Exhausted {
        patient: PatientId,
        specialty: String,
        rejections: Vec<AssignmentRejection>,
    },
}

/// Result of bulk ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    Matched {
        patient: PatientId,
        doctor: DoctorId,
    },
    /// Neither the requested specialty nor the default pool has a doctor. The patient is
    /// stored unassigned.
    SpecialtyUnmatched {
        patient: PatientId,
        specialty: String,
    },
}

/// Result of releasing a busy doctor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The closing note was written on the patient's latest visit.
    Released { doctor: DoctorId, patient: PatientId },
    /// The doctor is free, but the patient had no visit record to annotate.
    NoVisitToAnnotate { doctor: DoctorId, patient: PatientId },
    /// The doctor is free, but the patient it was seeing has been removed.
    PatientMissing { doctor: DoctorId, patient: PatientId },
}

/// The specialty a patient must be seen in: that of its assigned doctor when the reference
/// still resolves, otherwise the one recorded at registration.
pub fn required_specialty(doctors: &DoctorRegistry, patient: &Patient) -> String {
    patient
        .assigned_doctor
        .and_then(|id| doctors.find(id))
        .map(|doctor| doctor.specialty.to_string())
        .unwrap_or_else(|| patient.required_specialty.to_string())
}

pub struct AssignmentController<'a> {
    patients: &'a mut PatientStore,
    doctors: &'a mut DoctorRegistry,
    queue: &'a mut TriageQueue,
    max_attempts: u32,
}

impl<'a> AssignmentController<'a> {
    pub fn new(
        patients: &'a mut PatientStore,
        doctors: &'a mut DoctorRegistry,
        queue: &'a mut TriageQueue,
        max_attempts: u32,
    ) -> Self {
        Self {
            patients,
            doctors,
            queue,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Stores a new patient and assigns the least-loaded doctor of its required specialty.
    ///
    /// Busy state is ignored. The chosen doctor's attended counter is bumped, but the doctor
    /// is not marked busy and no visit is opened. If the insert fails nothing changes.
    pub fn ingest(&mut self, mut patient: Patient) -> ClinicResult<IngestOutcome> {
        let id = patient.id;
        let specialty = patient.required_specialty.to_string();
        let chosen = select_least_loaded(self.doctors, &specialty);

        patient.assigned_doctor = chosen;
        self.patients.insert(patient)?;

        match chosen {
            Some(doctor) => {
                self.doctors.increment_attended(doctor)?;
                tracing::info!("ingested patient {} -> doctor {} ({})", id, doctor, specialty);
                Ok(IngestOutcome::Matched { patient: id, doctor })
            }
            None => {
                tracing::warn!(
                    "ingested patient {} unassigned: no doctor for {}",
                    id,
                    specialty
                );
                Ok(IngestOutcome::SpecialtyUnmatched {
                    patient: id,
                    specialty,
                })
            }
        }
    }

    /// Runs one interactive assignment attempt for the patient at the head of the queue.
    ///
    /// # Errors
    ///
    /// Only if putting the patient back in the queue fails, which cannot happen for an entry
    /// that was just taken out.
    pub fn assign_next(
        &mut self,
        selector: &mut dyn DoctorSelector,
    ) -> ClinicResult<AssignmentOutcome> {
        let Some(entry) = self.queue.dequeue() else {
            return Ok(AssignmentOutcome::QueueEmpty);
        };
        let patient_id = entry.patient_id;
        tracing::debug!("dequeued patient {} ({})", patient_id, entry.priority);

        let Some(patient) = self.patients.find(patient_id).cloned() else {
            tracing::warn!("queued patient {} no longer exists", patient_id);
            return Ok(AssignmentOutcome::PatientMissing(patient_id));
        };

        if patient.ensure_visit_capacity().is_err() {
            tracing::warn!("patient {} has no room for another visit", patient_id);
            return Ok(AssignmentOutcome::VisitHistoryFull(patient_id));
        }

        let specialty = required_specialty(self.doctors, &patient);
        let candidates: Vec<Doctor> = available_for(self.doctors, &specialty)
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!(
            "matching patient {}: {} free doctor(s) in {}",
            patient_id,
            candidates.len(),
            specialty
        );

        if candidates.is_empty() {
            self.queue.enqueue(patient_id, entry.priority)?;
            tracing::info!(
                "no {} doctor available, patient {} returned to queue",
                specialty,
                patient_id
            );
            return Ok(AssignmentOutcome::NoDoctorAvailable {
                patient: patient_id,
                specialty,
            });
        }

        let mut rejections = Vec::new();
        for attempt in 1..=self.max_attempts {
            let request = SelectionRequest {
                patient: &patient,
                specialty: &specialty,
                candidates: &candidates,
                attempt,
                max_attempts: self.max_attempts,
            };
            let Some(choice) = selector.select(&request) else {
                break;
            };

            match self.check_choice(choice, &specialty) {
                Ok(()) => {
                    self.bind(patient_id, choice)?;
                    return Ok(AssignmentOutcome::Assigned {
                        patient: patient_id,
                        doctor: choice,
                        attempts: attempt,
                    });
                }
                Err(rejection) => {
                    tracing::info!("attempt {} for patient {}: {}", attempt, patient_id, rejection);
                    selector.rejected(&rejection);
                    rejections.push(rejection);
                }
            }
        }

        self.queue.enqueue(patient_id, entry.priority)?;
        tracing::info!(
            "patient {} not assigned after {} attempt(s), returned to queue",
            patient_id,
            rejections.len()
        );
        Ok(AssignmentOutcome::Exhausted {
            patient: patient_id,
            specialty,
            rejections,
        })
    }

    fn check_choice(&self, doctor: DoctorId, specialty: &str) -> Result<(), AssignmentRejection> {
        let found = self
            .doctors
            .find(doctor)
            .ok_or(AssignmentRejection::DoctorNotFound(doctor))?;
        if !found.practises(specialty) {
            return Err(AssignmentRejection::SpecialtyMismatch {
                doctor,
                expected: specialty.to_string(),
                actual: found.specialty.to_string(),
            });
        }
        if found.is_busy() {
            return Err(AssignmentRejection::DoctorUnavailable(doctor));
        }
        Ok(())
    }

    /// Binds a patient to a doctor: the doctor becomes busy and its counter goes up, the
    /// patient gets a new visit record and its assigned-doctor reference.
    ///
    /// Specialty is not checked here. Every precondition is verified before anything is
    /// mutated.
    pub fn bind(&mut self, patient_id: PatientId, doctor_id: DoctorId) -> ClinicResult<()> {
        let doctor = self
            .doctors
            .find(doctor_id)
            .ok_or(ClinicError::DoctorNotFound(doctor_id))?;
        if doctor.is_busy() {
            return Err(ClinicError::DoctorUnavailable(doctor_id));
        }
        let doctor_name = doctor.name.to_string();

        let patient = self
            .patients
            .find(patient_id)
            .ok_or(ClinicError::PatientNotFound(patient_id))?;
        patient.ensure_visit_capacity()?;
        if let Some(other) = self.doctors.attending(patient_id) {
            return Err(ClinicError::PatientInConsultation {
                patient: patient_id,
                doctor: other.id,
            });
        }

        self.doctors.mark_busy(doctor_id, patient_id)?;
        self.doctors.increment_attended(doctor_id)?;
        let patient = self
            .patients
            .find_mut(patient_id)
            .ok_or(ClinicError::PatientNotFound(patient_id))?;
        patient.record_visit(&doctor_name, "", Utc::now())?;
        patient.assigned_doctor = Some(doctor_id);

        tracing::info!("patient {} assigned to {} ({})", patient_id, doctor_name, doctor_id);
        Ok(())
    }

    /// Frees a busy doctor and writes `note` on the latest visit of the patient it was seeing.
    pub fn release_doctor(&mut self, doctor_id: DoctorId, note: &str) -> ClinicResult<ReleaseOutcome> {
        let note = validate_note(note)?;
        let (patient_id, vacated) = match self.doctors.mark_available(doctor_id)? {
            Attendance::Seeing(patient) => (patient, false),
            Attendance::Vacated(patient) => (patient, true),
            Attendance::Idle => return Err(ClinicError::DoctorNotBusy(doctor_id)),
        };
        tracing::info!("doctor {} marked available", doctor_id);

        let patient = if vacated {
            None
        } else {
            self.patients.find_mut(patient_id)
        };
        let Some(patient) = patient else {
            tracing::warn!(
                "doctor {} was seeing patient {}, who has since been removed",
                doctor_id,
                patient_id
            );
            return Ok(ReleaseOutcome::PatientMissing {
                doctor: doctor_id,
                patient: patient_id,
            });
        };

        if patient.close_latest_visit(&note)? {
            Ok(ReleaseOutcome::Released {
                doctor: doctor_id,
                patient: patient_id,
            })
        } else {
            tracing::warn!("patient {} has no visit record to annotate", patient_id);
            Ok(ReleaseOutcome::NoVisitToAnnotate {
                doctor: doctor_id,
                patient: patient_id,
            })
        }
    }
}
