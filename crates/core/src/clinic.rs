//! The clinic facade.
//!
//! [`Clinic`] owns the patient table, the doctor registry and the waiting queue, and exposes
//! the discrete operations the command line and the interactive shell are built on. Every
//! operation that touches more than one component goes through an
//! [`AssignmentController`] borrowed for the duration of the call.

use crate::assignment::{
    required_specialty, AssignmentController, AssignmentOutcome, DoctorSelector, IngestOutcome,
    ReleaseOutcome,
};
use crate::config::CoreConfig;
use crate::doctor::Doctor;
use crate::doctor_registry::DoctorRegistry;
use crate::matcher::{available_for, classify};
use crate::patient::{Patient, VisitRecord};
use crate::patient_store::PatientStore;
use crate::roster::Roster;
use crate::triage_queue::{QueueEntry, TriageQueue};
use crate::validation::validate_text_field;
use crate::{ClinicError, ClinicResult};
use clinic_types::{DoctorId, PatientId};
use serde::{Deserialize, Serialize};

/// Input for registering a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRegistration {
    pub id: PatientId,
    pub name: String,
    pub age: u32,
    pub disease: String,
    #[serde(default)]
    pub emergency: bool,
    /// Overrides the classified specialty when set.
    #[serde(default)]
    pub specialty: Option<String>,
    /// Visits the patient had before being registered here.
    #[serde(default)]
    pub prior_visits: u32,
}

impl PatientRegistration {
    fn into_patient(self) -> ClinicResult<Patient> {
        let specialty = match self.specialty {
            Some(specialty) => validate_text_field(&specialty)?.to_string(),
            None => classify(&self.disease, self.age).to_string(),
        };
        Patient::new(
            self.id,
            &self.name,
            self.age,
            &self.disease,
            &specialty,
            self.emergency,
        )?
        .with_prior_visits(self.prior_visits)
    }
}

/// Input for registering a doctor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRegistration {
    pub id: DoctorId,
    pub name: String,
    pub specialty: String,
}

/// A patient's visit log together with its resolved doctor.
#[derive(Debug)]
pub struct VisitHistory<'c> {
    pub patient: &'c Patient,
    /// `None` when no doctor was ever assigned or the assigned doctor has been removed.
    pub assigned_doctor: Option<&'c Doctor>,
    pub visits: &'c [VisitRecord],
}

/// Counts reported by [`Clinic::seed`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub doctors: usize,
    pub patients: usize,
    pub matched: Vec<(PatientId, DoctorId)>,
    pub unmatched: Vec<(PatientId, String)>,
}

#[derive(Clone, Debug)]
pub struct Clinic {
    config: CoreConfig,
    patients: PatientStore,
    doctors: DoctorRegistry,
    queue: TriageQueue,
}

impl Clinic {
    /// An empty clinic sized by `config`.
    pub fn new(config: CoreConfig) -> ClinicResult<Self> {
        let patients = PatientStore::new(config.patient_capacity())?;
        let doctors = DoctorRegistry::new(config.doctor_capacity())?;
        let queue = TriageQueue::new(config.queue_capacity())?;
        Ok(Self {
            config,
            patients,
            doctors,
            queue,
        })
    }

    /// Assembles a clinic from restored components.
    pub(crate) fn from_parts(
        config: CoreConfig,
        patients: PatientStore,
        doctors: DoctorRegistry,
        queue: TriageQueue,
    ) -> Self {
        Self {
            config,
            patients,
            doctors,
            queue,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn patients(&self) -> &PatientStore {
        &self.patients
    }

    pub fn doctors(&self) -> &DoctorRegistry {
        &self.doctors
    }

    pub fn queue(&self) -> &TriageQueue {
        &self.queue
    }

    fn controller(&mut self) -> AssignmentController<'_> {
        AssignmentController::new(
            &mut self.patients,
            &mut self.doctors,
            &mut self.queue,
            self.config.assignment_attempts(),
        )
    }

    // Patients

    /// The specialty a new patient would be filed under.
    pub fn suggest_specialty(&self, disease: &str, age: u32) -> &'static str {
        classify(disease, age)
    }

    /// Registers a patient without assigning a doctor or queueing it.
    ///
    /// Returns the specialty the patient was filed under.
    pub fn add_patient(&mut self, registration: PatientRegistration) -> ClinicResult<String> {
        let patient = registration.into_patient()?;
        let id = patient.id;
        let specialty = patient.required_specialty.to_string();
        self.patients.insert(patient)?;
        tracing::info!("added patient {} ({})", id, specialty);
        Ok(specialty)
    }

    /// Registers a patient and assigns it the least-loaded doctor of its specialty.
    pub fn ingest_patient(&mut self, registration: PatientRegistration) -> ClinicResult<IngestOutcome> {
        let patient = registration.into_patient()?;
        self.controller().ingest(patient)
    }

    /// Removes a patient. Queue entries that refer to it stay and resolve to nothing when
    /// dequeued. A doctor seeing it stays busy until released, but is no longer bound to the
    /// id, so a later patient registered under the same id starts clean.
    pub fn remove_patient(&mut self, id: PatientId) -> ClinicResult<Patient> {
        let patient = self.patients.remove(id)?;
        match self.doctors.vacate(id) {
            Some(doctor) => {
                tracing::warn!("removed patient {} while seen by doctor {}", id, doctor)
            }
            None => tracing::info!("removed patient {}", id),
        }
        Ok(patient)
    }

    pub fn find_patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.find(id)
    }

    /// Patients in table order.
    pub fn list_patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    pub fn visit_history(&self, id: PatientId) -> ClinicResult<VisitHistory<'_>> {
        let patient = self
            .patients
            .find(id)
            .ok_or(ClinicError::PatientNotFound(id))?;
        Ok(VisitHistory {
            patient,
            assigned_doctor: patient.assigned_doctor.and_then(|d| self.doctors.find(d)),
            visits: patient.visit_history(),
        })
    }

    // Doctors

    pub fn add_doctor(&mut self, registration: DoctorRegistration) -> ClinicResult<()> {
        if self.doctors.find(registration.id).is_some() {
            return Err(ClinicError::DuplicateDoctorId(registration.id));
        }
        let doctor = Doctor::new(registration.id, &registration.name, &registration.specialty)?;
        self.doctors.add(doctor)?;
        tracing::info!(
            "added doctor {} ({})",
            registration.id,
            registration.specialty
        );
        Ok(())
    }

    /// Removes a doctor, busy or not.
    pub fn remove_doctor(&mut self, id: DoctorId) -> ClinicResult<Doctor> {
        let doctor = self.doctors.remove(id)?;
        if let Some(patient) = doctor.attending() {
            tracing::warn!("removed doctor {} while attending patient {}", id, patient);
        } else {
            tracing::info!("removed doctor {}", id);
        }
        Ok(doctor)
    }

    /// Doctors in registration order.
    pub fn list_doctors(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.iter()
    }

    /// Doctors that have attended at least one patient, in registration order.
    pub fn doctor_performance(&self) -> impl Iterator<Item = &Doctor> {
        self.doctors.iter().filter(|d| d.patients_attended() > 0)
    }

    // Queue

    /// Puts a stored patient in the waiting queue at the priority of its emergency flag.
    pub fn enqueue_patient(&mut self, id: PatientId) -> ClinicResult<QueueEntry> {
        let patient = self
            .patients
            .find(id)
            .ok_or(ClinicError::PatientNotFound(id))?;
        if self.queue.contains(id) {
            return Err(ClinicError::AlreadyQueued(id));
        }
        if let Some(doctor) = self.doctors.attending(id) {
            return Err(ClinicError::PatientInConsultation {
                patient: id,
                doctor: doctor.id,
            });
        }

        let priority = patient.priority();
        self.queue.enqueue(id, priority)?;
        tracing::info!("queued patient {} ({})", id, priority);
        Ok(QueueEntry {
            patient_id: id,
            priority,
        })
    }

    /// Queue entries from head to tail.
    pub fn queue_entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.queue.peek_all()
    }

    /// The specialty `patient` will be matched against when it reaches the head of the queue.
    pub fn required_specialty(&self, patient: &Patient) -> String {
        required_specialty(&self.doctors, patient)
    }

    /// Free doctors of exactly `specialty`, registration order.
    pub fn available_doctors(&self, specialty: &str) -> Vec<&Doctor> {
        available_for(&self.doctors, specialty)
    }

    /// Takes the head of the queue and tries to assign it through `selector`.
    pub fn assign_next(
        &mut self,
        selector: &mut dyn DoctorSelector,
    ) -> ClinicResult<AssignmentOutcome> {
        self.controller().assign_next(selector)
    }

    // Assignment

    /// Binds a specific patient to a specific doctor, bypassing the queue and the specialty
    /// check.
    pub fn assign_to_doctor(&mut self, patient: PatientId, doctor: DoctorId) -> ClinicResult<()> {
        if self.queue.contains(patient) {
            return Err(ClinicError::AlreadyQueued(patient));
        }
        self.controller().bind(patient, doctor)
    }

    pub fn mark_doctor_available(
        &mut self,
        doctor: DoctorId,
        note: &str,
    ) -> ClinicResult<ReleaseOutcome> {
        self.controller().release_doctor(doctor, note)
    }

    /// Adds every roster doctor, then ingests every roster patient.
    ///
    /// Stops at the first error; what was added before it stays.
    pub fn seed(&mut self, roster: Roster) -> ClinicResult<SeedSummary> {
        let mut summary = SeedSummary::default();
        for doctor in roster.doctors {
            self.add_doctor(doctor)?;
            summary.doctors += 1;
        }
        for patient in roster.patients {
            match self.ingest_patient(patient)? {
                IngestOutcome::Matched { patient, doctor } => {
                    summary.matched.push((patient, doctor))
                }
                IngestOutcome::SpecialtyUnmatched { patient, specialty } => {
                    summary.unmatched.push((patient, specialty))
                }
            }
            summary.patients += 1;
        }
        tracing::info!(
            "seeded {} doctors and {} patients ({} unmatched)",
            summary.doctors,
            summary.patients,
            summary.unmatched.len()
        );
        Ok(summary)
    }
}
