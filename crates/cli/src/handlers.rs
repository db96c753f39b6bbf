//! Executes parsed commands against a [`Clinic`].

use crate::commands::{AddPatient, Commands, DoctorCommand, PatientCommand, QueueCommand};
use crate::render;
use clinic_core::constants::{DEFAULT_SPECIALTY, KNOWN_SPECIALTIES};
use clinic_core::{
    AssignmentOutcome, Clinic, DoctorId, DoctorRegistration, DoctorSelector, PatientId,
    PatientRegistration, Roster, SelectionRequest,
};
use std::io::Write;

/// Whether a command changed the clinic and the snapshot needs rewriting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Modified,
    Unchanged,
}

/// Offers one fixed doctor on the first attempt and then gives up.
pub struct FixedChoice(Option<DoctorId>);

impl FixedChoice {
    pub fn new(doctor: DoctorId) -> Self {
        Self(Some(doctor))
    }
}

impl DoctorSelector for FixedChoice {
    fn select(&mut self, _request: &SelectionRequest<'_>) -> Option<DoctorId> {
        self.0.take()
    }
}

/// Resolves a `--specialty` value. A number picks from [`KNOWN_SPECIALTIES`]; an
/// out-of-range number files the patient under the default specialty.
fn specialty_choice(choice: &str) -> String {
    match choice.trim().parse::<usize>() {
        Ok(number) => KNOWN_SPECIALTIES
            .get(number.wrapping_sub(1))
            .copied()
            .unwrap_or(DEFAULT_SPECIALTY)
            .to_string(),
        Err(_) => choice.to_string(),
    }
}

/// Runs one command.
///
/// `selector` answers `queue next` without `--doctor`. When it is `None` the command only
/// previews the head of the queue and its candidates, leaving the queue untouched.
pub fn execute(
    clinic: &mut Clinic,
    command: Commands,
    selector: Option<&mut dyn DoctorSelector>,
    out: &mut dyn Write,
) -> anyhow::Result<Change> {
    match command {
        Commands::Patient(command) => patient(clinic, command, out),
        Commands::Doctor(command) => doctor(clinic, command, out),
        Commands::Queue(command) => queue(clinic, command, selector, out),
        Commands::Seed { roster } => {
            let roster = match roster {
                Some(path) => Roster::from_path(&path)?,
                None => Roster::builtin(),
            };
            let summary = clinic.seed(roster)?;
            render::seed(out, clinic, &summary)?;
            Ok(Change::Modified)
        }
    }
}

fn patient(
    clinic: &mut Clinic,
    command: PatientCommand,
    out: &mut dyn Write,
) -> anyhow::Result<Change> {
    match command {
        PatientCommand::Add(AddPatient {
            id,
            name,
            age,
            disease,
            emergency,
            specialty,
            ingest,
        }) => {
            let specialty = specialty.map(|choice| specialty_choice(&choice));
            let suggested = clinic.suggest_specialty(&disease, age);
            if specialty.as_deref().is_some_and(|s| s != suggested) {
                writeln!(out, "Suggested specialty: {suggested}")?;
            }
            let registration = PatientRegistration {
                id: PatientId(id),
                name,
                age,
                disease,
                emergency,
                specialty,
                prior_visits: 0,
            };
            if ingest {
                let outcome = clinic.ingest_patient(registration)?;
                render::ingest(out, &outcome)?;
            } else {
                let specialty = clinic.add_patient(registration)?;
                writeln!(out, "Patient {id} added under {specialty}.")?;
            }
            Ok(Change::Modified)
        }
        PatientCommand::Remove { id } => {
            clinic.remove_patient(PatientId(id))?;
            writeln!(out, "Patient {id} removed.")?;
            Ok(Change::Modified)
        }
        PatientCommand::List => {
            render::patients(out, clinic.list_patients())?;
            Ok(Change::Unchanged)
        }
        PatientCommand::History { id } => {
            let history = clinic.visit_history(PatientId(id))?;
            render::visit_history(out, &history)?;
            Ok(Change::Unchanged)
        }
        PatientCommand::Suggest { disease, age } => {
            writeln!(out, "{}", clinic.suggest_specialty(&disease, age))?;
            Ok(Change::Unchanged)
        }
        PatientCommand::Specialties => {
            for (number, specialty) in KNOWN_SPECIALTIES.iter().enumerate() {
                writeln!(out, "{:>2}. {}", number + 1, specialty)?;
            }
            Ok(Change::Unchanged)
        }
    }
}

fn doctor(
    clinic: &mut Clinic,
    command: DoctorCommand,
    out: &mut dyn Write,
) -> anyhow::Result<Change> {
    match command {
        DoctorCommand::Add {
            id,
            name,
            specialty,
        } => {
            clinic.add_doctor(DoctorRegistration {
                id: DoctorId(id),
                name,
                specialty,
            })?;
            writeln!(out, "Doctor {id} added.")?;
            Ok(Change::Modified)
        }
        DoctorCommand::Remove { id } => {
            let removed = clinic.remove_doctor(DoctorId(id))?;
            match removed.attending() {
                Some(patient) => writeln!(
                    out,
                    "Doctor {id} removed while attending patient {patient}."
                )?,
                None => writeln!(out, "Doctor {id} removed.")?,
            }
            Ok(Change::Modified)
        }
        DoctorCommand::List => {
            render::doctors(out, clinic.list_doctors())?;
            Ok(Change::Unchanged)
        }
        DoctorCommand::Assign { patient, doctor } => {
            clinic.assign_to_doctor(PatientId(patient), DoctorId(doctor))?;
            writeln!(out, "Patient {patient} assigned to doctor {doctor}.")?;
            Ok(Change::Modified)
        }
        DoctorCommand::Release { id, note } => {
            let outcome = clinic.mark_doctor_available(DoctorId(id), &note)?;
            render::release(out, &outcome)?;
            Ok(Change::Modified)
        }
        DoctorCommand::Performance => {
            render::performance(out, clinic.doctor_performance())?;
            Ok(Change::Unchanged)
        }
    }
}

fn queue(
    clinic: &mut Clinic,
    command: QueueCommand,
    selector: Option<&mut dyn DoctorSelector>,
    out: &mut dyn Write,
) -> anyhow::Result<Change> {
    match command {
        QueueCommand::Add { id } => {
            let entry = clinic.enqueue_patient(PatientId(id))?;
            writeln!(out, "Patient {id} queued ({}).", entry.priority)?;
            Ok(Change::Modified)
        }
        QueueCommand::List => {
            render::queue(out, clinic)?;
            Ok(Change::Unchanged)
        }
        QueueCommand::Next { doctor } => {
            let outcome = match (doctor, selector) {
                (Some(doctor), _) => clinic.assign_next(&mut FixedChoice::new(DoctorId(doctor)))?,
                (None, Some(selector)) => clinic.assign_next(selector)?,
                (None, None) => return preview_next(clinic, out),
            };
            render::assignment(out, clinic, &outcome)?;
            Ok(match outcome {
                AssignmentOutcome::QueueEmpty => Change::Unchanged,
                _ => Change::Modified,
            })
        }
    }
}

fn preview_next(clinic: &Clinic, out: &mut dyn Write) -> anyhow::Result<Change> {
    let Some(entry) = clinic.queue_entries().next() else {
        writeln!(out, "Waiting queue is empty.")?;
        return Ok(Change::Unchanged);
    };
    match clinic.find_patient(entry.patient_id) {
        Some(patient) => {
            let specialty = clinic.required_specialty(patient);
            let candidates = clinic.available_doctors(&specialty);
            render::candidates(out, patient, &specialty, &candidates)?;
            writeln!(out, "Run again with --doctor <ID> to assign.")?;
        }
        None => writeln!(
            out,
            "Patient {} at the head of the queue no longer exists.",
            entry.patient_id
        )?,
    }
    Ok(Change::Unchanged)
}
