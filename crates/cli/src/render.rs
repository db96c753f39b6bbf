//! Plain-text tables.

use chrono::Local;
use clinic_core::{
    AssignmentOutcome, Attendance, Clinic, Doctor, IngestOutcome, Patient, ReleaseOutcome, SeedSummary,
    VisitHistory,
};
use std::io::{self, Write};

const RULE: &str = "------------------------------------------------------------";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn patients<'a>(
    out: &mut dyn Write,
    patients: impl Iterator<Item = &'a Patient>,
) -> io::Result<()> {
    let mut patients = patients.peekable();
    if patients.peek().is_none() {
        return writeln!(out, "No patients in the system.");
    }
    writeln!(
        out,
        "{:<6} {:<20} {:>4} {:<22} {:<18} {:>6} {:<9}",
        "ID", "Name", "Age", "Disease", "Specialty", "Visits", "Emergency"
    )?;
    writeln!(out, "{RULE}")?;
    for p in patients {
        writeln!(
            out,
            "{:<6} {:<20} {:>4} {:<22} {:<18} {:>6} {:<9}",
            p.id.get(),
            p.name,
            p.age,
            p.disease,
            p.required_specialty,
            p.visit_count(),
            yes_no(p.emergency)
        )?;
    }
    Ok(())
}

pub fn doctors<'a>(out: &mut dyn Write, doctors: impl Iterator<Item = &'a Doctor>) -> io::Result<()> {
    let mut doctors = doctors.peekable();
    if doctors.peek().is_none() {
        return writeln!(out, "No doctors registered.");
    }
    writeln!(
        out,
        "{:<5} {:<22} {:<18} {:<12}",
        "ID", "Name", "Specialty", "Status"
    )?;
    writeln!(out, "{RULE}")?;
    for d in doctors {
        let status = match d.attendance() {
            Attendance::Seeing(patient) => format!("Busy ({patient})"),
            Attendance::Vacated(_) => "Busy (removed)".to_string(),
            Attendance::Idle => "Available".to_string(),
        };
        writeln!(
            out,
            "{:<5} {:<22} {:<18} {:<12}",
            d.id.get(),
            d.name,
            d.specialty,
            status
        )?;
    }
    Ok(())
}

pub fn performance<'a>(
    out: &mut dyn Write,
    doctors: impl Iterator<Item = &'a Doctor>,
) -> io::Result<()> {
    let mut doctors = doctors.peekable();
    if doctors.peek().is_none() {
        return writeln!(out, "No doctor has attended a patient yet.");
    }
    writeln!(out, "{:<5} {:<22} {:<18} {:>8}", "ID", "Name", "Specialty", "Patients")?;
    writeln!(out, "{RULE}")?;
    for d in doctors {
        writeln!(
            out,
            "{:<5} {:<22} {:<18} {:>8}",
            d.id.get(),
            d.name,
            d.specialty,
            d.patients_attended()
        )?;
    }
    Ok(())
}

pub fn queue(out: &mut dyn Write, clinic: &Clinic) -> io::Result<()> {
    if clinic.queue().is_empty() {
        return writeln!(out, "Waiting queue is empty.");
    }
    writeln!(out, "{:<4} {:<6} {:<20} {:<10}", "#", "ID", "Name", "Priority")?;
    writeln!(out, "{RULE}")?;
    for (position, entry) in clinic.queue_entries().enumerate() {
        let name = clinic
            .find_patient(entry.patient_id)
            .map_or("(removed)", |p| p.name.as_str());
        writeln!(
            out,
            "{:<4} {:<6} {:<20} {:<10}",
            position + 1,
            entry.patient_id.get(),
            name,
            entry.priority
        )?;
    }
    Ok(())
}

pub fn visit_history(out: &mut dyn Write, history: &VisitHistory<'_>) -> io::Result<()> {
    let patient = history.patient;
    writeln!(out, "Patient:    {} ({})", patient.name, patient.id)?;
    writeln!(out, "Age:        {}", patient.age)?;
    writeln!(out, "Disease:    {}", patient.disease)?;
    writeln!(out, "Specialty:  {}", patient.required_specialty)?;
    writeln!(out, "Emergency:  {}", yes_no(patient.emergency))?;
    match history.assigned_doctor {
        Some(doctor) => writeln!(
            out,
            "Doctor:     {} ({}, {})",
            doctor.name, doctor.id, doctor.specialty
        )?,
        None => writeln!(out, "Doctor:     unassigned")?,
    }
    writeln!(out, "Visits:     {}", patient.visit_count())?;
    writeln!(out, "{RULE}")?;

    if history.visits.is_empty() {
        return writeln!(out, "No recorded visits.");
    }
    for (number, visit) in history.visits.iter().enumerate() {
        let when = visit.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let notes = if visit.notes.is_empty() {
            "-"
        } else {
            visit.notes.as_str()
        };
        writeln!(
            out,
            "{:>2}. {}  {:<22} {}",
            number + 1,
            when,
            visit.doctor_name,
            notes
        )?;
    }
    Ok(())
}

/// Free doctors for the patient at the head of the queue.
pub fn candidates(
    out: &mut dyn Write,
    patient: &Patient,
    specialty: &str,
    candidates: &[&Doctor],
) -> io::Result<()> {
    writeln!(
        out,
        "Next patient: {} ({}), requires {}",
        patient.name, patient.id, specialty
    )?;
    if candidates.is_empty() {
        return writeln!(out, "No {specialty} doctor is available.");
    }
    doctors(out, candidates.iter().copied())
}

pub fn assignment(out: &mut dyn Write, clinic: &Clinic, outcome: &AssignmentOutcome) -> io::Result<()> {
    match outcome {
        AssignmentOutcome::QueueEmpty => writeln!(out, "Waiting queue is empty."),
        AssignmentOutcome::PatientMissing(id) => {
            writeln!(out, "Patient {id} no longer exists; queue entry dropped.")
        }
        AssignmentOutcome::VisitHistoryFull(id) => writeln!(
            out,
            "Patient {id} has no room for another visit; queue entry dropped."
        ),
        AssignmentOutcome::NoDoctorAvailable { patient, specialty } => writeln!(
            out,
            "No {specialty} doctor is available. Patient {patient} returned to the queue."
        ),
        AssignmentOutcome::Assigned {
            patient, doctor, ..
        } => {
            let name = clinic
                .doctors()
                .find(*doctor)
                .map_or_else(|| doctor.to_string(), |d| d.name.to_string());
            writeln!(out, "Patient {patient} assigned to {name}.")
        }
        AssignmentOutcome::Exhausted {
            patient,
            rejections,
            ..
        } => {
            for rejection in rejections {
                writeln!(out, "  {rejection}")?;
            }
            writeln!(out, "Patient {patient} not assigned; returned to the queue.")
        }
    }
}

pub fn ingest(out: &mut dyn Write, outcome: &IngestOutcome) -> io::Result<()> {
    match outcome {
        IngestOutcome::Matched { patient, doctor } => {
            writeln!(out, "Patient {patient} assigned to doctor {doctor}.")
        }
        IngestOutcome::SpecialtyUnmatched { patient, specialty } => writeln!(
            out,
            "No doctor for {specialty}; patient {patient} stored unassigned."
        ),
    }
}

pub fn release(out: &mut dyn Write, outcome: &ReleaseOutcome) -> io::Result<()> {
    match outcome {
        ReleaseOutcome::Released { doctor, patient } => writeln!(
            out,
            "Doctor {doctor} is available. Visit of patient {patient} closed."
        ),
        ReleaseOutcome::NoVisitToAnnotate { doctor, patient } => writeln!(
            out,
            "Doctor {doctor} is available. Patient {patient} has no visit to annotate."
        ),
        ReleaseOutcome::PatientMissing { doctor, patient } => writeln!(
            out,
            "Doctor {doctor} is available. Patient {patient} no longer exists."
        ),
    }
}

pub fn seed(out: &mut dyn Write, clinic: &Clinic, summary: &SeedSummary) -> io::Result<()> {
    writeln!(
        out,
        "Seeded {} doctors and {} patients.",
        summary.doctors, summary.patients
    )?;
    for (patient, doctor) in &summary.matched {
        let (Some(p), Some(d)) = (clinic.find_patient(*patient), clinic.doctors().find(*doctor))
        else {
            continue;
        };
        writeln!(
            out,
            "  {:<6} {:<20} -> {} ({})",
            patient.get(),
            p.name,
            d.name,
            d.specialty
        )?;
    }
    for (patient, specialty) in &summary.unmatched {
        writeln!(out, "  {:<6} no doctor for {}", patient.get(), specialty)?;
    }
    Ok(())
}
