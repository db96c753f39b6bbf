//! Command tree shared by the `clinic` binary and the interactive shell.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic triage: patient records, doctors and the waiting queue")]
pub struct Cli {
    /// Snapshot file to load and save (overrides CLINIC_DATA_FILE)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Manage patient records
    #[command(subcommand)]
    Patient(PatientCommand),
    /// Manage doctors and their assignments
    #[command(subcommand)]
    Doctor(DoctorCommand),
    /// Manage the waiting queue
    #[command(subcommand)]
    Queue(QueueCommand),
    /// Populate the clinic from a roster file, or from the built-in sample clinic
    Seed {
        /// JSON roster with `doctors` and `patients` arrays
        #[arg(long)]
        roster: Option<PathBuf>,
    },
}

#[derive(Args, Debug, PartialEq)]
pub struct AddPatient {
    pub id: u32,
    pub name: String,
    pub age: u32,
    pub disease: String,
    /// Queue ahead of regular patients
    #[arg(long)]
    pub emergency: bool,
    /// File under this specialty instead of the suggested one, by name or by number from
    /// `patient specialties`
    #[arg(long)]
    pub specialty: Option<String>,
    /// Assign the least-loaded doctor of the specialty straight away
    #[arg(long)]
    pub ingest: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PatientCommand {
    /// Register a new patient
    Add(AddPatient),
    /// Remove a patient record
    Remove { id: u32 },
    /// List patient records in table order
    List,
    /// Show the visit history of a patient
    History { id: u32 },
    /// Suggest a specialty for a disease and age
    Suggest { disease: String, age: u32 },
    /// List the specialties a patient can be filed under
    Specialties,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum DoctorCommand {
    /// Register a new doctor
    Add {
        id: u32,
        name: String,
        specialty: String,
    },
    /// Remove a doctor
    Remove { id: u32 },
    /// List doctors and whether they are busy
    List,
    /// Bind a patient to a specific doctor
    Assign { patient: u32, doctor: u32 },
    /// Mark a busy doctor as available and close the current visit
    Release {
        id: u32,
        /// Note written on the patient's latest visit
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Show patients attended per doctor
    Performance,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum QueueCommand {
    /// Put a patient in the waiting queue
    Add { id: u32 },
    /// Show the waiting queue
    List,
    /// Assign the patient at the head of the queue
    Next {
        /// Doctor to assign; without it the free candidates are listed
        #[arg(long)]
        doctor: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("clinic").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_patient_add_with_flags() {
        let cli = parse(&[
            "patient",
            "add",
            "109",
            "Rajiv Bhatia",
            "72",
            "Heart Disease",
            "--emergency",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::Patient(PatientCommand::Add(AddPatient {
                id: 109,
                name: "Rajiv Bhatia".into(),
                age: 72,
                disease: "Heart Disease".into(),
                emergency: true,
                specialty: None,
                ingest: false,
            })))
        );
    }

    #[test]
    fn test_parse_global_data_file() {
        let cli = parse(&["queue", "next", "--doctor", "5", "--data-file", "x.bin"]);
        assert_eq!(cli.data_file, Some(PathBuf::from("x.bin")));
        assert_eq!(
            cli.command,
            Some(Commands::Queue(QueueCommand::Next { doctor: Some(5) }))
        );
    }

    #[test]
    fn test_release_note_defaults_to_blank() {
        let cli = parse(&["doctor", "release", "5"]);
        assert_eq!(
            cli.command,
            Some(Commands::Doctor(DoctorCommand::Release {
                id: 5,
                note: String::new()
            }))
        );
    }

    #[test]
    fn test_rejects_negative_age() {
        let result = Cli::try_parse_from(["clinic", "patient", "add", "1", "A", "-3", "Flu"]);
        assert!(result.is_err());
    }
}
