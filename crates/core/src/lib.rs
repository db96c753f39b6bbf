//! # Clinic Core
//!
//! Core logic of the clinic triage system.
//!
//! This crate holds the data structures and the assignment rules:
//! - [`PatientStore`]: fixed-capacity open-addressed patient table
//! - [`DoctorRegistry`]: bounded doctor list with busy state and attendance counters
//! - [`matcher`]: disease classification and doctor selection
//! - [`TriageQueue`]: emergency-first waiting queue
//! - [`AssignmentController`]: the dequeue, match and bind transaction
//! - [`Clinic`]: the facade tying them together
//! - [`snapshot`]: binary persistence of a whole clinic
//!
//! **No I/O policy**: the core never reads environment variables, prompts, or prints.
//! Binaries resolve a [`CoreConfig`] at startup and drive the clinic through it.

pub mod assignment;
pub mod clinic;
pub mod config;
pub mod constants;
pub mod doctor;
pub mod doctor_registry;
pub mod error;
pub mod matcher;
pub mod patient;
pub mod patient_store;
pub mod roster;
pub mod snapshot;
pub mod triage_queue;
pub mod validation;

pub use assignment::{
    AssignmentController, AssignmentOutcome, AssignmentRejection, DoctorSelector,
    IngestOutcome, ReleaseOutcome, SelectionRequest,
};
pub use clinic::{Clinic, DoctorRegistration, PatientRegistration, SeedSummary, VisitHistory};
pub use config::CoreConfig;
pub use doctor::{Attendance, Doctor};
pub use doctor_registry::DoctorRegistry;
pub use error::{ClinicError, ClinicResult};
pub use patient::{Patient, VisitRecord};
pub use patient_store::{PatientStore, Slot};
pub use roster::Roster;
pub use snapshot::{Imported, SnapshotWarning};
pub use triage_queue::{QueueEntry, TriageQueue};

pub use clinic_types::{DoctorId, NonEmptyText, PatientId, Priority, TextError};
