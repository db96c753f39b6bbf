//! # Clinic CLI
//!
//! Command tree, handlers and table rendering for the clinic. The `clinic` binary runs one
//! command per invocation; the interactive shell in the workspace root reuses the same
//! commands and handlers line by line.

pub mod commands;
pub mod handlers;
pub mod render;

use clinic_core::config::{attempts_from_env_value, capacity_from_env_value, data_file_from_env_value};
use clinic_core::constants::{DEFAULT_DOCTOR_CAPACITY, DEFAULT_PATIENT_CAPACITY};
use clinic_core::CoreConfig;
use std::path::PathBuf;

/// Resolves the core configuration from the environment.
///
/// Reads `CLINIC_DATA_FILE`, `CLINIC_PATIENT_CAPACITY`, `CLINIC_DOCTOR_CAPACITY` and
/// `CLINIC_ASSIGNMENT_ATTEMPTS`. An explicit `data_file` wins over the environment.
pub fn config_from_env(data_file: Option<PathBuf>) -> anyhow::Result<CoreConfig> {
    let data_file = data_file
        .unwrap_or_else(|| data_file_from_env_value(std::env::var("CLINIC_DATA_FILE").ok()));
    let patient_capacity = capacity_from_env_value(
        "CLINIC_PATIENT_CAPACITY",
        std::env::var("CLINIC_PATIENT_CAPACITY").ok(),
        DEFAULT_PATIENT_CAPACITY,
    )?;
    let doctor_capacity = capacity_from_env_value(
        "CLINIC_DOCTOR_CAPACITY",
        std::env::var("CLINIC_DOCTOR_CAPACITY").ok(),
        DEFAULT_DOCTOR_CAPACITY,
    )?;
    let attempts = attempts_from_env_value(std::env::var("CLINIC_ASSIGNMENT_ATTEMPTS").ok())?;

    Ok(CoreConfig::new(
        data_file,
        patient_capacity,
        doctor_capacity,
        attempts,
    )?)
}
