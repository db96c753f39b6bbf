//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the clinic. The core never reads environment variables itself; binaries read
//! them (after `dotenvy`) and hand the raw values to the parsing helpers below.

use crate::constants::{
    DEFAULT_ASSIGNMENT_ATTEMPTS, DEFAULT_DATA_FILE, DEFAULT_DOCTOR_CAPACITY,
    DEFAULT_PATIENT_CAPACITY,
};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    data_file: PathBuf,
    patient_capacity: usize,
    doctor_capacity: usize,
    assignment_attempts: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The patient capacity also bounds the waiting queue, since every queued entry refers to
    /// a stored patient.
    pub fn new(
        data_file: PathBuf,
        patient_capacity: usize,
        doctor_capacity: usize,
        assignment_attempts: u32,
    ) -> ClinicResult<Self> {
        if data_file.as_os_str().is_empty() {
            return Err(ClinicError::InvalidInput(
                "data file path cannot be empty".into(),
            ));
        }
        if patient_capacity == 0 || u32::try_from(patient_capacity).is_err() {
            return Err(ClinicError::InvalidInput(format!(
                "patient capacity must be between 1 and {}",
                u32::MAX
            )));
        }
        if doctor_capacity == 0 || u32::try_from(doctor_capacity).is_err() {
            return Err(ClinicError::InvalidInput(format!(
                "doctor capacity must be between 1 and {}",
                u32::MAX
            )));
        }
        if assignment_attempts == 0 {
            return Err(ClinicError::InvalidInput(
                "assignment attempts must be at least 1".into(),
            ));
        }

        Ok(Self {
            data_file,
            patient_capacity,
            doctor_capacity,
            assignment_attempts,
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn patient_capacity(&self) -> usize {
        self.patient_capacity
    }

    pub fn doctor_capacity(&self) -> usize {
        self.doctor_capacity
    }

    pub fn queue_capacity(&self) -> usize {
        self.patient_capacity
    }

    pub fn assignment_attempts(&self) -> u32 {
        self.assignment_attempts
    }

    /// Returns a copy of this configuration pointing at another data file.
    pub fn with_data_file(&self, data_file: PathBuf) -> ClinicResult<Self> {
        Self::new(
            data_file,
            self.patient_capacity,
            self.doctor_capacity,
            self.assignment_attempts,
        )
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            patient_capacity: DEFAULT_PATIENT_CAPACITY,
            doctor_capacity: DEFAULT_DOCTOR_CAPACITY,
            assignment_attempts: DEFAULT_ASSIGNMENT_ATTEMPTS,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the snapshot path from an optional override.
///
/// A missing or blank value falls back to [`DEFAULT_DATA_FILE`] in the working directory.
pub fn data_file_from_env_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

/// Parse a capacity from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
pub fn capacity_from_env_value(
    name: &str,
    value: Option<String>,
    default: usize,
) -> ClinicResult<usize> {
    match non_blank(value) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ClinicError::InvalidInput(format!(
                "{name} must be a positive integer, got '{raw}'"
            ))),
        },
    }
}

/// Parse the number of interactive assignment attempts from an optional string value.
pub fn attempts_from_env_value(value: Option<String>) -> ClinicResult<u32> {
    match non_blank(value) {
        None => Ok(DEFAULT_ASSIGNMENT_ATTEMPTS),
        Some(raw) => match raw.parse::<u32>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ClinicError::InvalidInput(format!(
                "assignment attempts must be a positive integer, got '{raw}'"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.patient_capacity(), 100);
        assert_eq!(cfg.doctor_capacity(), 30);
        assert_eq!(cfg.queue_capacity(), 100);
        assert_eq!(cfg.assignment_attempts(), 3);
        assert_eq!(cfg.data_file(), Path::new("hospital_data.bin"));
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        let err = CoreConfig::new(PathBuf::from("x.bin"), 0, 30, 3).expect_err("zero patients");
        assert!(matches!(err, ClinicError::InvalidInput(msg) if msg.contains("patient capacity")));

        let err = CoreConfig::new(PathBuf::from("x.bin"), 10, 0, 3).expect_err("zero doctors");
        assert!(matches!(err, ClinicError::InvalidInput(msg) if msg.contains("doctor capacity")));

        let err = CoreConfig::new(PathBuf::from("x.bin"), 10, 3, 0).expect_err("zero attempts");
        assert!(matches!(err, ClinicError::InvalidInput(msg) if msg.contains("attempts")));
    }

    #[test]
    fn test_new_rejects_empty_data_file() {
        let err = CoreConfig::new(PathBuf::new(), 10, 3, 3).expect_err("empty path");
        assert!(matches!(err, ClinicError::InvalidInput(_)));
    }

    #[test]
    fn test_capacity_from_env_value() {
        assert_eq!(capacity_from_env_value("cap", None, 100).unwrap(), 100);
        assert_eq!(capacity_from_env_value("cap", Some("  ".into()), 7).unwrap(), 7);
        assert_eq!(capacity_from_env_value("cap", Some(" 42 ".into()), 7).unwrap(), 42);

        let err = capacity_from_env_value("CLINIC_PATIENT_CAPACITY", Some("0".into()), 7)
            .expect_err("zero is not a capacity");
        assert!(
            matches!(err, ClinicError::InvalidInput(msg) if msg.contains("CLINIC_PATIENT_CAPACITY"))
        );
        assert!(capacity_from_env_value("cap", Some("lots".into()), 7).is_err());
    }

    #[test]
    fn test_attempts_from_env_value() {
        assert_eq!(attempts_from_env_value(None).unwrap(), 3);
        assert_eq!(attempts_from_env_value(Some("5".into())).unwrap(), 5);
        assert!(attempts_from_env_value(Some("-1".into())).is_err());
    }

    #[test]
    fn test_data_file_from_env_value() {
        assert_eq!(
            data_file_from_env_value(None),
            PathBuf::from("hospital_data.bin")
        );
        assert_eq!(
            data_file_from_env_value(Some("/tmp/clinic.bin".into())),
            PathBuf::from("/tmp/clinic.bin")
        );
    }
}
