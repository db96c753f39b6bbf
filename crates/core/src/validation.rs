//! Input validation utilities.
//!
//! This module contains functions for validating user inputs to ensure they fit the
//! fixed-width fields of the snapshot format before they reach the stores.

use crate::constants::{MAX_AGE, MAX_TEXT_LEN};
use crate::{ClinicError, ClinicResult};
use clinic_types::NonEmptyText;

/// Validates a name, disease, or specialty field.
///
/// # Errors
///
/// Returns `ClinicError::Text` if the value is blank or longer than [`MAX_TEXT_LEN`].
pub fn validate_text_field(value: &str) -> ClinicResult<NonEmptyText> {
    Ok(NonEmptyText::bounded(value, MAX_TEXT_LEN)?)
}

/// Validates a free-text visit note.
///
/// Notes may be blank (a visit opened by an assignment has no note yet), but they are
/// trimmed and bounded like every other text field.
pub fn validate_note(value: &str) -> ClinicResult<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(ClinicError::InvalidInput(format!(
            "note exceeds maximum length of {} characters",
            MAX_TEXT_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates a patient age.
pub fn validate_age(age: u32) -> ClinicResult<()> {
    if age > MAX_AGE {
        return Err(ClinicError::InvalidInput(format!(
            "age {} exceeds maximum of {}",
            age, MAX_AGE
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_types::TextError;

    #[test]
    fn test_validate_text_field_accepts_and_trims() {
        let text = validate_text_field("  Heart Disease ").unwrap();
        assert_eq!(text.as_str(), "Heart Disease");
    }

    #[test]
    fn test_validate_text_field_rejects_blank_and_long() {
        let err = validate_text_field("   ").expect_err("blank");
        assert!(matches!(err, ClinicError::Text(TextError::Empty)));

        let err = validate_text_field(&"a".repeat(MAX_TEXT_LEN + 1)).expect_err("too long");
        assert!(matches!(err, ClinicError::Text(TextError::TooLong { .. })));
    }

    #[test]
    fn test_validate_note_allows_blank() {
        assert_eq!(validate_note("").unwrap(), "");
        assert_eq!(validate_note(" follow up in 2 weeks ").unwrap(), "follow up in 2 weeks");
        assert!(validate_note(&"n".repeat(MAX_TEXT_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_age() {
        assert!(validate_age(0).is_ok());
        assert!(validate_age(MAX_AGE).is_ok());
        let err = validate_age(MAX_AGE + 1).expect_err("too old");
        assert!(matches!(err, ClinicError::InvalidInput(msg) if msg.contains("exceeds maximum")));
    }
}
