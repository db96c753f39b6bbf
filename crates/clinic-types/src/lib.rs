//! Shared primitive types for the clinic workspace.
//!
//! These are the small, validated building blocks that both the core and the CLI
//! pass around: identifiers, triage priority and non-empty text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a piece of text was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// Nothing left after trimming
    #[error("text must not be blank")]
    Empty,
    /// The trimmed input is longer than the field allows
    #[error("text is {len} characters long, the limit is {max}")]
    TooLong { max: usize, len: usize },
}

/// Result type for text validation.
pub type TextResult<T> = Result<T, TextError>;

/// Trimmed text with at least one character.
///
/// Patient names, diseases, specialties and doctor names are all held as `NonEmptyText`, so a
/// blank field can never reach the stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and wraps it.
    ///
    /// # Errors
    ///
    /// `TextError::Empty` when only whitespace is left.
    pub fn new(input: impl AsRef<str>) -> TextResult<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`], but also refuses text longer than `max` characters.
    ///
    /// # Errors
    ///
    /// `TextError::Empty` or `TextError::TooLong { max, len }`.
    pub fn bounded(input: impl AsRef<str>, max: usize) -> TextResult<Self> {
        let text = Self::new(input)?;
        let len = text.0.chars().count();
        if len > max {
            return Err(TextError::TooLong { max, len });
        }
        Ok(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NonEmptyText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Caller-supplied patient identifier. Also the hash key of the patient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub u32);

impl PatientId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for PatientId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Caller-supplied doctor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorId(pub u32);

impl DoctorId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for DoctorId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Triage priority class.
///
/// Ordering matters: `Emergency` compares greater than `Regular`, and the waiting queue
/// keeps higher priorities nearer the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Regular,
    Emergency,
}

impl Priority {
    pub fn from_emergency(emergency: bool) -> Self {
        if emergency {
            Priority::Emergency
        } else {
            Priority::Regular
        }
    }

    pub fn is_emergency(self) -> bool {
        matches!(self, Priority::Emergency)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Regular => f.pad("Regular"),
            Priority::Emergency => f.pad("Emergency"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Dr. Priya Sharma \n").unwrap();
        assert_eq!(text.as_str(), "Dr. Priya Sharma");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn test_bounded_text_rejects_long_input() {
        let long = "x".repeat(51);
        let err = NonEmptyText::bounded(&long, 50).expect_err("should reject long text");
        assert_eq!(err, TextError::TooLong { max: 50, len: 51 });
        assert!(NonEmptyText::bounded("x".repeat(50), 50).is_ok());
    }

    #[test]
    fn test_non_empty_text_deserialize_rejects_blank() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());

        let ok: NonEmptyText = serde_json::from_str("\"Cardiology\"").unwrap();
        assert_eq!(ok.as_str(), "Cardiology");
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Emergency > Priority::Regular);
        assert_eq!(Priority::from_emergency(true), Priority::Emergency);
        assert!(!Priority::from_emergency(false).is_emergency());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&PatientId(101)).unwrap(), "101");
        let id: DoctorId = serde_json::from_str("7").unwrap();
        assert_eq!(id, DoctorId(7));
    }
}
