//! Identifier validation for entries and ingestion sources

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Maximum length for entry and source ids
pub const MAX_ID_LENGTH: usize = 255;

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:/@-]*$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum IdValidationError {
    Empty { kind: &'static str },
    TooLong { kind: &'static str, length: usize, max: usize },
    InvalidFormat { kind: &'static str, id: String },
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { kind } => write!(f, "{} cannot be empty", kind),
            Self::TooLong { kind, length, max } => {
                write!(f, "{} too long: {} characters (max {})", kind, length, max)
            }
            Self::InvalidFormat { kind, id } => write!(
                f,
                "Invalid {} '{}': must start alphanumeric and contain only [A-Za-z0-9._:/@-]",
                kind, id
            ),
        }
    }
}

impl std::error::Error for IdValidationError {}

impl From<IdValidationError> for DomainError {
    fn from(err: IdValidationError) -> Self {
        DomainError::invalid_id(err.to_string())
    }
}

fn validate_id(kind: &'static str, id: &str) -> Result<(), IdValidationError> {
    if id.is_empty() {
        return Err(IdValidationError::Empty { kind });
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(IdValidationError::TooLong {
            kind,
            length: id.len(),
            max: MAX_ID_LENGTH,
        });
    }

    if !ID_PATTERN.is_match(id) {
        return Err(IdValidationError::InvalidFormat {
            kind,
            id: id.to_string(),
        });
    }

    Ok(())
}

pub fn validate_entry_id(id: &str) -> Result<(), IdValidationError> {
    validate_id("entry id", id)
}

pub fn validate_source_id(id: &str) -> Result<(), IdValidationError> {
    validate_id("source id", id)
}
