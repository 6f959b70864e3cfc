use std::fmt::{self, Display};

/// Errors produced by model constructors and parsing routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownField(String),
    MalformedAssignment(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownField(name) => {
                write!(f, "unknown profile field: {name}")
            }
            ModelError::MalformedAssignment(raw) => {
                write!(f, "expected field=value, got '{raw}'")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
