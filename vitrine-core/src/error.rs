use thiserror::Error;
use vitrine_model::ValidationErrors;

use crate::gateway::PersistError;

/// Why a save request did not reach the done state.
///
/// Upload failures never show up here; the save continues with the
/// previously stored image instead.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("a save or profile load is already in progress")]
    Busy,
    #[error("{} field(s) failed validation", .0.len())]
    Validation(ValidationErrors),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub type Result<T, E = SaveError> = std::result::Result<T, E>;
