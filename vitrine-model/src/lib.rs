//! Core data model definitions shared across Vitrine crates.
#![allow(missing_docs)]

pub mod error;
pub mod profile;
pub mod status;
pub mod validation;
#[cfg(feature = "serde")]
pub mod wire;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use profile::{Address, ProfileDraft, ProfileField, RemoteProfile};
pub use status::{FailureKind, Notice, SaveStatus};
pub use validation::ValidationErrors;
