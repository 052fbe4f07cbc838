//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::{ModuleId, ProgressError};

/// Errors emitted by `CourseService`.
///
/// All of these are expected, recoverable conditions the presentation layer
/// surfaces as a transient warning; storage failures never appear here
/// because persistence is best-effort by design.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("module {0} is not in the catalog")]
    UnknownModule(ModuleId),

    #[error("module position {position} is out of range")]
    OutOfRange { position: usize },

    #[error("module position {position} is locked; complete the previous module first")]
    Locked { position: usize },

    #[error("module {0} has not been completed yet")]
    NotCompleted(ModuleId),

    #[error(transparent)]
    Progress(#[from] ProgressError),
}
