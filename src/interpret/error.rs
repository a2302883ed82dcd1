//! Error types for interpretation.

use crate::base::ElementId;
use crate::query::QueryError;
use thiserror::Error;

/// Errors raised while ordering or recording an interpretation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpretError {
    /// The type instance was never added to the working map.
    #[error("Type instance {0} is not in the working map")]
    UnknownTypeInstance(ElementId),

    /// The operation does not handle this shape of input yet.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}
