//! Error types for graph projections.

use crate::base::ElementId;
use thiserror::Error;

/// Errors raised when looking up projections or their nodes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// No projection is registered under this name.
    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    /// The element has no node in the projection.
    #[error("Element {id} is not in projection {projection}")]
    NotInProjection { projection: String, id: ElementId },
}
