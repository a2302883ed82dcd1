//! Error types for model queries.

use crate::graph::GraphError;
use crate::model::ModelError;
use thiserror::Error;

/// Errors raised by typing, multiplicity, and labeling queries.
///
/// Ambiguity is not an error; see [`Resolution`](super::Resolution).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
