//! Read-only queries over a labeled property graph.
//!
//! Everything here is a pure function of a [`LabeledPropertyGraph`] (and
//! the model it borrows). Answers that should be unique but are not come
//! back as [`Resolution::Ambiguous`] rather than as errors.
//!
//! [`LabeledPropertyGraph`]: crate::graph::LabeledPropertyGraph

mod error;
mod label;
mod multiplicity;
mod resolution;
mod typing;

pub use error::QueryError;
pub use label::{label_for_id, path_labels};
pub use multiplicity::{
    Bound, BoundKind, Multiplicity, banded_paths, feature_multiplicity, roll_up_lower_multiplicity,
    roll_up_multiplicity, roll_up_multiplicity_for_type, roll_up_upper_multiplicity,
};
pub use resolution::{AMBIGUOUS_LABEL, MISSING_LABEL, Resolution};
pub use typing::{feature_type_name, features_typed_by_type, types_for_feature};
