//! Foundation types for the model graph.
//!
//! - [`ElementId`] - Element identifiers (`@id`)
//! - [`Metatype`] - Metaclass tags (`@type`) and well-known names
//! - [`Naming`] - Display modes for elements
//!
//! This module has NO dependencies on other syster modules.

mod id;
mod naming;

pub use id::{ElementId, Metatype, metatypes};
pub use naming::Naming;
