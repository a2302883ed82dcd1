//! The element graph-resolution layer.
//!
//! Turns a flat collection of `@id`/`@type` records into a navigable
//! object graph:
//!
//! ```text
//! records ──▶ Element (Proxy | Resolved) ──▶ Model (arena + indexes)
//!                                               │
//!                                               ▼
//!                                    RelationshipIndexer
//!                              (through<Kind> / reverse<Kind>)
//! ```
//!
//! The [`Model`] is the single owner of every [`Element`]. Views
//! ([`ElementRef`]) borrow an element together with its model and resolve
//! references through it, so no element ever points at another directly.

mod element;
mod error;
mod hints;
mod index;
mod source;
mod store;
mod view;

pub use element::{
    DerivedAttributes, Element, ElementData, ElementState, ID_KEY, Record, TYPE_KEY,
    as_reference, as_references,
};
pub use error::ModelError;
pub use hints::{MetamodelHints, ModelOptions};
pub use index::{Endpoints, RelationshipIndexer, relationship_endpoints};
pub use source::{ElementSource, StaticSource};
pub use store::Model;
pub use view::{Attribute, ElementRef};
