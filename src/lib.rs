//! # syster-lpg
//!
//! SysML v2 model graph resolution, labeled property graph projections,
//! multiplicity rollup, and expression execution order.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! interpret   → Execution order, feature/type working map
//!   ↓
//! query       → Typing queries, multiplicity rollup, labels
//!   ↓
//! graph       → Labeled property graph, named projections (petgraph)
//!   ↓
//! interchange → Load from records / file / post envelopes, save to file
//!   ↓
//! model       → Element arena, relationship indexing, metamodel hints
//!   ↓
//! base        → Primitives (ElementId, Metatype, Naming)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → interchange → graph → query → interpret)
// ============================================================================

/// Foundation types: ElementId, Metatype, Naming
pub mod base;

/// Model: Element (Proxy | Resolved), arena, indexes, RelationshipIndexer
pub mod model;

/// Model interchange: flat JSON records and post envelopes
pub mod interchange;

/// Labeled property graph and projections
pub mod graph;

/// Typing and multiplicity queries
pub mod query;

/// Execution order and working maps
pub mod interpret;

// Re-export foundation types
pub use base::{ElementId, Metatype, Naming};

// Re-export the model surface
pub use model::{ElementRef, MetamodelHints, Model, ModelError, ModelOptions};

// Re-export graph and query entry points
pub use graph::{EdgeLabel, LabeledPropertyGraph, Projection, ProjectionSpec};
pub use interpret::{ExecutionOrder, ExecutionStep, generate_execution_order};
pub use query::{Bound, Multiplicity, QueryError, Resolution};
