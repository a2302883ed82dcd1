//! Labeled property graph and named projections.
//!
//! The full graph has one node per non-relationship element and one edge
//! per (relationship, source, target) combination, labeled with the
//! relationship's metatype. Projections filter it by [`EdgeLabel`] and
//! endpoint metatype into smaller graphs that the query layer walks.
//!
//! ## Usage
//!
//! ```ignore
//! use syster_lpg::graph::{LabeledPropertyGraph, names};
//!
//! let lpg = LabeledPropertyGraph::new(&model);
//! let pdg = lpg.get_projection(names::PART_DEFINITION_GRAPH)?;
//! for component in pdg.weakly_connected_components() {
//!     assert!(pdg.subgraph(&component).is_acyclic());
//! }
//! ```

mod edge;
mod error;
mod lpg;
mod projection;

pub use edge::EdgeLabel;
pub use error::GraphError;
pub use lpg::{EdgeData, LabeledPropertyGraph, NodeData};
pub use projection::{
    EdgeRule, EdgeView, ProjectedEdge, Projection, ProjectionSpec, default_projections, names,
};
