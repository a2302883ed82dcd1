//! Interpretation support: evaluation order and working maps.
//!
//! ## Usage
//!
//! ```ignore
//! use syster_lpg::graph::LabeledPropertyGraph;
//! use syster_lpg::interpret::generate_execution_order;
//!
//! let lpg = LabeledPropertyGraph::new(&model);
//! for step in generate_execution_order(&lpg)?.steps {
//!     println!("{} -> {} ({})", step.producer, step.consumer, step.kind);
//! }
//! ```

mod error;
mod execution;
mod working_map;

pub use error::InterpretError;
pub use execution::{ExecutionKind, ExecutionOrder, ExecutionStep, generate_execution_order};
pub use working_map::{FeatureBinding, FeatureTypeWorkingMap};
