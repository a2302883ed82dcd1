//! Model, graph, query, and interpretation tests
//!
//! Tests against small SysML v2 exchange fixtures:
//! - Relationship indexing and model indexes
//! - Interchange round-trips
//! - Named projections
//! - Multiplicity rollup
//! - Execution order

pub mod tests_execution_order;
pub mod tests_interchange_roundtrip;
pub mod tests_model_indexing;
pub mod tests_multiplicity_rollup;
