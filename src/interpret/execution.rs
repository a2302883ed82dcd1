//! Evaluation order over the `Expression Inferred` projection.
//!
//! ```text
//! Expression Inferred (consumer ──▶ producer)
//!
//!   a ──Redefinition^-1──▶ b ──Redefinition^-1──▶ c      root: a
//!
//! edge BFS from a:  (a→b) (b→c)
//! reversed:         (b→c) (a→b)
//! steps:            c feeds b, then b feeds a
//! ```

use super::InterpretError;
use crate::base::{ElementId, metatypes};
use crate::graph::{EdgeLabel, EdgeView, LabeledPropertyGraph, Projection, names};
use crate::model::as_references;
use crate::query::QueryError;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

/// How a producer's value reaches its consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ExecutionKind {
    /// Feature to feature, or attribute to attribute without redefinition.
    Assignment,
    /// Attribute to the attribute it redefines.
    Redefinition,
    /// Feature value bound into an attribute.
    ValueBinding,
    /// Return parameter flowing out of its expression.
    Output,
    /// Argument flowing into a parameter.
    Input,
    /// None of the above; kept in the order all the same.
    Unclassified,
}

impl std::fmt::Display for ExecutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExecutionKind::Assignment => "Assignment",
            ExecutionKind::Redefinition => "Redefinition",
            ExecutionKind::ValueBinding => "ValueBinding",
            ExecutionKind::Output => "Output",
            ExecutionKind::Input => "Input",
            ExecutionKind::Unclassified => "",
        };
        f.write_str(name)
    }
}

/// One scheduled value flow: evaluate `producer`, then pass it to `consumer`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ExecutionStep {
    pub producer: ElementId,
    pub consumer: ElementId,
    pub kind: ExecutionKind,
}

/// Steps in evaluation order, plus the nodes scheduled in each context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionOrder {
    pub steps: Vec<ExecutionStep>,
    /// Context (the featuring type of a root) → producers scheduled in it,
    /// in step order.
    pub contexts: IndexMap<ElementId, Vec<ElementId>>,
}

impl ExecutionOrder {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps as `(producer, consumer, kind)` tuples.
    pub fn pairs(&self) -> impl Iterator<Item = (&ElementId, &ElementId, ExecutionKind)> {
        self.steps
            .iter()
            .map(|step| (&step.producer, &step.consumer, step.kind))
    }
}

/// Order the value flows of the `Expression Inferred` projection.
///
/// Every node without an incoming edge is a root. From each root, in graph
/// order, the reachable edges are walked breadth first and then reversed,
/// so every producer is scheduled before anything that consumes it. Steps
/// of different roots follow one another; a step reachable from two roots
/// appears once per root.
pub fn generate_execution_order(
    lpg: &LabeledPropertyGraph<'_>,
) -> Result<ExecutionOrder, InterpretError> {
    let eig = lpg
        .get_projection(names::EXPRESSION_INFERRED)
        .map_err(QueryError::from)?;
    let mut order = ExecutionOrder::default();

    for root in eig.roots() {
        let context = execution_context(lpg, root);
        trace!("[EXECUTION] root {root} in context {context}");
        let mut edges = eig.edge_bfs(root);
        edges.reverse();
        for edge in edges {
            let step = ExecutionStep {
                producer: edge.target.clone(),
                consumer: edge.source.clone(),
                kind: classify(lpg, &eig, &edge),
            };
            order
                .contexts
                .entry(context.clone())
                .or_default()
                .push(step.producer.clone());
            order.steps.push(step);
        }
    }

    debug!(
        "Execution order: {} step(s) in {} context(s)",
        order.steps.len(),
        order.contexts.len()
    );
    Ok(order)
}

/// The context a root is evaluated in: its first featuring type (resolved
/// or not), else its owner, else the root itself.
fn execution_context(lpg: &LabeledPropertyGraph<'_>, root: &ElementId) -> ElementId {
    let model = lpg.model();
    let Some(element) = model.find_element(root) else {
        return root.clone();
    };
    let featuring = element
        .raw("featuringType")
        .ok()
        .flatten()
        .and_then(as_references)
        .and_then(|ids| ids.into_iter().next());
    if let Some(featuring) = featuring {
        return featuring;
    }
    match element.owner() {
        Ok(Some(owner)) => owner.id().clone(),
        _ => root.clone(),
    }
}

fn classify(lpg: &LabeledPropertyGraph<'_>, eig: &Projection, edge: &EdgeView<'_>) -> ExecutionKind {
    use metatypes::{ATTRIBUTE_USAGE, FEATURE};

    let producer = edge.target;
    let consumer = edge.source;
    match (lpg.metatype(producer), lpg.metatype(consumer)) {
        (Some(FEATURE), Some(FEATURE)) => return ExecutionKind::Assignment,
        (Some(ATTRIBUTE_USAGE), Some(ATTRIBUTE_USAGE)) => {
            let redefinition = EdgeLabel::reversed(metatypes::REDEFINITION);
            return if eig.labels_between(consumer, producer).contains(&&redefinition) {
                ExecutionKind::Redefinition
            } else {
                ExecutionKind::Assignment
            };
        }
        (Some(FEATURE), Some(ATTRIBUTE_USAGE)) => return ExecutionKind::ValueBinding,
        _ => {}
    }
    if lpg.has_edge(
        producer,
        consumer,
        &EdgeLabel::forward(metatypes::RETURN_PARAMETER_MEMBERSHIP),
    ) {
        ExecutionKind::Output
    } else if lpg.has_edge(
        consumer,
        producer,
        &EdgeLabel::forward(metatypes::PARAMETER_MEMBERSHIP),
    ) {
        ExecutionKind::Input
    } else {
        ExecutionKind::Unclassified
    }
}
