//! The labeled property graph over a model.
//!
//! ```text
//! Model ──build──▶ LabeledPropertyGraph (full multi-digraph, forward edges)
//!                        │
//!                        ├── project(spec) ──▶ Projection
//!                        └── get_projection(name)
//! ```
//!
//! Only forward edges are stored. A reverse label (`Kind^-1`) is a view of
//! the same edge in the opposite direction and is materialised only when a
//! projection asks for it.

use super::edge::EdgeLabel;
use super::error::GraphError;
use super::projection::{ProjectedEdge, Projection, ProjectionSpec, default_projections};
use crate::base::{ElementId, Metatype, metatypes};
use crate::model::{Model, as_reference, relationship_endpoints};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

/// A node of the full graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeData {
    pub id: ElementId,
    /// `None` for endpoints that are proxies or otherwise unknown.
    pub metatype: Option<Metatype>,
}

/// A forward edge of the full graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeData {
    pub kind: SmolStr,
    /// The relationship element behind the edge; `None` for implied edges.
    pub relationship: Option<ElementId>,
}

/// Full relationship graph of a model plus its projection table.
///
/// Borrows the model it was built from; rebuild it after the model changes.
pub struct LabeledPropertyGraph<'m> {
    model: &'m Model,
    graph: DiGraph<NodeData, EdgeData>,
    nodes: IndexMap<ElementId, NodeIndex>,
    forward: FxHashSet<(ElementId, ElementId, SmolStr)>,
    specs: IndexMap<SmolStr, ProjectionSpec>,
}

impl std::fmt::Debug for LabeledPropertyGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabeledPropertyGraph")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("projections", &self.specs.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<'m> LabeledPropertyGraph<'m> {
    /// Build the full graph with the built-in projections registered.
    pub fn new(model: &'m Model) -> Self {
        let mut lpg = Self {
            model,
            graph: DiGraph::new(),
            nodes: IndexMap::new(),
            forward: FxHashSet::default(),
            specs: IndexMap::new(),
        };
        for spec in default_projections() {
            lpg.register_projection(spec);
        }
        lpg.build();
        lpg
    }

    fn build(&mut self) {
        let model = self.model;
        for id in model.non_relationships() {
            self.ensure_node(id);
        }
        for id in model.relationships() {
            if !model.indexer().is_indexed(id) {
                debug!("Leaving unindexed relationship {id} out of the graph");
                continue;
            }
            let Some(element) = model.get(id) else {
                continue;
            };
            let Some(kind) = element.metatype().cloned() else {
                continue;
            };
            let endpoints = match relationship_endpoints(element, model.hints()) {
                Ok(endpoints) => endpoints,
                Err(err) => {
                    warn!("Leaving {id} out of the graph: {err}");
                    continue;
                }
            };
            for (source, target) in endpoints.pairs() {
                self.add_edge(source, target, kind.clone(), Some(id.clone()));
            }
        }
        self.add_implied_edges();
        debug!(
            "Built graph with {} node(s) and {} edge(s)",
            self.graph.node_count(),
            self.graph.edge_count()
        );
    }

    /// Edges that are not backed by a relationship element.
    ///
    /// `ImpliedReferentFeed`: a feature reference expression's result is fed
    /// by its referent. `ImpliedResultFeed`: a feature with a value is fed
    /// by the result of the value expression.
    fn add_implied_edges(&mut self) {
        let model = self.model;
        let reference = |id: &ElementId, key: &str| -> Option<ElementId> {
            model
                .find_element(id)?
                .raw(key)
                .ok()
                .flatten()
                .and_then(as_reference)
        };

        for expression in model.ids_of_metatype(metatypes::FEATURE_REFERENCE_EXPRESSION) {
            if let (Some(result), Some(referent)) = (
                reference(expression, "result"),
                reference(expression, "referent"),
            ) {
                self.add_edge(&result, &referent, metatypes::IMPLIED_REFERENT_FEED.into(), None);
            }
        }

        for relationship in model.ids_of_metatype(metatypes::FEATURE_VALUE) {
            let Some(element) = model.get(relationship) else {
                continue;
            };
            let Ok(endpoints) = relationship_endpoints(element, model.hints()) else {
                continue;
            };
            for (feature, value) in endpoints.pairs() {
                if let Some(result) = reference(value, "result") {
                    self.add_edge(feature, &result, metatypes::IMPLIED_RESULT_FEED.into(), None);
                }
            }
        }
    }

    fn ensure_node(&mut self, id: &ElementId) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(id) {
            return idx;
        }
        let metatype = self.model.metatype_of(id).cloned();
        let idx = self.graph.add_node(NodeData {
            id: id.clone(),
            metatype,
        });
        self.nodes.insert(id.clone(), idx);
        idx
    }

    fn add_edge(
        &mut self,
        source: &ElementId,
        target: &ElementId,
        kind: SmolStr,
        relationship: Option<ElementId>,
    ) {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        trace!("[GRAPH] {source} -{kind}-> {target}");
        self.forward
            .insert((source.clone(), target.clone(), kind.clone()));
        self.graph.add_edge(from, to, EdgeData { kind, relationship });
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of stored (forward) edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &ElementId) -> Option<&NodeData> {
        self.nodes.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.values().map(|&idx| &self.graph[idx])
    }

    /// The metatype of a node, `None` for unknown endpoints.
    pub fn metatype(&self, id: &ElementId) -> Option<&str> {
        self.node(id)?.metatype.as_deref()
    }

    /// Whether an edge with this label runs from `source` to `target`.
    ///
    /// A reverse label matches the stored forward edge `target → source`.
    pub fn has_edge(&self, source: &ElementId, target: &ElementId, label: &EdgeLabel) -> bool {
        let (from, to) = if label.reverse {
            (target, source)
        } else {
            (source, target)
        };
        self.forward
            .contains(&(from.clone(), to.clone(), label.kind.clone()))
    }

    /// All stored edges as `(source, target, data)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&ElementId, &ElementId, &EdgeData)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()].id,
                &self.graph[edge.target()].id,
                edge.weight(),
            )
        })
    }

    /// Stored edges of one relationship kind.
    pub fn edges_of_kind<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = (&'a ElementId, &'a ElementId, &'a EdgeData)> + 'a {
        self.edges().filter(move |(_, _, data)| data.kind.as_str() == kind)
    }

    /// Register (or replace) a projection definition.
    pub fn register_projection(&mut self, spec: ProjectionSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }

    /// Names of registered projections, in registration order.
    pub fn projection_names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(SmolStr::as_str)
    }

    pub fn projection_spec(&self, name: &str) -> Option<&ProjectionSpec> {
        self.specs.get(name)
    }

    /// Build a registered projection by name.
    pub fn get_projection(&self, name: &str) -> Result<Projection, GraphError> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| GraphError::UnknownProjection(name.to_string()))?;
        Ok(self.project(spec))
    }

    /// Filter the full graph through `spec`.
    ///
    /// Each stored edge is offered once per label `spec` allows for its
    /// kind: forward as stored, reverse with endpoints swapped. Edges whose
    /// endpoints fail the metatype constraints are dropped.
    pub fn project(&self, spec: &ProjectionSpec) -> Projection {
        let labels = spec.allowed_labels();
        let mut projection = Projection::new(spec.name.clone());
        for edge in self.graph.edge_references() {
            let data = edge.weight();
            let stored_source = &self.graph[edge.source()];
            let stored_target = &self.graph[edge.target()];
            for label in labels.iter().filter(|l| l.kind == data.kind) {
                let (source, target) = if label.reverse {
                    (stored_target, stored_source)
                } else {
                    (stored_source, stored_target)
                };
                if !spec.accepts(
                    label,
                    source.metatype.as_deref(),
                    target.metatype.as_deref(),
                ) {
                    continue;
                }
                projection.add_edge(
                    &source.id,
                    &target.id,
                    ProjectedEdge {
                        label: (*label).clone(),
                        relationship: data.relationship.clone(),
                    },
                    spec.multi,
                );
            }
        }
        debug!(
            "Projection {}: {} node(s), {} edge(s)",
            spec.name,
            projection.node_count(),
            projection.edge_count()
        );
        projection
    }
}
