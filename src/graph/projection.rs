//! Named projections: edge-label-filtered subgraphs of the full graph.

use super::GraphError;
use super::edge::EdgeLabel;
use crate::base::{ElementId, Metatype, metatypes};
use indexmap::IndexMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::collections::VecDeque;
use tracing::{trace, warn};

/// Names of the built-in projections.
pub mod names {
    /// `Superclassing^-1` between part definitions (general → specific).
    pub const PART_DEFINITION_GRAPH: &str = "Part Definition Graph";
    /// Generalization, typing, and membership pointing toward usage context.
    pub const EXPANDED_BANDED: &str = "Expanded Banded";
    /// Value flow between expressions and features (consumer → producer).
    pub const EXPRESSION_INFERRED: &str = "Expression Inferred";
    /// `Superclassing` over all types (specific → general).
    pub const GENERALIZATION: &str = "Generalization";
    /// `FeatureTyping` from part/port usages to their types.
    pub const PART_TYPING: &str = "Part Typing";
    /// `FeatureMembership^-1` from part/port usages to their owning types.
    pub const PART_FEATURING: &str = "Part Featuring";
}

/// Feature metatypes admitted by the part-oriented projections.
const PART_FEATURES: &[&str] = &[metatypes::PART_USAGE, metatypes::PORT_USAGE];

// ============================================================================
// RULES
// ============================================================================

/// One allowed edge label, optionally constrained by endpoint metatypes.
///
/// Endpoints are in edge direction: for a reverse label the source is the
/// relationship's target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRule {
    pub label: EdgeLabel,
    pub source_metatypes: Option<Vec<Metatype>>,
    pub target_metatypes: Option<Vec<Metatype>>,
}

impl EdgeRule {
    pub fn new(label: EdgeLabel) -> Self {
        Self {
            label,
            source_metatypes: None,
            target_metatypes: None,
        }
    }

    pub fn with_source_metatypes(mut self, allowed: &[&str]) -> Self {
        self.source_metatypes = Some(allowed.iter().map(SmolStr::new).collect());
        self
    }

    pub fn with_target_metatypes(mut self, allowed: &[&str]) -> Self {
        self.target_metatypes = Some(allowed.iter().map(SmolStr::new).collect());
        self
    }

    /// Whether an edge with these endpoint metatypes passes the rule.
    /// Unknown metatypes (proxies) fail any constraint.
    pub fn accepts(&self, source: Option<&str>, target: Option<&str>) -> bool {
        fn allowed(constraint: &Option<Vec<Metatype>>, metatype: Option<&str>) -> bool {
            match constraint {
                None => true,
                Some(allowed) => metatype.is_some_and(|m| allowed.iter().any(|a| a == m)),
            }
        }
        allowed(&self.source_metatypes, source) && allowed(&self.target_metatypes, target)
    }
}

/// Definition of a named projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectionSpec {
    pub name: SmolStr,
    pub rules: Vec<EdgeRule>,
    /// Keep parallel edges between the same pair; otherwise the first
    /// accepted edge wins.
    pub multi: bool,
}

impl ProjectionSpec {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: SmolStr::new(name),
            rules: Vec::new(),
            multi: false,
        }
    }

    pub fn with_rule(mut self, rule: EdgeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Allow a label with no endpoint constraint.
    pub fn allow(self, label: EdgeLabel) -> Self {
        self.with_rule(EdgeRule::new(label))
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// The distinct labels this projection admits.
    pub fn allowed_labels(&self) -> Vec<&EdgeLabel> {
        let mut labels: Vec<&EdgeLabel> = Vec::new();
        for rule in &self.rules {
            if !labels.contains(&&rule.label) {
                labels.push(&rule.label);
            }
        }
        labels
    }

    /// Whether an edge passes any rule for its label.
    pub fn accepts(&self, label: &EdgeLabel, source: Option<&str>, target: Option<&str>) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.label == *label && rule.accepts(source, target))
    }
}

/// The built-in projection table.
pub fn default_projections() -> Vec<ProjectionSpec> {
    use metatypes::*;
    vec![
        ProjectionSpec::new(names::PART_DEFINITION_GRAPH).with_rule(
            EdgeRule::new(EdgeLabel::reversed(SUPERCLASSING))
                .with_source_metatypes(&[PART_DEFINITION])
                .with_target_metatypes(&[PART_DEFINITION]),
        ),
        ProjectionSpec::new(names::EXPANDED_BANDED)
            .allow(EdgeLabel::forward(SUPERCLASSING))
            .with_rule(
                EdgeRule::new(EdgeLabel::reversed(FEATURE_TYPING))
                    .with_target_metatypes(PART_FEATURES),
            )
            .with_rule(
                EdgeRule::new(EdgeLabel::reversed(FEATURE_MEMBERSHIP))
                    .with_source_metatypes(PART_FEATURES),
            ),
        ProjectionSpec::new(names::EXPRESSION_INFERRED)
            .allow(EdgeLabel::reversed(RETURN_PARAMETER_MEMBERSHIP))
            .allow(EdgeLabel::forward(PARAMETER_MEMBERSHIP))
            .allow(EdgeLabel::forward(FEATURE_VALUE))
            .with_rule(
                EdgeRule::new(EdgeLabel::reversed(REDEFINITION))
                    .with_source_metatypes(&[ATTRIBUTE_USAGE])
                    .with_target_metatypes(&[ATTRIBUTE_USAGE]),
            )
            .allow(EdgeLabel::forward(IMPLIED_REFERENT_FEED))
            .allow(EdgeLabel::forward(IMPLIED_RESULT_FEED))
            .multi(true),
        ProjectionSpec::new(names::GENERALIZATION).allow(EdgeLabel::forward(SUPERCLASSING)),
        ProjectionSpec::new(names::PART_TYPING).with_rule(
            EdgeRule::new(EdgeLabel::forward(FEATURE_TYPING)).with_source_metatypes(PART_FEATURES),
        ),
        ProjectionSpec::new(names::PART_FEATURING).with_rule(
            EdgeRule::new(EdgeLabel::reversed(FEATURE_MEMBERSHIP))
                .with_source_metatypes(PART_FEATURES),
        ),
    ]
}

// ============================================================================
// PROJECTION
// ============================================================================

/// An edge of a projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectedEdge {
    pub label: EdgeLabel,
    /// The relationship element behind the edge; `None` for implied edges.
    pub relationship: Option<ElementId>,
}

/// A borrowed edge with resolved endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeView<'p> {
    pub source: &'p ElementId,
    pub target: &'p ElementId,
    pub edge: &'p ProjectedEdge,
}

impl EdgeView<'_> {
    pub fn label(&self) -> &EdgeLabel {
        &self.edge.label
    }
}

/// A read-only subgraph built from a [`ProjectionSpec`].
///
/// Nodes are element ids; nothing is owned beyond the ids. Built from a
/// snapshot of the model, so it must be rebuilt after the model changes.
#[derive(Clone, Debug)]
pub struct Projection {
    name: SmolStr,
    graph: DiGraph<ElementId, ProjectedEdge>,
    nodes: IndexMap<ElementId, NodeIndex>,
}

impl Projection {
    pub(crate) fn new(name: SmolStr) -> Self {
        Self {
            name,
            graph: DiGraph::new(),
            nodes: IndexMap::new(),
        }
    }

    fn ensure_node(&mut self, id: &ElementId) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.nodes.insert(id.clone(), idx);
        idx
    }

    /// Add an edge. Without `multi`, an existing edge between the same
    /// pair wins and the new one is dropped.
    pub(crate) fn add_edge(
        &mut self,
        source: &ElementId,
        target: &ElementId,
        edge: ProjectedEdge,
        multi: bool,
    ) -> bool {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        if !multi && self.graph.find_edge(from, to).is_some() {
            trace!("[PROJECTION] {}: dropping parallel {} edge", self.name, edge.label);
            return false;
        }
        self.graph.add_edge(from, to, edge);
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Fail with `NotInProjection` unless `id` has a node here.
    pub fn require(&self, id: &ElementId) -> Result<(), GraphError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::NotInProjection {
                projection: self.name.to_string(),
                id: id.clone(),
            })
        }
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.nodes.keys()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(|edge| self.view(edge.id()))
    }

    fn view(&self, edge: EdgeIndex) -> EdgeView<'_> {
        let (from, to) = self.graph.edge_endpoints(edge).unwrap_or_default();
        EdgeView {
            source: &self.graph[from],
            target: &self.graph[to],
            edge: &self.graph[edge],
        }
    }

    /// Edges touching `node` in one direction, in insertion order.
    fn edges_in_order(&self, node: NodeIndex, direction: Direction) -> Vec<EdgeIndex> {
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(node, direction)
            .map(|e| e.id())
            .collect();
        edges.sort_unstable();
        edges
    }

    fn neighbors_in_order(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut seen = FxHashSet::default();
        self.edges_in_order(node, direction)
            .into_iter()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(from, to)| match direction {
                Direction::Outgoing => to,
                Direction::Incoming => from,
            })
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Distinct successors of `id`; empty if `id` is not in the projection.
    pub fn successors(&self, id: &ElementId) -> Vec<&ElementId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Distinct predecessors of `id`; empty if `id` is not in the projection.
    pub fn predecessors(&self, id: &ElementId) -> Vec<&ElementId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &ElementId, direction: Direction) -> Vec<&ElementId> {
        let Some(&node) = self.nodes.get(id) else {
            return Vec::new();
        };
        self.neighbors_in_order(node, direction)
            .into_iter()
            .map(|n| &self.graph[n])
            .collect()
    }

    /// Number of incoming edges (parallel edges counted).
    pub fn in_degree(&self, id: &ElementId) -> usize {
        self.degree(id, Direction::Incoming)
    }

    /// Number of outgoing edges (parallel edges counted).
    pub fn out_degree(&self, id: &ElementId) -> usize {
        self.degree(id, Direction::Outgoing)
    }

    fn degree(&self, id: &ElementId, direction: Direction) -> usize {
        self.nodes
            .get(id)
            .map_or(0, |&n| self.graph.edges_directed(n, direction).count())
    }

    /// Nodes with no incoming edge, in insertion order.
    pub fn roots(&self) -> Vec<&ElementId> {
        self.node_ids().filter(|id| self.in_degree(id) == 0).collect()
    }

    /// Nodes with no outgoing edge, in insertion order.
    pub fn sinks(&self) -> Vec<&ElementId> {
        self.node_ids().filter(|id| self.out_degree(id) == 0).collect()
    }

    /// Labels of all edges from `source` to `target`.
    pub fn labels_between(&self, source: &ElementId, target: &ElementId) -> Vec<&EdgeLabel> {
        let (Some(&from), Some(&to)) = (self.nodes.get(source), self.nodes.get(target)) else {
            return Vec::new();
        };
        self.graph
            .edges_connecting(from, to)
            .map(|e| &e.weight().label)
            .collect()
    }

    /// Whether `to` is reachable from `from`.
    pub fn has_path(&self, from: &ElementId, to: &ElementId) -> bool {
        match (self.nodes.get(from), self.nodes.get(to)) {
            (Some(&a), Some(&b)) => petgraph::algo::has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    /// Nodes reachable from `id`, breadth first, excluding `id` itself
    /// unless a cycle leads back to it.
    pub fn reachable(&self, id: &ElementId) -> Vec<&ElementId> {
        let Some(&start) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        let mut found = Vec::new();
        while let Some(node) = queue.pop_front() {
            for next in self.neighbors_in_order(node, Direction::Outgoing) {
                if visited.insert(next) {
                    found.push(&self.graph[next]);
                    queue.push_back(next);
                }
            }
        }
        found
    }

    /// Every simple path from `from` to `to`, as id sequences.
    ///
    /// Cycles are never followed. At most `limit` paths are returned; hitting
    /// the limit is logged. `from == to` has no paths.
    pub fn all_simple_paths(
        &self,
        from: &ElementId,
        to: &ElementId,
        limit: usize,
    ) -> Vec<Vec<ElementId>> {
        let (Some(&start), Some(&goal)) = (self.nodes.get(from), self.nodes.get(to)) else {
            return Vec::new();
        };
        if start == goal {
            return Vec::new();
        }
        let mut paths = Vec::new();
        let mut path = vec![start];
        let mut on_path: FxHashSet<NodeIndex> = [start].into_iter().collect();
        self.collect_paths(goal, limit, &mut path, &mut on_path, &mut paths);
        if paths.len() >= limit {
            warn!(
                "{}: stopped after {limit} paths from {from} to {to}",
                self.name
            );
        }
        paths
            .into_iter()
            .map(|p| p.into_iter().map(|n| self.graph[n].clone()).collect())
            .collect()
    }

    fn collect_paths(
        &self,
        goal: NodeIndex,
        limit: usize,
        path: &mut Vec<NodeIndex>,
        on_path: &mut FxHashSet<NodeIndex>,
        paths: &mut Vec<Vec<NodeIndex>>,
    ) {
        let Some(&current) = path.last() else {
            return;
        };
        for next in self.neighbors_in_order(current, Direction::Outgoing) {
            if paths.len() >= limit {
                return;
            }
            if next == goal {
                let mut found = path.clone();
                found.push(next);
                paths.push(found);
            } else if on_path.insert(next) {
                path.push(next);
                self.collect_paths(goal, limit, path, on_path, paths);
                path.pop();
                on_path.remove(&next);
            }
        }
    }

    /// Edges reachable from `root` in edge-breadth-first order.
    ///
    /// Each edge is yielded exactly once, when its source is dequeued; the
    /// source's outgoing edges come in insertion order. Terminates on cyclic
    /// input.
    pub fn edge_bfs(&self, root: &ElementId) -> Vec<EdgeView<'_>> {
        let Some(&start) = self.nodes.get(root) else {
            return Vec::new();
        };
        let mut visited: FxHashSet<NodeIndex> = [start].into_iter().collect();
        let mut queue = VecDeque::from([start]);
        let mut order = Vec::new();
        while let Some(node) = queue.pop_front() {
            for edge in self.edges_in_order(node, Direction::Outgoing) {
                if let Some((_, child)) = self.graph.edge_endpoints(edge) {
                    if visited.insert(child) {
                        queue.push_back(child);
                    }
                }
                order.push(self.view(edge));
            }
        }
        order
    }

    /// Weakly connected components, each in node insertion order.
    pub fn weakly_connected_components(&self) -> Vec<Vec<ElementId>> {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        let labels = sets.into_labeling();
        let mut components: IndexMap<usize, Vec<ElementId>> = IndexMap::new();
        for (id, node) in &self.nodes {
            components
                .entry(labels[node.index()])
                .or_default()
                .push(id.clone());
        }
        components.into_values().collect()
    }

    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// The induced subgraph on `ids`.
    pub fn subgraph(&self, ids: &[ElementId]) -> Projection {
        let keep: FxHashSet<&ElementId> = ids.iter().collect();
        let mut sub = Projection::new(self.name.clone());
        for id in self.node_ids().filter(|id| keep.contains(id)) {
            sub.ensure_node(id);
        }
        for edge in self.edges() {
            if keep.contains(edge.source) && keep.contains(edge.target) {
                sub.add_edge(edge.source, edge.target, edge.edge.clone(), true);
            }
        }
        sub
    }
}
