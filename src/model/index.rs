//! Derivation of through/reverse adjacency from relationship elements.

use super::ModelError;
use super::element::{Element, as_references};
use super::hints::MetamodelHints;
use crate::base::ElementId;
use indexmap::{IndexMap, IndexSet};
use tracing::{trace, warn};

/// Endpoints of a relationship element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub sources: Vec<ElementId>,
    pub targets: Vec<ElementId>,
}

impl Endpoints {
    /// Every (source, target) combination.
    pub fn pairs(&self) -> impl Iterator<Item = (&ElementId, &ElementId)> {
        self.sources
            .iter()
            .flat_map(move |s| self.targets.iter().map(move |t| (s, t)))
    }
}

/// Read the endpoints of a relationship element.
///
/// Each endpoint key may hold a single reference or a list of them; both
/// must be non-empty.
pub fn relationship_endpoints(
    element: &Element,
    hints: &MetamodelHints,
) -> Result<Endpoints, ModelError> {
    let id = element.id();
    let data = element.data()?;
    let read = |key: &str| -> Result<Vec<ElementId>, ModelError> {
        let value = data
            .get(key)
            .ok_or_else(|| ModelError::malformed(id, format!("missing `{key}`")))?;
        let refs = as_references(value)
            .ok_or_else(|| ModelError::malformed(id, format!("`{key}` is not a reference")))?;
        if refs.is_empty() {
            return Err(ModelError::malformed(id, format!("`{key}` is empty")));
        }
        Ok(refs)
    };
    Ok(Endpoints {
        sources: read(hints.source_key())?,
        targets: read(hints.target_key())?,
    })
}

/// Attaches `through<Kind>`/`reverse<Kind>` adjacency to relationship
/// endpoints.
///
/// Relationships are queued as they are added and indexed in a batch, so
/// that endpoints appearing later in the input are found. A relationship
/// whose endpoints cannot be resolved is skipped with a warning and kept
/// aside for [`requeue_skipped`](Self::requeue_skipped).
#[derive(Clone, Debug, Default)]
pub struct RelationshipIndexer {
    pending: IndexSet<ElementId>,
    indexed: IndexSet<ElementId>,
    skipped: IndexSet<ElementId>,
}

impl RelationshipIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a relationship for indexing. Already indexed ids are ignored.
    pub fn enqueue(&mut self, id: ElementId) {
        if !self.indexed.contains(&id) {
            self.skipped.shift_remove(&id);
            self.pending.insert(id);
        }
    }

    /// Index every queued relationship. Returns the number of through
    /// entries added.
    pub fn index_pending(
        &mut self,
        elements: &mut IndexMap<ElementId, Element>,
        hints: &MetamodelHints,
    ) -> usize {
        let mut added = 0;
        for id in std::mem::take(&mut self.pending) {
            match index_relationship(elements, hints, &id) {
                Ok(count) => {
                    trace!("[INDEX] {id}: {count} through/reverse pair(s)");
                    added += count;
                    self.indexed.insert(id);
                }
                Err(err) => {
                    warn!("Skipping relationship while indexing: {err}");
                    self.skipped.insert(id);
                }
            }
        }
        added
    }

    /// Move skipped relationships back onto the queue.
    pub fn requeue_skipped(&mut self) {
        let skipped = std::mem::take(&mut self.skipped);
        self.pending.extend(skipped);
    }

    /// Relationships queued for the next [`index_pending`](Self::index_pending).
    pub fn pending(&self) -> impl Iterator<Item = &ElementId> {
        self.pending.iter()
    }

    pub fn is_indexed(&self, id: &ElementId) -> bool {
        self.indexed.contains(id)
    }

    /// Relationships that failed to index.
    pub fn skipped(&self) -> impl Iterator<Item = &ElementId> {
        self.skipped.iter()
    }
}

fn index_relationship(
    elements: &mut IndexMap<ElementId, Element>,
    hints: &MetamodelHints,
    id: &ElementId,
) -> Result<usize, ModelError> {
    let relationship = elements
        .get(id)
        .ok_or_else(|| ModelError::NotFound(id.clone()))?;
    let kind = relationship.data()?.metatype().clone();
    let endpoints = relationship_endpoints(relationship, hints)?;

    if let Some(missing) = endpoints
        .sources
        .iter()
        .chain(&endpoints.targets)
        .find(|endpoint| !elements.contains_key(*endpoint))
    {
        return Err(ModelError::malformed(
            id,
            format!("endpoint {missing} is not in the model"),
        ));
    }

    let mut count = 0;
    for (source, target) in endpoints.pairs() {
        if let Some(element) = elements.get_mut(source) {
            element.derived_mut().push_through(&kind, target.clone());
        }
        if let Some(element) = elements.get_mut(target) {
            element.derived_mut().push_reverse(&kind, source.clone());
        }
        count += 1;
    }
    Ok(count)
}
