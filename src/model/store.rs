//! The model: single authoritative arena of elements plus derived indexes.
//!
//! ```text
//! Model
//! ├── elements: IndexMap<ElementId, Element>   (insertion order, arena)
//! ├── relationships / non_relationships        (IndexSet<ElementId>)
//! ├── by_metatype: metatype → ids
//! ├── owned: owner id → owned ids
//! ├── indexer: RelationshipIndexer              (through/reverse adjacency)
//! ├── referenced: read-only fallback models
//! └── source: optional ElementSource for lazy resolution
//! ```

use super::ModelError;
use super::element::{Element, ElementData, as_reference};
use super::hints::{MetamodelHints, ModelOptions};
use super::index::{RelationshipIndexer, relationship_endpoints};
use super::source::ElementSource;
use super::view::ElementRef;
use crate::base::{ElementId, Metatype};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// A SysML v2 model built from exchange records.
///
/// Elements are owned here and nowhere else; everything that points at an
/// element does so by [`ElementId`] and re-resolves through this map.
#[derive(Clone)]
pub struct Model {
    elements: IndexMap<ElementId, Element>,
    hints: Arc<MetamodelHints>,
    options: ModelOptions,
    origin: Option<String>,

    relationships: IndexSet<ElementId>,
    non_relationships: IndexSet<ElementId>,
    by_metatype: FxHashMap<Metatype, IndexSet<ElementId>>,
    owned: FxHashMap<ElementId, IndexSet<ElementId>>,
    indexer: RelationshipIndexer,
    batch_depth: usize,

    referenced: Vec<Arc<Model>>,
    source: Option<Arc<dyn ElementSource>>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("origin", &self.origin)
            .field("elements", &self.elements.len())
            .field("relationships", &self.relationships.len())
            .field("referenced", &self.referenced.len())
            .field("has_source", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "<SysML v2 Model ({origin})>"),
            None => write!(f, "<SysML v2 Model ({} elements)>", self.elements.len()),
        }
    }
}

impl Model {
    /// Create an empty model with SysML hints and default options.
    pub fn new() -> Self {
        Self::with_config(Arc::new(MetamodelHints::sysml()), ModelOptions::default())
    }

    /// Create an empty model with explicit configuration.
    pub fn with_config(hints: Arc<MetamodelHints>, options: ModelOptions) -> Self {
        Self {
            elements: IndexMap::new(),
            hints,
            options,
            origin: None,
            relationships: IndexSet::new(),
            non_relationships: IndexSet::new(),
            by_metatype: FxHashMap::default(),
            owned: FxHashMap::default(),
            indexer: RelationshipIndexer::new(),
            batch_depth: 0,
            referenced: Vec::new(),
            source: None,
        }
    }

    /// Build a model from already-constructed elements.
    ///
    /// Relationships are indexed once, after every element is present.
    pub fn from_elements(
        elements: impl IntoIterator<Item = Element>,
        hints: Arc<MetamodelHints>,
        options: ModelOptions,
    ) -> Self {
        let mut model = Self::with_config(hints, options);
        model.extend(elements);
        model
    }

    /// Add many elements, indexing relationships once at the end.
    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.batch_depth += 1;
        for element in elements {
            self.add_element(element);
        }
        self.batch_depth -= 1;
        self.flush_index();
        debug!(
            "Model holds {} element(s), {} relationship(s)",
            self.elements.len(),
            self.relationships.len()
        );
    }

    // ── Configuration ───────────────────────────────────────────────

    pub fn hints(&self) -> &Arc<MetamodelHints> {
        &self.hints
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Where the model was loaded from (file path, URL, ...).
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = Some(origin.into());
    }

    /// Consult `model` for ids that are not present locally.
    pub fn add_referenced_model(&mut self, model: Arc<Model>) {
        self.referenced.push(model);
    }

    /// Enable lazy resolution through an external source.
    pub fn set_source(&mut self, source: Arc<dyn ElementSource>) {
        self.source = Some(source);
    }

    // ── Insertion ───────────────────────────────────────────────────

    /// Insert an element. Idempotent per id.
    ///
    /// Re-adding an id that is already resolved leaves the model unchanged.
    /// Adding resolved data for a proxy resolves it in place. Relationship
    /// adjacency is derived immediately, except inside [`extend`](Self::extend).
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id().clone();
        match self.elements.get_mut(&id) {
            Some(existing) if existing.is_resolved() => {
                trace!("[MODEL] {id} already resolved, ignoring re-insertion");
                return id;
            }
            Some(existing) => {
                if element.is_proxy() {
                    return id;
                }
                existing.resolve_with(element);
            }
            None => {
                self.elements.insert(id.clone(), element);
            }
        }
        self.update_indexes(&id);
        if self.batch_depth == 0 {
            self.flush_index();
        }
        id
    }

    /// Register an id whose data is not yet available.
    pub fn add_proxy(&mut self, id: impl Into<ElementId>) -> ElementId {
        self.add_element(Element::proxy(id))
    }

    fn update_indexes(&mut self, id: &ElementId) {
        let Some(element) = self.elements.get(id) else {
            return;
        };
        let Ok(data) = element.data() else {
            return;
        };
        let owner = owner_reference(data, &self.hints);
        let metatype = data.metatype().clone();
        if data.is_relationship() {
            self.relationships.insert(id.clone());
            self.indexer.enqueue(id.clone());
        } else {
            self.non_relationships.insert(id.clone());
        }
        self.by_metatype
            .entry(metatype)
            .or_default()
            .insert(id.clone());
        if let Some(owner) = owner {
            self.owned.entry(owner).or_default().insert(id.clone());
        }
    }

    fn flush_index(&mut self) -> usize {
        self.proxy_referenced_endpoints();
        self.indexer.index_pending(&mut self.elements, &self.hints)
    }

    /// Give queued relationships a local proxy for every endpoint that only
    /// a referenced model holds, so adjacency can attach to it.
    fn proxy_referenced_endpoints(&mut self) {
        if self.referenced.is_empty() {
            return;
        }
        let supplied: Vec<ElementId> = self
            .indexer
            .pending()
            .filter_map(|id| self.elements.get(id))
            .filter_map(|relationship| relationship_endpoints(relationship, &self.hints).ok())
            .flat_map(|endpoints| endpoints.sources.into_iter().chain(endpoints.targets))
            .filter(|endpoint| !self.elements.contains_key(endpoint))
            .filter(|endpoint| {
                self.referenced
                    .iter()
                    .any(|model| model.find_element(endpoint).is_some())
            })
            .collect();
        for id in supplied {
            trace!("[MODEL] {id} supplied by a referenced model");
            self.elements
                .entry(id.clone())
                .or_insert_with(|| Element::proxy(id));
        }
    }

    /// Retry relationships that were skipped because an endpoint was
    /// missing, e.g. after adding a referenced model. Returns the number of
    /// through entries added.
    pub fn reindex_skipped(&mut self) -> usize {
        self.indexer.requeue_skipped();
        self.flush_index()
    }

    pub fn indexer(&self) -> &RelationshipIndexer {
        &self.indexer
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// The local arena entry for `id`, proxy or resolved.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// A resolved element from this model or a referenced one.
    pub fn find_element(&self, id: &ElementId) -> Option<ElementRef<'_>> {
        if let Some(element) = self.elements.get(id).filter(|e| e.is_resolved()) {
            return Some(ElementRef::new(element, self));
        }
        self.referenced
            .iter()
            .find_map(|model| model.find_element(id))
    }

    /// A resolved element, or an error.
    ///
    /// Fails with `NotResolved` for a local proxy no referenced model can
    /// supply, and with `NotFound` otherwise. Never performs I/O; use
    /// [`resolve`](Self::resolve) to fetch through the external source.
    pub fn get_element(&self, id: &ElementId) -> Result<ElementRef<'_>, ModelError> {
        if let Some(found) = self.find_element(id) {
            return Ok(found);
        }
        if self.elements.contains_key(id) {
            Err(ModelError::NotResolved(id.clone()))
        } else {
            Err(ModelError::NotFound(id.clone()))
        }
    }

    /// Like [`get_element`](Self::get_element), fetching missing or proxied
    /// elements from the external source when one is configured.
    pub fn resolve(&mut self, id: &ElementId) -> Result<ElementRef<'_>, ModelError> {
        if self.find_element(id).is_some() {
            return self.get_element(id);
        }
        let Some(source) = self.source.clone() else {
            return self.get_element(id);
        };
        debug!("Fetching element {id} from external source");
        let mut record = source
            .get_element_data(id)
            .map_err(|message| ModelError::Source {
                id: id.clone(),
                message,
            })?;
        record
            .entry(super::element::ID_KEY)
            .or_insert_with(|| serde_json::Value::String(id.to_string()));
        let element = Element::from_record(record, &self.hints)?;
        if element.id() != id {
            return Err(ModelError::Source {
                id: id.clone(),
                message: format!("source returned element {}", element.id()),
            });
        }
        self.add_element(element);
        self.get_element(id)
    }

    /// Resolve every local proxy through the external source.
    ///
    /// Returns the ids that could not be resolved.
    pub fn resolve_proxies(&mut self) -> Vec<(ElementId, ModelError)> {
        let proxies: Vec<ElementId> = self
            .elements
            .values()
            .filter(|e| e.is_proxy())
            .map(|e| e.id().clone())
            .collect();
        proxies
            .into_iter()
            .filter_map(|id| match self.resolve(&id) {
                Ok(_) => None,
                Err(err) => Some((id, err)),
            })
            .collect()
    }

    // ── Indexes ─────────────────────────────────────────────────────

    /// Iterate over all local elements in insertion order.
    pub fn iter_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Resolved elements as views, in insertion order.
    pub fn iter_resolved(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.elements
            .values()
            .filter(|e| e.is_resolved())
            .map(move |e| ElementRef::new(e, self))
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Ids of all relationship elements.
    pub fn relationships(&self) -> impl Iterator<Item = &ElementId> {
        self.relationships.iter()
    }

    /// Ids of all resolved non-relationship elements.
    pub fn non_relationships(&self) -> impl Iterator<Item = &ElementId> {
        self.non_relationships.iter()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Ids of every element with the given metatype.
    pub fn ids_of_metatype(&self, metatype: &str) -> impl Iterator<Item = &ElementId> {
        self.by_metatype.get(metatype).into_iter().flatten()
    }

    /// Every element with the given metatype.
    pub fn all_of_metatype(&self, metatype: &str) -> Vec<ElementRef<'_>> {
        self.ids_of_metatype(metatype)
            .filter_map(|id| self.find_element(id))
            .collect()
    }

    /// Metatypes present in the model.
    pub fn metatypes(&self) -> impl Iterator<Item = &Metatype> {
        self.by_metatype.keys()
    }

    /// Ids of elements whose owner reference points at `id`.
    pub fn owned_ids(&self, id: &ElementId) -> impl Iterator<Item = &ElementId> {
        self.owned.get(id).into_iter().flatten()
    }

    /// Resolved elements whose owner reference points at `id`.
    pub fn owned_elements(&self, id: &ElementId) -> Vec<ElementRef<'_>> {
        self.owned_ids(id)
            .filter_map(|owned| self.find_element(owned))
            .collect()
    }

    /// Resolved elements without an owner reference.
    pub fn roots(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.iter_resolved()
            .filter(move |e| e.data().is_some_and(|d| owner_reference(d, &self.hints).is_none()))
    }

    // ── Ownership ───────────────────────────────────────────────────

    /// The owner of an element.
    ///
    /// Walks the owner keys in priority order and takes the first present
    /// reference. `Ok(None)` at a root. An owner id that cannot be found is
    /// `NotFound`, or `Ok(None)` under lenient ownership.
    pub fn get_owner(&self, id: &ElementId) -> Result<Option<ElementRef<'_>>, ModelError> {
        let element = self.get_element(id)?;
        let Some(data) = element.data() else {
            return Ok(None);
        };
        let Some(owner_id) = owner_reference(data, &self.hints) else {
            return Ok(None);
        };
        match self.get_element(&owner_id) {
            Ok(owner) => Ok(Some(owner)),
            Err(err) if self.options.lenient_ownership => {
                debug!("Owner of {id} unresolved ({err}), treating as root");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    // ── Convenience accessors ───────────────────────────────────────

    /// The name of an element, if it is found and named.
    pub fn name_of(&self, id: &ElementId) -> Option<&str> {
        self.find_element(id).and_then(|e| e.name())
    }

    /// The metatype of an element, if it is found.
    pub fn metatype_of(&self, id: &ElementId) -> Option<&Metatype> {
        self.find_element(id).and_then(|e| e.metatype())
    }
}

/// The first owner reference by key priority.
fn owner_reference(data: &ElementData, hints: &MetamodelHints) -> Option<ElementId> {
    hints
        .owner_keys()
        .find_map(|key| data.get(key).and_then(as_reference))
}
