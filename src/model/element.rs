//! Model elements.
//!
//! An [`Element`] is either a proxy (only its id is known) or resolved
//! (its full JSON record is present). Relationship adjacency derived by the
//! [`RelationshipIndexer`](super::RelationshipIndexer) lives beside the raw
//! record in [`DerivedAttributes`] so that proxies can be endpoints too.

use super::ModelError;
use super::hints::MetamodelHints;
use crate::base::{ElementId, Metatype};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use smol_str::SmolStr;
use std::cell::OnceCell;

/// A raw element record: the JSON object as exchanged.
pub type Record = Map<String, Value>;

pub const ID_KEY: &str = "@id";
pub const TYPE_KEY: &str = "@type";

const THROUGH_PREFIX: &str = "through";
const REVERSE_PREFIX: &str = "reverse";

// ============================================================================
// ELEMENT DATA
// ============================================================================

/// The full data of a resolved element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementData {
    metatype: Metatype,
    record: Record,
    is_relationship: bool,
}

impl ElementData {
    /// The `@type` of the element.
    pub fn metatype(&self) -> &Metatype {
        &self.metatype
    }

    /// The raw record, including `@id` and `@type`.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// A raw attribute value; JSON `null` reads as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key).filter(|v| !v.is_null())
    }

    /// Whether the record carries both endpoint keys.
    pub fn is_relationship(&self) -> bool {
        self.is_relationship
    }
}

/// Resolution state of an element.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementState {
    /// Identifier known, data not yet fetched.
    Proxy,
    /// Full data present.
    Resolved(ElementData),
}

// ============================================================================
// DERIVED ATTRIBUTES
// ============================================================================

/// Through/reverse adjacency keyed by relationship kind.
///
/// For a relationship of kind `T`, every source gets a `through` entry for
/// each target and every target gets a `reverse` entry for each source.
/// Append-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedAttributes {
    through: IndexMap<SmolStr, Vec<ElementId>>,
    reverse: IndexMap<SmolStr, Vec<ElementId>>,
}

impl DerivedAttributes {
    pub(crate) fn push_through(&mut self, kind: &str, target: ElementId) {
        self.through.entry(SmolStr::new(kind)).or_default().push(target);
    }

    pub(crate) fn push_reverse(&mut self, kind: &str, source: ElementId) {
        self.reverse.entry(SmolStr::new(kind)).or_default().push(source);
    }

    /// Targets reached from this element through relationships of `kind`.
    pub fn through(&self, kind: &str) -> &[ElementId] {
        self.through.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sources reaching this element through relationships of `kind`.
    pub fn reverse(&self, kind: &str) -> &[ElementId] {
        self.reverse.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up by derived attribute name, e.g. `throughFeatureTyping`.
    pub fn get(&self, key: &str) -> Option<&[ElementId]> {
        if let Some(kind) = key.strip_prefix(THROUGH_PREFIX) {
            self.through.get(kind).map(Vec::as_slice)
        } else if let Some(kind) = key.strip_prefix(REVERSE_PREFIX) {
            self.reverse.get(kind).map(Vec::as_slice)
        } else {
            None
        }
    }

    /// All derived attribute names present, e.g. `throughSuperclassing`.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.through
            .keys()
            .map(|k| format!("{THROUGH_PREFIX}{k}"))
            .chain(self.reverse.keys().map(|k| format!("{REVERSE_PREFIX}{k}")))
    }

    pub fn is_empty(&self) -> bool {
        self.through.is_empty() && self.reverse.is_empty()
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

/// A model element.
///
/// The identifier never changes. Mutating the record of a resolved element
/// after it has been read is not supported; the cached label and derived
/// adjacency would go stale.
#[derive(Clone, Debug)]
pub struct Element {
    id: ElementId,
    state: ElementState,
    derived: DerivedAttributes,
    label: OnceCell<String>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.state == other.state && self.derived == other.derived
    }
}

impl Element {
    /// Create a proxy for an element whose data has not been fetched.
    pub fn proxy(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            state: ElementState::Proxy,
            derived: DerivedAttributes::default(),
            label: OnceCell::new(),
        }
    }

    /// Build a resolved element from a raw record.
    ///
    /// The record must carry a string `@id` and a string `@type`.
    pub fn from_record(record: Record, hints: &MetamodelHints) -> Result<Self, ModelError> {
        let id = match record.get(ID_KEY) {
            Some(Value::String(s)) => ElementId::new(s.as_str()),
            _ => return Err(ModelError::InvalidRecord("missing string @id".to_string())),
        };
        let metatype = match record.get(TYPE_KEY) {
            Some(Value::String(s)) => SmolStr::new(s),
            _ => {
                return Err(ModelError::InvalidRecord(format!(
                    "element {id} has no string @type"
                )));
            }
        };
        let present = |key: &str| record.get(key).is_some_and(|v| !v.is_null());
        let is_relationship = present(hints.source_key()) && present(hints.target_key());

        Ok(Self {
            id,
            state: ElementState::Resolved(ElementData {
                metatype,
                record,
                is_relationship,
            }),
            derived: DerivedAttributes::default(),
            label: OnceCell::new(),
        })
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn state(&self) -> &ElementState {
        &self.state
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self.state, ElementState::Proxy)
    }

    pub fn is_resolved(&self) -> bool {
        !self.is_proxy()
    }

    /// The resolved data, or `NotResolved` for a proxy.
    pub fn data(&self) -> Result<&ElementData, ModelError> {
        match &self.state {
            ElementState::Resolved(data) => Ok(data),
            ElementState::Proxy => Err(ModelError::NotResolved(self.id.clone())),
        }
    }

    /// The metatype, if resolved.
    pub fn metatype(&self) -> Option<&Metatype> {
        self.data().ok().map(ElementData::metatype)
    }

    /// True only for resolved elements with both endpoint keys.
    pub fn is_relationship(&self) -> bool {
        self.data().is_ok_and(ElementData::is_relationship)
    }

    /// A raw attribute value; fails for proxies.
    pub fn raw(&self, key: &str) -> Result<Option<&Value>, ModelError> {
        Ok(self.data()?.get(key))
    }

    /// The element's name (`name`, falling back to `declaredName`).
    pub fn name(&self) -> Option<&str> {
        let data = self.data().ok()?;
        ["name", "declaredName"]
            .into_iter()
            .find_map(|key| data.get(key).and_then(Value::as_str))
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.data()
            .ok()?
            .get("qualifiedName")
            .and_then(Value::as_str)
    }

    pub fn derived(&self) -> &DerivedAttributes {
        &self.derived
    }

    pub(crate) fn derived_mut(&mut self) -> &mut DerivedAttributes {
        &mut self.derived
    }

    pub(crate) fn cached_label(&self, render: impl FnOnce() -> String) -> &str {
        self.label.get_or_init(render)
    }

    /// Replace a proxy's state with resolved data, keeping derived adjacency.
    pub(crate) fn resolve_with(&mut self, resolved: Element) {
        self.state = resolved.state;
        self.label = OnceCell::new();
    }

    /// The record written back out on save, re-tagged with the identifier.
    pub fn to_record(&self) -> Option<Record> {
        let data = self.data().ok()?;
        let mut record = data.record.clone();
        record.insert(ID_KEY.to_string(), Value::String(self.id.to_string()));
        Some(record)
    }
}

// ============================================================================
// REFERENCE SHAPES
// ============================================================================

/// Read a single `{"@id": ...}` reference.
pub fn as_reference(value: &Value) -> Option<ElementId> {
    match value {
        Value::Object(obj) => match obj.get(ID_KEY) {
            Some(Value::String(s)) => Some(ElementId::new(s.as_str())),
            _ => None,
        },
        _ => None,
    }
}

/// Read a reference or a list of references.
///
/// Returns `None` if any member of a list is not a reference.
pub fn as_references(value: &Value) -> Option<Vec<ElementId>> {
    match value {
        Value::Array(items) => items.iter().map(as_reference).collect(),
        other => as_reference(other).map(|id| vec![id]),
    }
}
