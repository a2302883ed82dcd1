//! Borrowed element views with explicit reference dereferencing.
//!
//! Attribute access never performs I/O. Whether an attribute is treated as
//! a reference is decided by the model's [`MetamodelHints`](super::MetamodelHints),
//! not by the shape of the value.

use super::ModelError;
use super::element::{Element, ElementData, as_references};
use super::store::Model;
use crate::base::{ElementId, Metatype};
use serde_json::Value;

/// A resolved or raw attribute value.
#[derive(Clone, Debug)]
pub enum Attribute<'m> {
    /// Key absent or `null`.
    Absent,
    /// A primitive value, or a reference that could not be resolved.
    Raw(&'m Value),
    /// A single resolved reference.
    Element(ElementRef<'m>),
    /// A resolved list of references.
    Elements(Vec<ElementRef<'m>>),
}

impl<'m> Attribute<'m> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Attribute::Absent)
    }

    /// The raw value, if this is not a resolved reference.
    pub fn as_raw(&self) -> Option<&'m Value> {
        match self {
            Attribute::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// The first resolved element, whether single or list valued.
    pub fn first_element(&self) -> Option<ElementRef<'m>> {
        match self {
            Attribute::Element(element) => Some(*element),
            Attribute::Elements(elements) => elements.first().copied(),
            _ => None,
        }
    }

    /// All resolved elements; empty for raw or absent values.
    pub fn into_elements(self) -> Vec<ElementRef<'m>> {
        match self {
            Attribute::Element(element) => vec![element],
            Attribute::Elements(elements) => elements,
            _ => Vec::new(),
        }
    }
}

/// A borrowed view of a resolved element together with the model that
/// owns it.
#[derive(Clone, Copy)]
pub struct ElementRef<'m> {
    element: &'m Element,
    model: &'m Model,
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ElementRef").field(self.element.id()).finish()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element.id() == other.element.id()
    }
}

impl Eq for ElementRef<'_> {}

impl std::fmt::Display for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl<'m> ElementRef<'m> {
    pub(crate) fn new(element: &'m Element, model: &'m Model) -> Self {
        Self { element, model }
    }

    pub fn id(&self) -> &'m ElementId {
        self.element.id()
    }

    pub fn element(&self) -> &'m Element {
        self.element
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    pub fn data(&self) -> Option<&'m ElementData> {
        self.element.data().ok()
    }

    pub fn metatype(&self) -> Option<&'m Metatype> {
        self.element.metatype()
    }

    pub fn name(&self) -> Option<&'m str> {
        self.element.name()
    }

    pub fn qualified_name(&self) -> Option<&'m str> {
        self.element.qualified_name()
    }

    pub fn is_relationship(&self) -> bool {
        self.element.is_relationship()
    }

    /// Display label under the model's naming mode. Cached per element.
    pub fn label(&self) -> &'m str {
        let element = self.element;
        let naming = self.model.options().naming;
        element.cached_label(|| {
            naming.render(
                element.id().as_str(),
                element.metatype().map(|m| m.as_str()).unwrap_or("Element"),
                element.name(),
                element.qualified_name(),
            )
        })
    }

    /// The raw value of an attribute.
    pub fn raw(&self, key: &str) -> Result<Option<&'m Value>, ModelError> {
        self.element.raw(key)
    }

    /// Read an attribute, dereferencing it if the hint table marks `key` as
    /// a reference key.
    ///
    /// References that cannot be resolved (or lists with any unresolvable
    /// member) come back verbatim as [`Attribute::Raw`].
    pub fn attribute(&self, key: &str) -> Result<Attribute<'m>, ModelError> {
        let Some(value) = self.element.raw(key)? else {
            return Ok(Attribute::Absent);
        };
        if !self.model.hints().is_reference_key(key) {
            return Ok(Attribute::Raw(value));
        }
        let Some(ids) = as_references(value) else {
            return Ok(Attribute::Raw(value));
        };
        let resolved: Option<Vec<ElementRef<'m>>> =
            ids.iter().map(|id| self.model.find_element(id)).collect();
        Ok(match (resolved, value.is_array()) {
            (Some(elements), true) => Attribute::Elements(elements),
            (Some(mut elements), false) if elements.len() == 1 => {
                Attribute::Element(elements.remove(0))
            }
            _ => Attribute::Raw(value),
        })
    }

    /// The first element referenced by `key`, if it resolves.
    pub fn reference(&self, key: &str) -> Option<ElementRef<'m>> {
        self.attribute(key).ok()?.first_element()
    }

    /// Targets reached through relationships of `kind` (`through<Kind>`).
    pub fn through(&self, kind: &str) -> Vec<ElementRef<'m>> {
        self.resolve_all(self.element.derived().through(kind))
    }

    /// Sources reaching this element through relationships of `kind`
    /// (`reverse<Kind>`).
    pub fn reverse(&self, kind: &str) -> Vec<ElementRef<'m>> {
        self.resolve_all(self.element.derived().reverse(kind))
    }

    /// The owner, under the model's ownership rules.
    pub fn owner(&self) -> Result<Option<ElementRef<'m>>, ModelError> {
        self.model.get_owner(self.id())
    }

    /// Elements whose owner reference points here.
    pub fn owned(&self) -> Vec<ElementRef<'m>> {
        self.model.owned_elements(self.id())
    }

    fn resolve_all(&self, ids: &[ElementId]) -> Vec<ElementRef<'m>> {
        ids.iter()
            .filter_map(|id| self.model.find_element(id))
            .collect()
    }
}
