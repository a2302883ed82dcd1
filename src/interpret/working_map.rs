//! Scratch space for an interpretation in progress.
//!
//! Maps each type instance (atom) under construction to the features bound
//! inside it and the values chosen for them, before anything is written back
//! into a model. Feature paths are dot-joined element ids, so `a.b` is
//! feature `b` nested in feature `a`.

use super::InterpretError;
use crate::base::ElementId;
use crate::model::Model;
use indexmap::IndexMap;
use tracing::trace;

const PATH_SEPARATOR: &str = ".";

/// A value binding for a single, non-nested feature of a type instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureBinding<'w> {
    pub type_instance: &'w ElementId,
    pub feature: ElementId,
    pub values: &'w [ElementId],
}

/// Type instance → feature path → atom values.
#[derive(Clone, Debug)]
pub struct FeatureTypeWorkingMap<'m> {
    model: &'m Model,
    entries: IndexMap<ElementId, IndexMap<String, Vec<ElementId>>>,
}

impl<'m> FeatureTypeWorkingMap<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            entries: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type instances in the order they were added.
    pub fn type_instances(&self) -> impl Iterator<Item = &ElementId> {
        self.entries.keys()
    }

    /// Start tracking a type instance. Re-adding one clears its features.
    pub fn add_type_instance(&mut self, type_instance: &ElementId) {
        self.entries.insert(type_instance.clone(), IndexMap::new());
    }

    /// Track a (possibly nested) feature under a known type instance.
    ///
    /// Adding a feature that is already tracked clears its values.
    pub fn add_feature(
        &mut self,
        type_instance: &ElementId,
        nesting: &[ElementId],
    ) -> Result<(), InterpretError> {
        let features = self
            .entries
            .get_mut(type_instance)
            .ok_or_else(|| InterpretError::UnknownTypeInstance(type_instance.clone()))?;
        features.insert(feature_path(nesting), Vec::new());
        Ok(())
    }

    /// Record a value for a feature, adding the feature if needed.
    pub fn add_atom_value(
        &mut self,
        type_instance: &ElementId,
        nesting: &[ElementId],
        value: ElementId,
    ) -> Result<(), InterpretError> {
        let features = self
            .entries
            .get_mut(type_instance)
            .ok_or_else(|| InterpretError::UnknownTypeInstance(type_instance.clone()))?;
        let path = feature_path(nesting);
        trace!("[WORKING MAP] {type_instance} {path} += {value}");
        features.entry(path).or_default().push(value);
        Ok(())
    }

    /// Values recorded for a feature; empty when nothing is recorded.
    pub fn atom_values(&self, type_instance: &ElementId, nesting: &[ElementId]) -> &[ElementId] {
        self.entries
            .get(type_instance)
            .and_then(|features| features.get(&feature_path(nesting)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every binding, for features directly under their type instance.
    ///
    /// Nested feature paths are not supported and fail the whole call.
    pub fn bindings(&self) -> Result<Vec<FeatureBinding<'_>>, InterpretError> {
        let mut bindings = Vec::new();
        for (type_instance, features) in &self.entries {
            for (path, values) in features {
                if path.contains(PATH_SEPARATOR) {
                    return Err(InterpretError::Unsupported(format!(
                        "cannot bind values to nested feature {path}"
                    )));
                }
                bindings.push(FeatureBinding {
                    type_instance,
                    feature: ElementId::new(path.as_str()),
                    values,
                });
            }
        }
        Ok(bindings)
    }

    fn label(&self, id: &str) -> String {
        let id = ElementId::new(id);
        match self.model.find_element(&id) {
            Some(element) => element.to_string(),
            None => id.to_string(),
        }
    }
}

fn feature_path(nesting: &[ElementId]) -> String {
    nesting
        .iter()
        .map(ElementId::as_str)
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

impl std::fmt::Display for FeatureTypeWorkingMap<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("Empty");
        }
        for (type_instance, features) in &self.entries {
            let name = self
                .model
                .name_of(type_instance)
                .map_or_else(|| type_instance.to_string(), str::to_string);
            writeln!(f, "Values mapped under type instance (atom) {name}:")?;
            for (path, values) in features {
                let feature = path
                    .split(PATH_SEPARATOR)
                    .map(|id| self.label(id))
                    .collect::<Vec<_>>()
                    .join(PATH_SEPARATOR);
                let values = values
                    .iter()
                    .map(|id| self.label(id.as_str()))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "{feature} has values [{values}]")?;
            }
        }
        Ok(())
    }
}
