//! Plain labels for path printing.

use crate::base::ElementId;
use crate::model::Model;

/// A short label for `id`: the element name, `«Metatype: id»` for unnamed
/// elements, or the bare id when the element cannot be found.
pub fn label_for_id(model: &Model, id: &ElementId) -> String {
    let Some(element) = model.find_element(id) else {
        return id.to_string();
    };
    match (element.name(), element.metatype()) {
        (Some(name), _) => name.to_string(),
        (None, Some(metatype)) => format!("«{metatype}: {id}»"),
        (None, None) => id.to_string(),
    }
}

/// Labels for every id on a path.
pub fn path_labels(model: &Model, path: &[ElementId]) -> Vec<String> {
    path.iter().map(|id| label_for_id(model, id)).collect()
}
