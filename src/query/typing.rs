//! Feature typing queries over the `Part Typing` projection.

use super::{QueryError, Resolution};
use crate::base::ElementId;
use crate::graph::{LabeledPropertyGraph, Projection, names};

/// Types of a feature, in typing order. Empty for untyped features.
pub fn types_for_feature(
    lpg: &LabeledPropertyGraph<'_>,
    feature: &ElementId,
) -> Result<Vec<ElementId>, QueryError> {
    let typing = lpg.get_projection(names::PART_TYPING)?;
    Ok(types_in(&typing, feature))
}

/// Features typed by a type, in typing order. Empty when nothing uses it.
pub fn features_typed_by_type(
    lpg: &LabeledPropertyGraph<'_>,
    ty: &ElementId,
) -> Result<Vec<ElementId>, QueryError> {
    let typing = lpg.get_projection(names::PART_TYPING)?;
    Ok(features_in(&typing, ty))
}

/// The name of a feature's type; ambiguous when it has several.
pub fn feature_type_name(
    lpg: &LabeledPropertyGraph<'_>,
    feature: &ElementId,
) -> Result<Resolution<String>, QueryError> {
    let types = types_for_feature(lpg, feature)?;
    Ok(match types.as_slice() {
        [] => Resolution::Missing,
        [ty] => match lpg.model().name_of(ty) {
            Some(name) => Resolution::Unique(name.to_string()),
            None => Resolution::Missing,
        },
        _ => Resolution::Ambiguous(types),
    })
}

pub(crate) fn types_in(typing: &Projection, feature: &ElementId) -> Vec<ElementId> {
    typing.successors(feature).into_iter().cloned().collect()
}

pub(crate) fn features_in(typing: &Projection, ty: &ElementId) -> Vec<ElementId> {
    typing.predecessors(ty).into_iter().cloned().collect()
}
