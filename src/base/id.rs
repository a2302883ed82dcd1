//! Element identifiers and metatype tags.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::sync::Arc;

/// Unique identifier for a model element.
///
/// This corresponds to `@id` in the SysML v2 API JSON.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub Arc<str>);

impl ElementId {
    /// Create a new element ID.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&ElementId> for ElementId {
    fn from(id: &ElementId) -> Self {
        id.clone()
    }
}

impl std::borrow::Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The declared metaclass of an element (`@type`), e.g. `PartDefinition`.
///
/// Kept as an open string vocabulary: exchange data from different API
/// revisions uses different names for the same concept (`Superclassing`
/// vs `Subclassification`).
pub type Metatype = SmolStr;

/// Well-known metatype names used by projections and queries.
pub mod metatypes {
    pub const PART_DEFINITION: &str = "PartDefinition";
    pub const PART_USAGE: &str = "PartUsage";
    pub const PORT_USAGE: &str = "PortUsage";
    pub const ATTRIBUTE_USAGE: &str = "AttributeUsage";
    pub const FEATURE: &str = "Feature";

    pub const SUPERCLASSING: &str = "Superclassing";
    pub const FEATURE_TYPING: &str = "FeatureTyping";
    pub const FEATURE_MEMBERSHIP: &str = "FeatureMembership";
    pub const FEATURE_VALUE: &str = "FeatureValue";
    pub const REDEFINITION: &str = "Redefinition";
    pub const PARAMETER_MEMBERSHIP: &str = "ParameterMembership";
    pub const RETURN_PARAMETER_MEMBERSHIP: &str = "ReturnParameterMembership";

    pub const FEATURE_REFERENCE_EXPRESSION: &str = "FeatureReferenceExpression";
    pub const LITERAL_INTEGER: &str = "LiteralInteger";
    pub const LITERAL_INFINITY: &str = "LiteralInfinity";

    /// Derived edge: a reference expression's result consumes its referent.
    pub const IMPLIED_REFERENT_FEED: &str = "ImpliedReferentFeed";
    /// Derived edge: a valued feature consumes its value expression's result.
    pub const IMPLIED_RESULT_FEED: &str = "ImpliedResultFeed";
}
