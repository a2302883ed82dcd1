//! Metamodel hint table and model options.
//!
//! The hint table tells the model which attribute keys hold element
//! references, in what priority owner keys are consulted, and which keys
//! carry relationship endpoints. It is immutable once a model is built and
//! shared by reference between the model and everything derived from it.

use crate::base::Naming;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Attribute keys that reference other elements in SysML v2 API JSON.
const SYSML_REFERENCE_KEYS: &[&str] = &[
    "source",
    "target",
    "relatedElement",
    "owner",
    "owningRelationship",
    "owningMembership",
    "owningNamespace",
    "owningType",
    "owningFeatureMembership",
    "owningRelatedElement",
    "ownedElement",
    "ownedRelationship",
    "ownedRelatedElement",
    "ownedMember",
    "ownedMembership",
    "ownedFeature",
    "ownedFeatureMembership",
    "member",
    "membership",
    "memberElement",
    "memberFeature",
    "feature",
    "featuringType",
    "type",
    "typedFeature",
    "general",
    "specific",
    "subclass",
    "superclass",
    "redefinedFeature",
    "redefiningFeature",
    "subsettedFeature",
    "subsettingFeature",
    "featureWithValue",
    "value",
    "multiplicity",
    "lowerBound",
    "upperBound",
    "bound",
    "parameter",
    "result",
    "referent",
    "argument",
    "function",
];

/// Owner keys in priority order.
const SYSML_OWNER_KEYS: &[&str] = &[
    "owningRelationship",
    "owningMembership",
    "owningNamespace",
    "owner",
    "owningType",
];

/// Immutable configuration describing the shape of exchange data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetamodelHints {
    reference_keys: FxHashSet<String>,
    owner_keys: Vec<String>,
    source_key: String,
    target_key: String,
    identity_key: String,
    payload_key: String,
}

impl Default for MetamodelHints {
    fn default() -> Self {
        Self::sysml()
    }
}

impl MetamodelHints {
    /// Hints for SysML v2 API JSON.
    pub fn sysml() -> Self {
        Self {
            reference_keys: SYSML_REFERENCE_KEYS.iter().map(|k| k.to_string()).collect(),
            owner_keys: SYSML_OWNER_KEYS.iter().map(|k| k.to_string()).collect(),
            source_key: "source".to_string(),
            target_key: "target".to_string(),
            identity_key: "identity".to_string(),
            payload_key: "payload".to_string(),
        }
    }

    /// Declare an additional attribute key as holding element references.
    pub fn with_reference_key(mut self, key: impl Into<String>) -> Self {
        self.reference_keys.insert(key.into());
        self
    }

    /// Replace the owner key priority list.
    pub fn with_owner_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owner_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `key` holds element references.
    pub fn is_reference_key(&self, key: &str) -> bool {
        self.reference_keys.contains(key)
    }

    /// Owner keys, highest priority first.
    pub fn owner_keys(&self) -> impl Iterator<Item = &str> {
        self.owner_keys.iter().map(String::as_str)
    }

    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    pub fn target_key(&self) -> &str {
        &self.target_key
    }

    /// Key of the `{"@id": ...}` object in a post envelope.
    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    /// Key of the element record in a post envelope.
    pub fn payload_key(&self) -> &str {
        &self.payload_key
    }
}

/// Behavioural options for a model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// How elements are rendered.
    pub naming: Naming,
    /// Treat an owner id that cannot be resolved as "no owner" instead of
    /// failing with `NotFound`.
    pub lenient_ownership: bool,
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_lenient_ownership(mut self, lenient: bool) -> Self {
        self.lenient_ownership = lenient;
        self
    }
}
