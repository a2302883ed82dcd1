//! Query answers that may be missing or ambiguous.

use crate::base::ElementId;

/// Text shown in place of a value that has several candidates.
pub const AMBIGUOUS_LABEL: &str = "Multiple Names";

/// Text shown in place of a value that has no candidate.
pub const MISSING_LABEL: &str = "Unknown";

/// The answer to a query that expects exactly one result.
///
/// Underdetermined data is reported, never resolved by picking one of the
/// candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution<T> {
    Missing,
    Unique(T),
    /// The candidates that made the answer ambiguous.
    Ambiguous(Vec<ElementId>),
}

impl<T> Resolution<T> {
    pub fn is_unique(&self) -> bool {
        matches!(self, Resolution::Unique(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous(_))
    }

    pub fn unique(&self) -> Option<&T> {
        match self {
            Resolution::Unique(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_unique(self) -> Option<T> {
        match self {
            Resolution::Unique(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Missing => Resolution::Missing,
            Resolution::Unique(value) => Resolution::Unique(f(value)),
            Resolution::Ambiguous(candidates) => Resolution::Ambiguous(candidates),
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Resolution<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Missing => f.write_str(MISSING_LABEL),
            Resolution::Unique(value) => value.fmt(f),
            Resolution::Ambiguous(_) => f.write_str(AMBIGUOUS_LABEL),
        }
    }
}
