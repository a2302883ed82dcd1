//! Edge labels: relationship kind plus direction.

use smol_str::SmolStr;

const REVERSE_SUFFIX: &str = "^-1";

/// The label of a graph edge.
///
/// A forward edge follows its relationship from source to target; a
/// reverse edge runs target to source. Reverse labels print with a `^-1`
/// suffix (`Superclassing^-1`), which [`EdgeLabel::parse`] accepts too.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeLabel {
    pub kind: SmolStr,
    pub reverse: bool,
}

impl EdgeLabel {
    pub fn forward(kind: impl AsRef<str>) -> Self {
        Self {
            kind: SmolStr::new(kind),
            reverse: false,
        }
    }

    pub fn reversed(kind: impl AsRef<str>) -> Self {
        Self {
            kind: SmolStr::new(kind),
            reverse: true,
        }
    }

    /// The same kind in the opposite direction.
    pub fn inverse(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            reverse: !self.reverse,
        }
    }

    /// Parse `Kind` or `Kind^-1`.
    pub fn parse(label: &str) -> Self {
        match label.strip_suffix(REVERSE_SUFFIX) {
            Some(kind) => Self::reversed(kind),
            None => Self::forward(label),
        }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_str() == kind
    }
}

impl std::fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.reverse {
            write!(f, "{}{REVERSE_SUFFIX}", self.kind)
        } else {
            f.write_str(&self.kind)
        }
    }
}
