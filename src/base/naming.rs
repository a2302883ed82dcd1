//! How elements are rendered for display.

use serde::{Deserialize, Serialize};

/// Display mode for elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Naming {
    /// `<@id>`
    Identifier,
    /// `<name «@type»>`
    #[default]
    Long,
    /// `<qualifiedName>`
    Qualified,
    /// `<name>`
    Short,
}

impl Naming {
    /// Render an element given its id, metatype, and optional names.
    ///
    /// Missing names fall back to the identifier; a missing qualified name
    /// falls back to the long form.
    pub fn render(
        &self,
        id: &str,
        metatype: &str,
        name: Option<&str>,
        qualified_name: Option<&str>,
    ) -> String {
        let name = name.filter(|n| !n.is_empty()).unwrap_or(id);
        match self {
            Naming::Identifier => format!("<{id}>"),
            Naming::Qualified => match qualified_name {
                Some(qualified) => format!("<{qualified}>"),
                None => format!("<{name} «{metatype}»>"),
            },
            Naming::Short => format!("<{name}>"),
            Naming::Long => format!("<{name} «{metatype}»>"),
        }
    }
}
