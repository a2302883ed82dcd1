//! External element source used for lazy resolution.

use super::element::Record;
use crate::base::ElementId;
use rustc_hash::FxHashMap;

/// Supplies element records that are absent from a model.
///
/// Implemented by API clients. Called only for ids that are missing or
/// proxied locally, as a blocking call with no retry; errors surface as
/// not-found failures.
pub trait ElementSource {
    /// Fetch the raw record for `id`.
    fn get_element_data(&self, id: &ElementId) -> Result<Record, String>;
}

/// An in-memory [`ElementSource`], useful for tests and for staging
/// records fetched ahead of time.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    records: FxHashMap<ElementId, Record>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record under its `@id`. Records without one are ignored.
    pub fn insert(&mut self, record: Record) {
        if let Some(id) = record.get(super::element::ID_KEY).and_then(|v| v.as_str()) {
            self.records.insert(ElementId::new(id), record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ElementSource for StaticSource {
    fn get_element_data(&self, id: &ElementId) -> Result<Record, String> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| format!("no record for {id}"))
    }
}
