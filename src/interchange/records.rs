//! Flat element records: a JSON array of `@id`/`@type` objects.
//!
//! ```json
//! [
//!   { "@id": "62fc7eb7-...", "@type": "PartDefinition", "name": "Rocket" },
//!   { "@id": "0b5c...", "@type": "FeatureTyping",
//!     "source": [{ "@id": "..." }], "target": [{ "@id": "..." }] }
//! ]
//! ```

use super::{FormatCapability, InterchangeError, ModelFormat};
use crate::model::{Element, MetamodelHints, Model, ModelOptions, Record};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Flat JSON array format.
#[derive(Debug, Clone, Default)]
pub struct JsonRecords {
    hints: Arc<MetamodelHints>,
    options: ModelOptions,
}

impl JsonRecords {
    pub fn new(hints: Arc<MetamodelHints>, options: ModelOptions) -> Self {
        Self { hints, options }
    }

    /// Build a model from records that are already parsed.
    pub fn read_records(
        &self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Model, InterchangeError> {
        let elements = records
            .into_iter()
            .map(|record| Element::from_record(record, &self.hints))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Read {} element record(s)", elements.len());
        Ok(Model::from_elements(
            elements,
            self.hints.clone(),
            self.options,
        ))
    }

    /// Serialise a model into the records it was built from.
    ///
    /// Proxies have no record and are left out.
    pub fn write_records(&self, model: &Model) -> Vec<Record> {
        model
            .iter_elements()
            .filter_map(|element| {
                let record = element.to_record();
                if record.is_none() {
                    debug!("Not writing unresolved proxy {}", element.id());
                }
                record
            })
            .collect()
    }
}

/// Split a parsed JSON document into element records.
pub(super) fn into_records(value: Value) -> Result<Vec<Record>, InterchangeError> {
    match value {
        Value::Object(obj) => Ok(vec![obj]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(obj) => Ok(obj),
                other => Err(InterchangeError::invalid_record(format!(
                    "expected object, found {other}"
                ))),
            })
            .collect(),
        _ => Err(InterchangeError::json("Expected object or array")),
    }
}

impl ModelFormat for JsonRecords {
    fn name(&self) -> &'static str {
        "JSON records"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json", "jsonld"]
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::FULL
    }

    fn read(&self, input: &[u8]) -> Result<Model, InterchangeError> {
        let value: Value = serde_json::from_slice(input)
            .map_err(|e| InterchangeError::json(format!("Parse error: {e}")))?;
        self.read_records(into_records(value)?)
    }

    fn write(&self, model: &Model) -> Result<Vec<u8>, InterchangeError> {
        let records: Vec<Value> = self
            .write_records(model)
            .into_iter()
            .map(Value::Object)
            .collect();
        Ok(serde_json::to_vec_pretty(&Value::Array(records))?)
    }
}
