//! Post envelopes: records wrapped for the SysML v2 API commit endpoint.
//!
//! ```json
//! [
//!   { "identity": { "@id": "62fc7eb7-..." },
//!     "payload":  { "@type": "PartDefinition", "name": "Rocket" } }
//! ]
//! ```
//!
//! A commit object carrying the envelopes under `change` is accepted too.

use super::records::into_records;
use super::{FormatCapability, InterchangeError, JsonRecords, ModelFormat};
use crate::model::{ID_KEY, MetamodelHints, Model, ModelOptions, Record, as_reference};
use serde_json::Value;
use std::sync::Arc;

const CHANGE_KEY: &str = "change";

/// Post-envelope format (read only).
#[derive(Debug, Clone, Default)]
pub struct PostEnvelopes {
    hints: Arc<MetamodelHints>,
    options: ModelOptions,
}

impl PostEnvelopes {
    pub fn new(hints: Arc<MetamodelHints>, options: ModelOptions) -> Self {
        Self { hints, options }
    }

    /// Unwrap envelopes into flat records.
    ///
    /// The identity's `@id` is authoritative and written into the payload.
    pub fn unwrap_envelopes(&self, value: Value) -> Result<Vec<Record>, InterchangeError> {
        let value = match value {
            Value::Object(mut obj) if obj.contains_key(CHANGE_KEY) => {
                obj.remove(CHANGE_KEY).unwrap_or(Value::Null)
            }
            other => other,
        };
        into_records(value)?
            .into_iter()
            .map(|envelope| self.unwrap_one(envelope))
            .collect()
    }

    fn unwrap_one(&self, mut envelope: Record) -> Result<Record, InterchangeError> {
        let id = envelope
            .get(self.hints.identity_key())
            .and_then(as_reference)
            .ok_or_else(|| InterchangeError::missing_attribute(self.hints.identity_key()))?;
        let mut payload = match envelope.remove(self.hints.payload_key()) {
            Some(Value::Object(payload)) => payload,
            _ => return Err(InterchangeError::missing_attribute(self.hints.payload_key())),
        };
        payload.insert(ID_KEY.to_string(), Value::String(id.to_string()));
        Ok(payload)
    }

    /// Read several envelope documents into one model.
    pub fn read_many<'a>(
        &self,
        inputs: impl IntoIterator<Item = &'a [u8]>,
    ) -> Result<Model, InterchangeError> {
        let mut records = Vec::new();
        for input in inputs {
            let value: Value = serde_json::from_slice(input)
                .map_err(|e| InterchangeError::json(format!("Parse error: {e}")))?;
            records.extend(self.unwrap_envelopes(value)?);
        }
        JsonRecords::new(self.hints.clone(), self.options).read_records(records)
    }
}

impl ModelFormat for PostEnvelopes {
    fn name(&self) -> &'static str {
        "Post envelopes"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn capabilities(&self) -> FormatCapability {
        FormatCapability::READ_ONLY
    }

    fn read(&self, input: &[u8]) -> Result<Model, InterchangeError> {
        self.read_many([input])
    }

    fn write(&self, _model: &Model) -> Result<Vec<u8>, InterchangeError> {
        Err(InterchangeError::Unsupported(
            "writing post envelopes".to_string(),
        ))
    }
}
