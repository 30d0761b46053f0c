//! Response envelopes whose shape depends on how many ids were requested.
//!
//! Batch-capable endpoints wrap their payload differently depending on the
//! request: no ids yields an id-keyed object, one id yields the bare record and
//! several ids yield an array. [`Envelope`] accepts all three without knowing
//! which request produced the body.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{SchemaError, SchemaResult, ShapeMismatch};

/// Top-level key carrying magnet payloads.
pub const MAGNETS_KEY: &str = "magnets";

/// Concrete layout of an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeShape {
    /// Bare record.
    Single,
    /// Array of records.
    List,
    /// Object mapping identifiers to records.
    Dict,
}

impl EnvelopeShape {
    /// Order in which shapes are attempted during dispatch.
    pub const ATTEMPT_ORDER: [Self; 3] = [Self::Dict, Self::List, Self::Single];

    /// Lowercase label used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::List => "list",
            Self::Dict => "dict",
        }
    }
}

impl Display for EnvelopeShape {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One record, a list of records, or an identifier-keyed map of records.
///
/// No conversion between shapes happens implicitly; use [`Envelope::shape`]
/// or match on the variants to branch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Envelope<T> {
    /// The body held the record itself.
    Single(T),
    /// The body held an array of records in server order.
    List(Vec<T>),
    /// The body held records keyed by identifier string, in server order.
    Dict(IndexMap<String, T>),
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Dispatch a raw value onto the first shape that accepts it.
    ///
    /// Shapes are tried in [`EnvelopeShape::ATTEMPT_ORDER`]; a rejected shape is
    /// logged and the next one is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoMatchingShape`] carrying one mismatch per shape
    /// when no shape accepts the value.
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        let mut mismatches = Vec::with_capacity(EnvelopeShape::ATTEMPT_ORDER.len());
        for shape in EnvelopeShape::ATTEMPT_ORDER {
            match Self::attempt(shape, value) {
                Ok(envelope) => return Ok(envelope),
                Err(err) => {
                    debug!(shape = shape.as_str(), error = %err, "envelope shape rejected");
                    mismatches.push(ShapeMismatch {
                        shape,
                        detail: err.to_string(),
                    });
                }
            }
        }
        Err(SchemaError::NoMatchingShape { mismatches })
    }

    /// Look up `key` in a response body and dispatch its value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingKey`] when the body has no such key, or
    /// the dispatch error from [`Envelope::from_value`].
    pub fn from_response(body: &Value, key: &str) -> SchemaResult<Self> {
        let value = body.get(key).ok_or_else(|| SchemaError::MissingKey {
            key: key.to_string(),
        })?;
        Self::from_value(value)
    }

    fn attempt(shape: EnvelopeShape, value: &Value) -> Result<Self, serde_json::Error> {
        match shape {
            EnvelopeShape::Dict => IndexMap::<String, T>::deserialize(value).map(Self::Dict),
            EnvelopeShape::List => Vec::<T>::deserialize(value).map(Self::List),
            EnvelopeShape::Single => T::deserialize(value).map(Self::Single),
        }
    }
}

impl<T> Envelope<T> {
    /// Shape the server responded with.
    #[must_use]
    pub const fn shape(&self) -> EnvelopeShape {
        match self {
            Self::Single(_) => EnvelopeShape::Single,
            Self::List(_) => EnvelopeShape::List,
            Self::Dict(_) => EnvelopeShape::Dict,
        }
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::List(items) => items.len(),
            Self::Dict(items) => items.len(),
        }
    }

    /// Returns true when no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records paired with their identifier, which only `Dict` bodies carry.
    #[must_use]
    pub fn items(&self) -> Vec<(Option<&str>, &T)> {
        match self {
            Self::Single(item) => vec![(None, item)],
            Self::List(items) => items.iter().map(|item| (None, item)).collect(),
            Self::Dict(items) => items
                .iter()
                .map(|(id, item)| (Some(id.as_str()), item))
                .collect(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Record {
        id: u64,
        name: String,
    }

    #[test]
    fn array_dispatches_to_list() -> SchemaResult<()> {
        let envelope = Envelope::<Record>::from_value(&json!([
            {"id": 1, "name": "a"},
            {"id": 2, "name": "b"}
        ]))?;
        assert_eq!(envelope.shape(), EnvelopeShape::List);
        assert_eq!(envelope.len(), 2);
        Ok(())
    }

    #[test]
    fn keyed_object_dispatches_to_dict() -> SchemaResult<()> {
        let envelope = Envelope::<Record>::from_value(&json!({"123": {"id": 123, "name": "a"}}))?;
        match envelope {
            Envelope::Dict(ref items) => {
                assert_eq!(items.get("123").map(|r| r.id), Some(123));
            }
            _ => panic!("expected dict shape"),
        }
        assert_eq!(envelope.items()[0].0, Some("123"));
        Ok(())
    }

    #[test]
    fn bare_record_dispatches_to_single() -> SchemaResult<()> {
        let envelope = Envelope::<Record>::from_value(&json!({"id": 9, "name": "solo"}))?;
        let items = envelope.items();
        assert_eq!(envelope.shape(), EnvelopeShape::Single);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, None);
        assert_eq!(items[0].1.name, "solo");
        Ok(())
    }

    #[test]
    fn dict_keeps_server_key_order() -> SchemaResult<()> {
        let envelope = Envelope::<Record>::from_value(&json!({
            "9": {"id": 9, "name": "nine"},
            "10": {"id": 10, "name": "ten"},
            "2": {"id": 2, "name": "two"}
        }))?;
        let keys: Vec<_> = envelope.items().into_iter().filter_map(|(id, _)| id).collect();
        assert_eq!(keys, vec!["9", "10", "2"]);
        Ok(())
    }

    #[test]
    fn empty_object_is_an_empty_dict() -> SchemaResult<()> {
        let envelope = Envelope::<Record>::from_value(&json!({}))?;
        assert_eq!(envelope.shape(), EnvelopeShape::Dict);
        assert!(envelope.is_empty());
        Ok(())
    }

    #[test]
    fn unmatched_value_reports_every_attempt() {
        let err = Envelope::<Record>::from_value(&json!("nope")).expect_err("string payload");
        match err {
            SchemaError::NoMatchingShape { mismatches } => {
                let shapes: Vec<_> = mismatches.iter().map(|m| m.shape).collect();
                assert_eq!(shapes, EnvelopeShape::ATTEMPT_ORDER.to_vec());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn list_with_one_bad_item_is_rejected_whole() {
        let result = Envelope::<Record>::from_value(&json!([
            {"id": 1, "name": "a"},
            {"id": "x", "name": "b"}
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn missing_key_is_reported() {
        let err = Envelope::<Record>::from_response(&json!({"files": []}), MAGNETS_KEY)
            .expect_err("missing magnets");
        assert!(matches!(err, SchemaError::MissingKey { ref key } if key == "magnets"));
    }
}
