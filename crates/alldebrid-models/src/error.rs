//! Error types for schema validation.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::envelope::EnvelopeShape;

/// Primary error type raised when a payload does not satisfy its schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The payload could not be decoded into the requested type.
    #[error("malformed {context} payload")]
    Json {
        /// Short lowercase label of the unit that failed to decode.
        context: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
    /// A required top-level key was absent from the response body.
    #[error("response is missing the `{key}` key")]
    MissingKey {
        /// Name of the missing key.
        key: String,
    },
    /// A file-tree leaf carried no download link.
    #[error("tree leaf `{name}` has no download link")]
    MissingLink {
        /// Name of the offending leaf.
        name: String,
    },
    /// None of the candidate envelope shapes accepted the payload.
    #[error("payload matched no envelope shape ({})", describe(.mismatches))]
    NoMatchingShape {
        /// One record per attempted shape, in attempt order.
        mismatches: Vec<ShapeMismatch>,
    },
}

impl SchemaError {
    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}

/// Reason a single envelope shape was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Shape that was attempted.
    pub shape: EnvelopeShape,
    /// Decoder message explaining the rejection.
    pub detail: String,
}

impl Display for ShapeMismatch {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.shape, self.detail)
    }
}

fn describe(mismatches: &[ShapeMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn json_error() -> serde_json::Error {
        match serde_json::from_str::<serde_json::Value>("{") {
            Ok(_) => panic!("expected invalid json"),
            Err(err) => err,
        }
    }

    #[test]
    fn schema_error_display_and_source() {
        let err = SchemaError::json("magnet status", json_error());
        assert_eq!(err.to_string(), "malformed magnet status payload");
        assert!(err.source().is_some());

        let err = SchemaError::MissingLink {
            name: "f.txt".to_string(),
        };
        assert_eq!(err.to_string(), "tree leaf `f.txt` has no download link");
        assert!(err.source().is_none());

        let err = SchemaError::MissingKey {
            key: "magnets".to_string(),
        };
        assert_eq!(err.to_string(), "response is missing the `magnets` key");
    }

    #[test]
    fn shape_mismatch_display_names_the_shape() {
        let mismatch = ShapeMismatch {
            shape: EnvelopeShape::Dict,
            detail: "invalid type".to_string(),
        };
        assert_eq!(mismatch.to_string(), "dict: invalid type");

        let err = SchemaError::NoMatchingShape {
            mismatches: vec![
                mismatch,
                ShapeMismatch {
                    shape: EnvelopeShape::List,
                    detail: "expected a sequence".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "payload matched no envelope shape (dict: invalid type; list: expected a sequence)"
        );
    }
}
