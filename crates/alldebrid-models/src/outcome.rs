//! Per-item success-or-error results returned by batch endpoints.
//!
//! Upload and instant-check responses mix successful items and per-item
//! failures in one array with no status field; the variant is decided by
//! whether the item carries an `error` object and whether it still holds a
//! complete success record.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Key whose presence marks a per-item failure.
pub const ERROR_KEY: &str = "error";

/// Error catalog entry reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

/// Result of a single item in a batch response.
///
/// Items without an `error` key always decode as `T`. An item carrying `error`
/// decodes as `T` only when it also holds every field `T` requires, and as `E`
/// otherwise. Fields neither record knows about are ignored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Outcome<T, E> {
    /// The service accepted the item.
    Success(T),
    /// The service rejected the item.
    Error(E),
}

impl<T, E> Outcome<T, E> {
    /// Returns true for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for the error variant.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Borrow the success payload, if any.
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(item) => Some(item),
            Self::Error(_) => None,
        }
    }

    /// Borrow the error payload, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    /// Convert into a standard [`Result`].
    ///
    /// # Errors
    ///
    /// Returns the error payload for the error variant.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(item) => Ok(item),
            Self::Error(err) => Err(err),
        }
    }
}

impl<'de, T, E> Deserialize<'de> for Outcome<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.get(ERROR_KEY).is_none() {
            return T::deserialize(&value)
                .map(Self::Success)
                .map_err(de::Error::custom);
        }
        match T::deserialize(&value) {
            Ok(item) => Ok(Self::Success(item)),
            Err(err) => {
                debug!(error = %err, "item with error key is not a success record");
                E::deserialize(&value)
                    .map(Self::Error)
                    .map_err(de::Error::custom)
            }
        }
    }
}
