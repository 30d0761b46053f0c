#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Typed response schemas for the AllDebrid magnet API.
//!
//! The HTTP client lives elsewhere; this crate only turns decoded response
//! bodies into validated records. Two pieces carry the logic:
//!
//! - [`tree`] flattens the service's compact `n`/`e`/`s`/`l` file trees into
//!   path records, rejecting download leaves that lack a link.
//! - [`envelope`] accepts list, dict or single-record bodies for endpoints
//!   whose shape depends on how many ids were requested.
//!
//! Batch endpoints that mix per-item successes and failures decode into
//! [`Outcome`] values; a per-item failure is a valid parse result, not an
//! error of this crate.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub mod envelope;
pub mod error;
pub mod magnet;
pub mod outcome;
pub mod tree;

pub use envelope::{Envelope, EnvelopeShape, MAGNETS_KEY};
pub use error::{SchemaError, SchemaResult, ShapeMismatch};
pub use magnet::{
    FILES_KEY, InstantResult, MagnetErrorFile, MagnetErrorUri, MagnetFiles, MagnetFilesResponse,
    MagnetInstantUri, MagnetInstants, MagnetLink, MagnetStatus, MagnetStatuses, MagnetUploadFile,
    MagnetUploadFiles, MagnetUploadUri, MagnetUploadUris, UploadFileResult, UploadUriResult,
};
pub use outcome::{ERROR_KEY, ErrorMessage, Outcome};
pub use tree::{
    CHILDREN_KEY, FileEntry, FileLeaf, FileNode, FlatListing, LINK_KEY, LinkEntry, LinkLeaf,
    LinkNode, TreeKind, TreeLeaf, TreeNode, flatten_detected, flatten_files, flatten_forest,
    flatten_links, parse_forest,
};

/// Decode a raw JSON response body into `T`.
///
/// # Errors
///
/// Returns [`SchemaError::Json`] when the body is not valid JSON or does not
/// satisfy `T`'s schema.
pub fn parse_response<T: DeserializeOwned>(body: &str) -> SchemaResult<T> {
    serde_json::from_str(body).map_err(rejected::<T>)
}

/// Decode an already-parsed JSON value into `T`.
///
/// # Errors
///
/// Returns [`SchemaError::Json`] when the value does not satisfy `T`'s schema.
pub fn from_value<T: DeserializeOwned>(value: Value) -> SchemaResult<T> {
    serde_json::from_value(value).map_err(rejected::<T>)
}

fn rejected<T>(source: serde_json::Error) -> SchemaError {
    let context = schema_label::<T>();
    debug!(schema = %context, error = %source, "response rejected by schema");
    SchemaError::json(context, source)
}

/// `MagnetInstants` becomes `magnet instants`; module paths are dropped,
/// including those inside generic arguments.
fn schema_label<T>() -> String {
    let mut short = String::new();
    let mut path_start = 0;
    for ch in type_name::<T>().chars() {
        if ch == ':' {
            short.truncate(path_start);
        } else {
            short.push(ch);
            if !(ch.is_alphanumeric() || ch == '_') {
                path_start = short.len();
            }
        }
    }

    let mut label = String::with_capacity(short.len() + 4);
    let mut previous: Option<char> = None;
    for ch in short.chars() {
        if ch.is_uppercase() && previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            label.push(' ');
        }
        label.extend(ch.to_lowercase());
        previous = Some(ch);
    }
    label
}
