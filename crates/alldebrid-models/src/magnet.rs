//! Records returned by the magnet endpoints.
//!
//! Field names follow the wire format; the service uses camelCase for status
//! records and flat lowercase names elsewhere. Records holding a file tree
//! (`MagnetLink`, `MagnetFiles`) flatten it while decoding, so serialising
//! them yields the normalised entries rather than the compact tree.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::outcome::{ErrorMessage, Outcome};
use crate::tree::{FileEntry, LinkEntry, deserialize_file_tree, deserialize_link_tree};

/// Top-level key carrying uploaded torrent files.
pub const FILES_KEY: &str = "files";

/// Failure for a magnet URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetErrorUri {
    /// Magnet URI as submitted.
    pub magnet: String,
    /// Error reported for the URI.
    pub error: ErrorMessage,
}

/// Failure for an uploaded torrent file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetErrorFile {
    /// Torrent file name as submitted.
    pub file: String,
    /// Error reported for the file.
    pub error: ErrorMessage,
}

/// Magnet URI accepted by the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetUploadUri {
    /// Magnet URI as submitted.
    pub magnet: String,
    /// Torrent name.
    pub name: String,
    /// Identifier assigned by the service.
    pub id: u64,
    /// Info hash.
    pub hash: String,
    /// Total size in bytes.
    pub size: u64,
    /// Whether the content is already available for download.
    pub ready: bool,
}

/// Torrent file accepted by the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetUploadFile {
    /// Torrent file name as submitted.
    pub file: String,
    /// Torrent name.
    pub name: String,
    /// Identifier assigned by the service.
    pub id: u64,
    /// Info hash.
    pub hash: String,
    /// Total size in bytes.
    pub size: u64,
    /// Whether the content is already available for download.
    pub ready: bool,
}

/// Instant availability of a magnet URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetInstantUri {
    /// Magnet URI as submitted.
    pub magnet: String,
    /// Info hash.
    pub hash: String,
    /// Whether the content is cached and immediately available.
    pub instant: bool,
}

/// Outcome of uploading one magnet URI.
pub type UploadUriResult = Outcome<MagnetUploadUri, MagnetErrorUri>;
/// Outcome of uploading one torrent file.
pub type UploadFileResult = Outcome<MagnetUploadFile, MagnetErrorFile>;
/// Outcome of checking one magnet URI for instant availability.
pub type InstantResult = Outcome<MagnetInstantUri, MagnetErrorUri>;

/// Torrent metadata with its flattened file listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetLink {
    /// Link the metadata was resolved from.
    pub link: String,
    /// Torrent name.
    pub filename: String,
    /// Total size in bytes.
    pub size: u64,
    #[serde(deserialize_with = "deserialize_link_tree")]
    /// Files contained in the torrent.
    pub files: Vec<LinkEntry>,
}

/// Polling status of a single magnet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MagnetStatus {
    /// Identifier assigned by the service.
    pub id: u64,
    /// Torrent name.
    pub filename: String,
    /// Total size in bytes.
    pub size: u64,
    /// Info hash.
    pub hash: String,
    /// Human-readable status label.
    pub status: String,
    /// Numeric status code.
    pub status_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Bytes downloaded so far.
    pub downloaded: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Bytes uploaded so far.
    pub uploaded: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Connected seeders.
    pub seeders: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Download rate in bytes per second.
    pub download_speed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Upload rate in bytes per second.
    pub upload_speed: Option<u64>,
    /// Upload timestamp (seconds since the Unix epoch).
    pub upload_date: i64,
    /// Completion timestamp (seconds since the Unix epoch, `0` while pending).
    pub completion_date: i64,
    #[serde(rename = "type")]
    /// Source type tag reported by the service.
    pub kind: String,
    /// Whether the completion notification was sent.
    pub notified: bool,
    /// Schema version of the record.
    pub version: i64,
}

/// Flattened download listing for one magnet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetFiles {
    /// Identifier of the magnet.
    pub id: u64,
    #[serde(deserialize_with = "deserialize_file_tree")]
    /// Downloadable files with their links.
    pub files: Vec<FileEntry>,
}

/// Body of the magnet upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetUploadUris {
    /// One outcome per submitted URI, in submission order.
    pub magnets: Vec<UploadUriResult>,
}

/// Body of the torrent file upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetUploadFiles {
    /// One outcome per submitted file, in submission order.
    pub files: Vec<UploadFileResult>,
}

/// Body of the instant availability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetInstants {
    /// One outcome per submitted URI, in submission order.
    pub magnets: Vec<InstantResult>,
}

/// Body of the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetStatuses {
    /// Status records in whichever shape the request produced.
    pub magnets: Envelope<MagnetStatus>,
}

/// Body of the file listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagnetFilesResponse {
    /// File listings in whichever shape the request produced.
    pub magnets: Envelope<MagnetFiles>,
}
