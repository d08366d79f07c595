//! # Document Codec
//!
//! Pure conversion between a [`Document`] and its JSON bytes.

use super::document::Document;
use super::errors::{StoreError, StoreResult};

/// Serialize a document.
///
/// Only fails if the serializer itself fails; a well-formed document
/// always encodes.
pub fn encode(document: &Document) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(document).map_err(StoreError::MalformedDocument)
}

/// Deserialize a document, repairing id counters from older files.
pub fn decode(bytes: &[u8]) -> StoreResult<Document> {
    let mut document: Document =
        serde_json::from_slice(bytes).map_err(StoreError::MalformedDocument)?;
    document.normalize_counters();
    Ok(document)
}
