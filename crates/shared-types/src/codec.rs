//! # Document Codec
//!
//! The store holds the league as a pretty-printed JSON blob; these helpers are
//! the only place that format is decided.

use crate::entities::LeagueDocument;
use crate::errors::DocumentCodecError;

/// Serialize a document to the bytes written to the store.
pub fn encode_document(document: &LeagueDocument) -> Result<Vec<u8>, DocumentCodecError> {
    let mut bytes = serde_json::to_vec_pretty(document).map_err(DocumentCodecError::Encode)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse stored bytes back into a document.
pub fn decode_document(bytes: &[u8]) -> Result<LeagueDocument, DocumentCodecError> {
    serde_json::from_slice(bytes).map_err(DocumentCodecError::Decode)
}
