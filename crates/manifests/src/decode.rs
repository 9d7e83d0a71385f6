//! Streaming multi-document decoder
//!
//! Splits a declarative text blob into a lazy sequence of documents using
//! serde_yaml's multi-document deserializer. Decoding is incremental:
//! documents already yielded stay valid even if later content in the blob
//! turns out to be malformed. Blank documents (bare `---` separators,
//! trailing whitespace) produce nothing. A decode failure yields one error
//! naming the document's position, after which the stream ends — decoding
//! is fail-fast, not best-effort.
//!
//! YAML is a superset of JSON, so a single JSON document decodes through
//! the same path.

use crate::document::Manifest;
use crate::error::ReconcileError;
use serde::Deserialize;
use serde_json::Value;

/// Decode a text blob into a lazy stream of documents
#[must_use]
pub fn decode_documents(input: &str) -> DocumentStream<'_> {
    DocumentStream {
        documents: serde_yaml::Deserializer::from_str(input),
        index: 0,
        failed: false,
    }
}

/// Lazy iterator over the documents of a blob.
///
/// Yields `Ok(Manifest)` per non-blank document, or one `Err` at the first
/// malformed document and then fuses.
pub struct DocumentStream<'a> {
    documents: serde_yaml::Deserializer<'a>,
    index: usize,
    failed: bool,
}

impl std::fmt::Debug for DocumentStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStream")
            .field("index", &self.index)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl Iterator for DocumentStream<'_> {
    type Item = Result<Manifest, ReconcileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let document = self.documents.next()?;
            self.index += 1;
            match Value::deserialize(document) {
                // Blank segment between separators; emit nothing
                Ok(Value::Null) => continue,
                Ok(value) => return Some(Ok(Manifest::from_value(value))),
                Err(source) => {
                    self.failed = true;
                    return Some(Err(ReconcileError::Decode {
                        index: self.index,
                        source,
                    }));
                }
            }
        }
    }
}
