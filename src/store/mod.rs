//! Document store boundary.
//!
//! The fill engine only plans; a store fetches snapshots and applies batches.
//! Every batch is atomic: either all requests apply or the document is left
//! untouched.

pub mod memory;

pub use memory::InMemoryDocumentStore;

use thiserror::Error;

use crate::document::{Document, DocumentError, EditRequest};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Request {index} rejected: {reason}")]
    RejectedRequest { index: usize, reason: DocumentError },
}

pub trait DocumentStore: Send + Sync {
    /// Current snapshot of a document.
    fn fetch(&self, document_id: &str) -> Result<Document, StoreError>;

    /// Apply a batch of edits atomically, in the given order.
    fn batch_update(
        &mut self,
        document_id: &str,
        requests: &[EditRequest],
    ) -> Result<(), StoreError>;

    /// Copy a document under a new title, returning the new id.
    fn copy_document(&mut self, source_id: &str, title: &str) -> Result<String, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_object_safe() {
        fn _assert_store(_: &dyn DocumentStore) {}
    }

    #[test]
    fn rejected_request_names_the_index() {
        let err = StoreError::RejectedRequest {
            index: 3,
            reason: DocumentError::OffsetOutsideText(99),
        };
        assert_eq!(
            err.to_string(),
            "Request 3 rejected: No text run contains offset 99"
        );
    }
}
