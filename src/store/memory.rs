use std::collections::HashMap;

use uuid::Uuid;

use super::{DocumentStore, StoreError};
use crate::document::{apply_request, Document, EditRequest};

/// Snapshots held in memory, edited with the store's offset semantics.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: HashMap<String, Document>,
    revisions: HashMap<String, u64>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot under its own id, or a fresh one when it has none.
    pub fn insert(&mut self, mut doc: Document) -> String {
        let id = doc
            .document_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        doc.document_id = Some(id.clone());
        self.documents.insert(id.clone(), doc);
        self.revisions.insert(id.clone(), 0);
        id
    }

    /// Number of batches committed against a document.
    pub fn revision(&self, document_id: &str) -> Option<u64> {
        self.revisions.get(document_id).copied()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn fetch(&self, document_id: &str) -> Result<Document, StoreError> {
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound(document_id.to_string()))
    }

    fn batch_update(
        &mut self,
        document_id: &str,
        requests: &[EditRequest],
    ) -> Result<(), StoreError> {
        let current = self
            .documents
            .get(document_id)
            .ok_or_else(|| StoreError::DocumentNotFound(document_id.to_string()))?;

        let mut scratch = current.clone();
        for (index, request) in requests.iter().enumerate() {
            apply_request(&mut scratch, request)
                .map_err(|reason| StoreError::RejectedRequest { index, reason })?;
        }

        self.documents.insert(document_id.to_string(), scratch);
        let revision = self.revisions.entry(document_id.to_string()).or_insert(0);
        *revision += 1;
        tracing::debug!(
            document_id = %document_id,
            requests = requests.len(),
            "Batch applied"
        );
        Ok(())
    }

    fn copy_document(&mut self, source_id: &str, title: &str) -> Result<String, StoreError> {
        let mut copy = self.fetch(source_id)?;
        copy.document_id = None;
        copy.title = Some(title.to_string());
        Ok(self.insert(copy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentBuilder;

    fn store_with_doc() -> (InMemoryDocumentStore, String) {
        let mut store = InMemoryDocumentStore::new();
        let doc = DocumentBuilder::new("tmpl")
            .paragraph("Name: {{patient_name}}")
            .build();
        let id = store.insert(doc);
        (store, id)
    }

    #[test]
    fn batch_applies_in_order_and_bumps_revision() {
        let (mut store, id) = store_with_doc();
        store
            .batch_update(
                &id,
                &[
                    EditRequest::replace_all_text("{{patient_name}}", "Asha"),
                    EditRequest::insert_text(1, ">> "),
                ],
            )
            .unwrap();
        assert_eq!(store.fetch(&id).unwrap().plain_text(), ">> Name: Asha\n");
        assert_eq!(store.revision(&id), Some(1));
    }

    #[test]
    fn failing_request_leaves_document_untouched() {
        let (mut store, id) = store_with_doc();
        let before = store.fetch(&id).unwrap();
        let err = store
            .batch_update(
                &id,
                &[
                    EditRequest::insert_text(1, "x"),
                    EditRequest::insert_text(500, "y"),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::RejectedRequest { index: 1, .. }));
        assert_eq!(store.fetch(&id).unwrap(), before);
        assert_eq!(store.revision(&id), Some(0));
    }

    #[test]
    fn unknown_document_is_not_found() {
        let mut store = InMemoryDocumentStore::new();
        assert_eq!(
            store.fetch("nope").unwrap_err(),
            StoreError::DocumentNotFound("nope".into())
        );
        assert!(store.batch_update("nope", &[]).is_err());
    }

    #[test]
    fn copy_gets_fresh_id_and_title() {
        let (mut store, id) = store_with_doc();
        let copy_id = store
            .copy_document(&id, "Discharge Summary - Asha (Pro)")
            .unwrap();
        assert_ne!(copy_id, id);
        let copy = store.fetch(&copy_id).unwrap();
        assert_eq!(
            copy.title.as_deref(),
            Some("Discharge Summary - Asha (Pro)")
        );
        assert_eq!(copy.document_id.as_deref(), Some(copy_id.as_str()));
        assert_eq!(copy.body, store.fetch(&id).unwrap().body);
    }
}
