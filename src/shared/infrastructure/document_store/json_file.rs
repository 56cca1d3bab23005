// File backed implementation of the DocumentStore port.
//
// Purpose
// - Durable single-process storage without a database server.
//
// Responsibilities
// - Load the collection from a JSON array file on open (missing file means empty).
// - Share query and delta semantics with the in memory store.
// - Apply every mutation to a scratch copy, write that copy to disk via temp file + rename,
//   and only then make it visible. A failed write leaves the store as it was.

use crate::shared::infrastructure::document_store::in_memory::{
    Documents, find_document, insert_document, load_documents, remove_document, update_document,
};
use crate::shared::infrastructure::document_store::{
    DocumentStore, DocumentStoreError, Filter, Update,
};
use serde_json::Value as Json;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct JsonFileDocumentStore {
    path: PathBuf,
    documents: Mutex<Documents>,
}

impl JsonFileDocumentStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DocumentStoreError> {
        let path = path.into();
        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<Json>>(&bytes).map_err(|e| {
                DocumentStoreError::Backend(format!("corrupt data file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(backend(&path, e)),
        };
        tracing::info!(path = %path.display(), documents = documents.len(), "opened data file");
        Ok(Self {
            documents: Mutex::new(load_documents(documents)?),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `mutate` on a copy of the collection. The copy replaces the live collection
    /// once it is on disk; nothing changes when `mutate` reports no match or the write fails.
    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Documents) -> Result<(T, bool), DocumentStoreError>,
    ) -> Result<T, DocumentStoreError> {
        let mut documents = self.documents.lock().await;
        let mut scratch = documents.clone();
        let (result, changed) = mutate(&mut scratch)?;
        if changed {
            self.write(&scratch).await?;
            *documents = scratch;
        }
        Ok(result)
    }

    async fn write(&self, documents: &Documents) -> Result<(), DocumentStoreError> {
        let bytes = serde_json::to_vec_pretty(&documents.values().collect::<Vec<_>>())
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;
        let temp = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|e| backend(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| backend(&self.path, e))
    }
}

fn backend(path: &Path, error: std::io::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(format!("{}: {error}", path.display()))
}

#[async_trait::async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn insert(&self, document: Json) -> Result<(), DocumentStoreError> {
        self.commit(|documents| Ok((insert_document(documents, document)?, true)))
            .await
    }

    async fn update(&self, filter: &Filter, update: &Update) -> Result<u64, DocumentStoreError> {
        self.commit(|documents| {
            let matched = update_document(documents, filter, update)?;
            Ok((matched, matched > 0))
        })
        .await
    }

    async fn remove(&self, filter: &Filter) -> Result<u64, DocumentStoreError> {
        self.commit(|documents| {
            let removed = remove_document(documents, filter);
            Ok((removed, removed > 0))
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<Json>, DocumentStoreError> {
        Ok(self.documents.lock().await.values().cloned().collect())
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Json>, DocumentStoreError> {
        Ok(find_document(&*self.documents.lock().await, filter))
    }
}
