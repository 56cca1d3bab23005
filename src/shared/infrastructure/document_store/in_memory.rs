// In memory implementation of the DocumentStore port.
//
// Purpose
// - Support command handler tests and local development without a database.
//
// Responsibilities
// - Keep documents in a map ordered by `_id`.
// - Apply the delta primitives atomically per document.
// - Simulate outages, latency and transient failures for tests.

use crate::shared::infrastructure::document_store::{
    DocumentStore, DocumentStoreError, Filter, Update, UpdateOp,
};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Documents>,
    is_offline: AtomicBool,
    delay_ms: AtomicU64,
    failing_writes: AtomicU32,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<Json>) -> Result<Self, DocumentStoreError> {
        Ok(Self {
            documents: RwLock::new(load_documents(documents)?),
            ..Self::default()
        })
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    /// The next `count` writes fail with a backend error, then writes succeed again.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    async fn check_available(&self) -> Result<(), DocumentStoreError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::Backend("Document store offline".into()));
        }
        Ok(())
    }

    async fn check_writable(&self) -> Result<(), DocumentStoreError> {
        self.check_available().await?;
        let consumed = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if consumed.is_ok() {
            return Err(DocumentStoreError::Backend("Document store write failed".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, document: Json) -> Result<(), DocumentStoreError> {
        self.check_writable().await?;
        insert_document(&mut *self.documents.write().await, document)
    }

    async fn update(&self, filter: &Filter, update: &Update) -> Result<u64, DocumentStoreError> {
        self.check_writable().await?;
        update_document(&mut *self.documents.write().await, filter, update)
    }

    async fn remove(&self, filter: &Filter) -> Result<u64, DocumentStoreError> {
        self.check_writable().await?;
        Ok(remove_document(&mut *self.documents.write().await, filter))
    }

    async fn find_all(&self) -> Result<Vec<Json>, DocumentStoreError> {
        self.check_available().await?;
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Json>, DocumentStoreError> {
        self.check_available().await?;
        Ok(find_document(&*self.documents.read().await, filter))
    }
}

pub(crate) type Documents = BTreeMap<String, Json>;

pub(crate) fn load_documents(documents: Vec<Json>) -> Result<Documents, DocumentStoreError> {
    let mut map = BTreeMap::new();
    for document in documents {
        let id = document_id(&document)?;
        if map.insert(id.clone(), document).is_some() {
            return Err(DocumentStoreError::Duplicate { id });
        }
    }
    Ok(map)
}

pub(crate) fn insert_document(
    documents: &mut Documents,
    document: Json,
) -> Result<(), DocumentStoreError> {
    let id = document_id(&document)?;
    if documents.contains_key(&id) {
        return Err(DocumentStoreError::Duplicate { id });
    }
    documents.insert(id, document);
    Ok(())
}

/// All ops land on a copy of the document, which replaces the original only if every op succeeded.
pub(crate) fn update_document(
    documents: &mut Documents,
    filter: &Filter,
    update: &Update,
) -> Result<u64, DocumentStoreError> {
    let Some(document) = documents.get_mut(&filter.id) else {
        return Ok(0);
    };
    let Some(position) = locate(document, filter) else {
        return Ok(0);
    };
    let mut next = document.clone();
    for op in &update.ops {
        apply_op(&mut next, op, position)?;
    }
    *document = next;
    Ok(1)
}

pub(crate) fn remove_document(documents: &mut Documents, filter: &Filter) -> u64 {
    let matched = documents
        .get(&filter.id)
        .is_some_and(|document| locate(document, filter).is_some());
    if !matched {
        return 0;
    }
    documents.remove(&filter.id);
    1
}

pub(crate) fn find_document(documents: &Documents, filter: &Filter) -> Option<Json> {
    documents
        .get(&filter.id)
        .filter(|document| locate(document, filter).is_some())
        .cloned()
}

fn document_id(document: &Json) -> Result<String, DocumentStoreError> {
    document
        .get("_id")
        .and_then(Json::as_str)
        .map(str::to_string)
        .ok_or_else(|| DocumentStoreError::InvalidUpdate("document has no string _id".into()))
}

fn element_id(element: &Json) -> Option<&str> {
    element.get("_id").and_then(Json::as_str)
}

/// `None` when the filter does not match; otherwise the positional index of
/// the matched array element, if the filter addressed one.
fn locate(document: &Json, filter: &Filter) -> Option<Option<usize>> {
    if document.get("_id").and_then(Json::as_str) != Some(filter.id.as_str()) {
        return None;
    }
    let Some(element) = &filter.element else {
        return Some(None);
    };
    document
        .get(&element.array)?
        .as_array()?
        .iter()
        .position(|item| element_id(item) == Some(element.id.as_str()))
        .map(Some)
}

fn resolve_mut<'a>(
    root: &'a mut Json,
    path: &str,
    position: Option<usize>,
) -> Result<&'a mut Json, DocumentStoreError> {
    let mut current = root;
    for segment in path.split('.') {
        if current.is_null() {
            *current = Json::Object(Map::new());
        }
        current = match current {
            Json::Object(map) => map.entry(segment.to_string()).or_insert(Json::Null),
            Json::Array(items) => {
                let index = if segment == "$" {
                    position.ok_or_else(|| {
                        DocumentStoreError::InvalidUpdate(format!(
                            "positional operator in {path} without an element filter"
                        ))
                    })?
                } else {
                    segment.parse::<usize>().map_err(|_| {
                        DocumentStoreError::InvalidUpdate(format!(
                            "{segment} is not an array index"
                        ))
                    })?
                };
                items.get_mut(index).ok_or_else(|| {
                    DocumentStoreError::InvalidUpdate(format!(
                        "index {index} out of bounds in {path}"
                    ))
                })?
            }
            _ => {
                return Err(DocumentStoreError::InvalidUpdate(format!(
                    "cannot descend into a scalar at {segment} in {path}"
                )));
            }
        };
    }
    Ok(current)
}

fn apply_op(
    document: &mut Json,
    op: &UpdateOp,
    position: Option<usize>,
) -> Result<(), DocumentStoreError> {
    match op {
        UpdateOp::Set { path, value } => {
            *resolve_mut(document, path, position)? = value.clone();
        }
        UpdateOp::Inc { path, by } => {
            let slot = resolve_mut(document, path, position)?;
            let current = match &*slot {
                Json::Null => 0.0,
                other => other.as_f64().ok_or_else(|| {
                    DocumentStoreError::InvalidUpdate(format!("cannot increment non-number {path}"))
                })?,
            };
            *slot = serde_json::json!(current + by);
        }
        UpdateOp::Push { path, value } => {
            let slot = resolve_mut(document, path, position)?;
            if slot.is_null() {
                *slot = Json::Array(Vec::new());
            }
            slot.as_array_mut()
                .ok_or_else(|| {
                    DocumentStoreError::InvalidUpdate(format!("cannot push to non-array {path}"))
                })?
                .push(value.clone());
        }
        UpdateOp::PullById { path, id } => {
            let slot = resolve_mut(document, path, position)?;
            if slot.is_null() {
                *slot = Json::Array(Vec::new());
            }
            slot.as_array_mut()
                .ok_or_else(|| {
                    DocumentStoreError::InvalidUpdate(format!("cannot pull from non-array {path}"))
                })?
                .retain(|item| element_id(item) != Some(id.as_str()));
        }
    }
    Ok(())
}
