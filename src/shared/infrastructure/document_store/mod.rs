// Port for the persistence engine: an opaque key-value document store addressed by `_id`.
//
// Purpose
// - Describe the partial-update primitives the card core is allowed to issue:
//   field set, field increment, array push, array pull by element id, plus
//   compound filters that reach into one element of a nested array.
//
// Boundaries
// - Full-document writes only happen through `insert`. Everything else is a delta.

use async_trait::async_trait;
use serde_json::Value as Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("duplicate document with _id {id}")]
    Duplicate { id: String },

    #[error("invalid update: {0}")]
    InvalidUpdate(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl DocumentStoreError {
    /// Backend failures may succeed on another attempt, malformed requests never will.
    pub fn is_transient(&self) -> bool {
        matches!(self, DocumentStoreError::Backend(_))
    }
}

/// Matches one element of a top-level array field by its `_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMatch {
    pub array: String,
    pub id: String,
}

/// `{ _id }`, optionally combined with `{ "<array>._id": <id> }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub id: String,
    pub element: Option<ElementMatch>,
}

impl Filter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element: None,
        }
    }

    pub fn with_element(mut self, array: impl Into<String>, id: impl Into<String>) -> Self {
        self.element = Some(ElementMatch {
            array: array.into(),
            id: id.into(),
        });
        self
    }
}

/// A single delta primitive. Paths are dotted; `$` addresses the element
/// matched by the filter's `ElementMatch`.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    Set { path: String, value: Json },
    Inc { path: String, by: f64 },
    Push { path: String, value: Json },
    PullById { path: String, id: String },
}

/// All operations of one update apply to a document together or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub ops: Vec<UpdateOp>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, path: impl Into<String>, value: Json) -> Self {
        self.ops.push(UpdateOp::Set {
            path: path.into(),
            value,
        });
        self
    }

    pub fn inc(mut self, path: impl Into<String>, by: f64) -> Self {
        self.ops.push(UpdateOp::Inc {
            path: path.into(),
            by,
        });
        self
    }

    pub fn push(mut self, path: impl Into<String>, value: Json) -> Self {
        self.ops.push(UpdateOp::Push {
            path: path.into(),
            value,
        });
        self
    }

    pub fn pull_by_id(mut self, path: impl Into<String>, id: impl Into<String>) -> Self {
        self.ops.push(UpdateOp::PullById {
            path: path.into(),
            id: id.into(),
        });
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, document: Json) -> Result<(), DocumentStoreError>;

    /// Returns the number of documents the filter matched (0 or 1).
    async fn update(&self, filter: &Filter, update: &Update) -> Result<u64, DocumentStoreError>;

    /// Returns the number of documents removed (0 or 1).
    async fn remove(&self, filter: &Filter) -> Result<u64, DocumentStoreError>;

    async fn find_all(&self) -> Result<Vec<Json>, DocumentStoreError>;

    async fn find_one(&self, filter: &Filter) -> Result<Option<Json>, DocumentStoreError>;
}

pub mod in_memory;
pub mod json_file;
