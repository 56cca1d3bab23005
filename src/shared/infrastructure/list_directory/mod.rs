// Port for the owning-list collaborator.
//
// Purpose
// - The board container owns card-to-list placement. The card core only asks it
//   to associate a new card id with a list, or to drop a reference before the
//   card itself is deleted.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListDirectoryError {
    #[error("list backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ListDirectory: Send + Sync {
    async fn add_card_by_id(&self, list_id: &str, card_id: &str) -> Result<(), ListDirectoryError>;
    async fn delete_card(&self, list_id: &str, card_id: &str) -> Result<(), ListDirectoryError>;
}

pub mod in_memory;
