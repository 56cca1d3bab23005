// In memory implementation of the ListDirectory port.

use crate::shared::infrastructure::list_directory::{ListDirectory, ListDirectoryError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryListDirectory {
    lists: RwLock<HashMap<String, Vec<String>>>,
    is_offline: AtomicBool,
}

impl InMemoryListDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub async fn cards_of(&self, list_id: &str) -> Vec<String> {
        self.lists
            .read()
            .await
            .get(list_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), ListDirectoryError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(ListDirectoryError::Backend("List directory offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ListDirectory for InMemoryListDirectory {
    async fn add_card_by_id(&self, list_id: &str, card_id: &str) -> Result<(), ListDirectoryError> {
        self.check_available()?;
        let mut guard = self.lists.write().await;
        let cards = guard.entry(list_id.to_string()).or_default();
        if !cards.iter().any(|id| id == card_id) {
            cards.push(card_id.to_string());
        }
        Ok(())
    }

    async fn delete_card(&self, list_id: &str, card_id: &str) -> Result<(), ListDirectoryError> {
        self.check_available()?;
        if let Some(cards) = self.lists.write().await.get_mut(list_id) {
            cards.retain(|id| id != card_id);
        }
        Ok(())
    }
}
