use crate::modules::cards::core::state::Card;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait CardQueries: Send + Sync {
    /// Every card, ordered by creation time.
    async fn list_cards(&self) -> anyhow::Result<Vec<Arc<Card>>>;
    async fn get_card(&self, card_id: &str) -> anyhow::Result<Option<Arc<Card>>>;
}
