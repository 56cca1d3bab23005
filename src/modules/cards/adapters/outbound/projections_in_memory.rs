// In memory card projection, the single source of truth the read side serves.
//
// Purpose
// - Hold the authoritative CardsState and feed it one event at a time through evolve.
//
// Responsibilities
// - Serialize transitions behind a write lock, so no transition is ever partially visible.
// - Hand out cheap snapshots; cards are shared by Arc with the live state.
// - Answer CardQueries.

use crate::modules::cards::core::events::CardEvent;
use crate::modules::cards::core::evolve::evolve;
use crate::modules::cards::core::state::{Card, CardsState};
use crate::modules::cards::use_cases::list_cards::queries_port::CardQueries;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryCardProjection {
    state: RwLock<CardsState>,
}

impl InMemoryCardProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn apply(&self, event: CardEvent) {
        tracing::debug!(event = event.name(), card_id = ?event.card_id(), "applying event");
        let mut guard = self.state.write().await;
        let current = std::mem::take(&mut *guard);
        *guard = evolve(current, event);
    }

    pub async fn snapshot(&self) -> CardsState {
        self.state.read().await.clone()
    }

    pub async fn contains(&self, card_id: &str) -> bool {
        self.state.read().await.contains(card_id)
    }
}

#[async_trait::async_trait]
impl CardQueries for InMemoryCardProjection {
    async fn list_cards(&self) -> anyhow::Result<Vec<Arc<Card>>> {
        Ok(self.state.read().await.ordered())
    }

    async fn get_card(&self, card_id: &str) -> anyhow::Result<Option<Arc<Card>>> {
        Ok(self.state.read().await.get(card_id).cloned())
    }
}
