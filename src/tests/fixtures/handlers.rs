// Command handler wired to in memory collaborators, with deterministic ids and time.
// The handler is typed exactly as the shell holds it, so the same context drives
// handler tests and inbound adapter tests.

use crate::modules::cards::adapters::outbound::persistence_queue::RetryPolicy;
use crate::modules::cards::adapters::outbound::projections_in_memory::InMemoryCardProjection;
use crate::modules::cards::use_cases::manage_cards::handler::CardCommandHandler;
use crate::shared::core::primitives::{FixedClock, SequentialIdGenerator};
use crate::shared::infrastructure::document_store::DocumentStore;
use crate::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
use crate::shared::infrastructure::list_directory::ListDirectory;
use crate::shared::infrastructure::list_directory::in_memory::InMemoryListDirectory;
use crate::shell::state::{AppCommandHandler, AppState};
use std::sync::Arc;
use std::time::Duration;

pub const NOW: i64 = 1_700_000_000_000;

pub struct TestContext {
    pub handler: Arc<AppCommandHandler>,
    pub projection: Arc<InMemoryCardProjection>,
    pub store: Arc<InMemoryDocumentStore>,
    pub lists: Arc<InMemoryListDirectory>,
}

impl TestContext {
    pub fn state(&self) -> AppState {
        AppState::new(self.handler.clone())
    }
}

pub fn make_test_context() -> TestContext {
    let projection = Arc::new(InMemoryCardProjection::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let lists = Arc::new(InMemoryListDirectory::new());
    let handler = Arc::new(CardCommandHandler::new(
        projection.clone(),
        store.clone() as Arc<dyn DocumentStore>,
        lists.clone() as Arc<dyn ListDirectory>,
        Arc::new(SequentialIdGenerator::new("id")),
        Arc::new(FixedClock::new(NOW)),
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
        },
    ));
    TestContext {
        handler,
        projection,
        store,
        lists,
    }
}
