// End to end: cards written through the JSON file store come back after a restart.

use crate::modules::cards::adapters::outbound::persistence_queue::RetryPolicy;
use crate::modules::cards::adapters::outbound::projections_in_memory::InMemoryCardProjection;
use crate::modules::cards::use_cases::manage_cards::handler::CardCommandHandler;
use crate::shared::core::primitives::{FixedClock, SequentialIdGenerator};
use crate::shared::infrastructure::document_store::DocumentStore;
use crate::shared::infrastructure::document_store::json_file::JsonFileDocumentStore;
use crate::shared::infrastructure::list_directory::ListDirectory;
use crate::shared::infrastructure::list_directory::in_memory::InMemoryListDirectory;
use crate::shell::state::AppCommandHandler;
use crate::tests::fixtures::handlers::NOW;
use std::path::Path;
use std::sync::Arc;

async fn boot(path: &Path) -> Arc<AppCommandHandler> {
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileDocumentStore::open(path).await.unwrap());
    let lists: Arc<dyn ListDirectory> = Arc::new(InMemoryListDirectory::new());
    let handler = Arc::new(CardCommandHandler::new(
        Arc::new(InMemoryCardProjection::new()),
        store,
        lists,
        Arc::new(SequentialIdGenerator::new("st")),
        Arc::new(FixedClock::new(NOW)),
        RetryPolicy::default(),
    ));
    handler.fetch_all().await.unwrap();
    handler
}

#[tokio::test]
async fn restores_cards_from_the_data_file_after_a_restart() {
    let path = std::env::temp_dir().join(format!("kanban-e2e-{}.json", uuid::Uuid::now_v7()));

    let first = boot(&path).await;
    first.add_card("c1", "list1", "Buy milk", "2 litres").await.unwrap();
    first.set_estimated_time("c1", 1.0).await.unwrap();
    first.on_timer_finished("c1", "s1", 0.75).await.unwrap();
    let (sub_task_id, _) = first.add_sub_task("c1", "wash bottle").await.unwrap();
    first
        .toggle_sub_task("c1", &sub_task_id)
        .await
        .unwrap()
        .outcome()
        .await
        .unwrap();
    let before = first.projection().snapshot().await;
    drop(first);

    let second = boot(&path).await;
    let after = second.projection().snapshot().await;

    assert_eq!(after, before);
    let card = after.get("c1").cloned().unwrap();
    assert_eq!(card.session_ids, vec!["s1"]);
    assert_eq!(card.spent_time_in_hour.actual, 0.75);
    assert!(card.sub_task(&sub_task_id).unwrap().completed);
    tokio::fs::remove_file(&path).await.unwrap();
}
