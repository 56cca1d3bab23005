// Command layer for the card aggregate.
//
// Purpose
// - Turn one caller operation into one projection event and one persistence intent.
//
// Responsibilities
// - Resolve ids and timestamps before deciding.
// - Apply the event to the projection before returning, so reads see it at once.
// - Await the owning-list collaborator where the card store write depends on it.
// - Queue the intent on the card's persistence lane and hand back the task.
// - Projection apply and enqueue happen under one lock, so concurrent callers reach the
//   store in the same order they reached the projection.

use crate::modules::cards::adapters::outbound::persistence_queue::{
    PersistenceQueue, PersistenceReport, PersistenceTask, RetryPolicy,
};
use crate::modules::cards::adapters::outbound::projections_in_memory::InMemoryCardProjection;
use crate::modules::cards::core::events::CardEvent;
use crate::modules::cards::core::events::v1::card_lifecycle::CardsReplacedV1;
use crate::modules::cards::core::intents::CardIntent;
use crate::modules::cards::core::state::{Card, SubTask};
use crate::modules::cards::use_cases::manage_cards::command::CardCommand;
use crate::modules::cards::use_cases::manage_cards::decide::decide;
use crate::modules::cards::use_cases::manage_cards::decision::Decision;
use crate::shared::core::primitives::{Clock, IdGenerator};
use crate::shared::infrastructure::document_store::{DocumentStore, DocumentStoreError};
use crate::shared::infrastructure::list_directory::{ListDirectory, ListDirectoryError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, broadcast};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain rejected: {0}")]
    Domain(String),

    #[error(transparent)]
    ListDirectory(#[from] ListDirectoryError),

    #[error(transparent)]
    Store(#[from] DocumentStoreError),

    #[error("stored card is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct CardCommandHandler<TStore, TLists>
where
    TStore: DocumentStore + ?Sized + 'static,
    TLists: ListDirectory + ?Sized,
{
    projection: Arc<InMemoryCardProjection>,
    store: Arc<TStore>,
    lists: Arc<TLists>,
    queue: PersistenceQueue<TStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    mutations: AtomicU64,
    dispatch_lock: Mutex<()>,
}

impl<TStore, TLists> CardCommandHandler<TStore, TLists>
where
    TStore: DocumentStore + ?Sized + 'static,
    TLists: ListDirectory + ?Sized,
{
    pub fn new(
        projection: Arc<InMemoryCardProjection>,
        store: Arc<TStore>,
        lists: Arc<TLists>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            queue: PersistenceQueue::new(store.clone(), policy),
            projection,
            store,
            lists,
            ids,
            clock,
            mutations: AtomicU64::new(0),
            dispatch_lock: Mutex::new(()),
        }
    }

    pub fn projection(&self) -> &Arc<InMemoryCardProjection> {
        &self.projection
    }

    pub fn subscribe_reports(&self) -> broadcast::Receiver<PersistenceReport> {
        self.queue.subscribe()
    }

    pub fn new_card_id(&self) -> String {
        self.ids.generate()
    }

    /// Replace the whole projection with the stored collection.
    ///
    /// Meant for startup. Run after mutations it discards every optimistic change
    /// whose write has not landed yet; that case is logged, not refused.
    pub async fn fetch_all(&self) -> Result<usize, ApplicationError> {
        let issued = self.mutations.load(Ordering::SeqCst);
        if issued > 0 {
            tracing::warn!(
                issued,
                "fetching all cards after mutations, unpersisted changes may be lost"
            );
        }
        let cards = self
            .store
            .find_all()
            .await?
            .into_iter()
            .map(serde_json::from_value::<Card>)
            .collect::<Result<Vec<_>, _>>()?;
        let count = cards.len();
        self.projection
            .apply(CardEvent::CardsReplacedV1(CardsReplacedV1 { cards }))
            .await;
        tracing::info!(count, "loaded cards from store");
        Ok(count)
    }

    /// The list association is awaited before the insert is queued. If it fails the
    /// card stays in the projection but is never written to the store.
    pub async fn add_card(
        &self,
        card_id: &str,
        list_id: &str,
        title: &str,
        content: &str,
    ) -> Result<PersistenceTask, ApplicationError> {
        let _ordered = self.dispatch_lock.lock().await;
        let intent = self
            .apply(CardCommand::AddCard {
                card_id: card_id.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                created_time: self.clock.now_millis(),
            })
            .await?;
        self.lists.add_card_by_id(list_id, card_id).await?;
        tracing::info!(card_id, list_id, "card added");
        Ok(self.queue.enqueue(intent).await)
    }

    pub async fn rename_card(
        &self,
        card_id: &str,
        title: &str,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::RenameCard {
            card_id: card_id.to_string(),
            title: title.to_string(),
        })
        .await
    }

    pub async fn set_content(
        &self,
        card_id: &str,
        content: &str,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::SetContent {
            card_id: card_id.to_string(),
            content: content.to_string(),
        })
        .await
    }

    pub async fn set_estimated_time(
        &self,
        card_id: &str,
        hours: f64,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::SetEstimatedTime {
            card_id: card_id.to_string(),
            hours,
        })
        .await
    }

    pub async fn set_actual_time(
        &self,
        card_id: &str,
        hours: f64,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::SetActualTime {
            card_id: card_id.to_string(),
            hours,
        })
        .await
    }

    pub async fn add_actual_time(
        &self,
        card_id: &str,
        hours: f64,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::AddActualTime {
            card_id: card_id.to_string(),
            hours,
        })
        .await
    }

    pub async fn on_timer_finished(
        &self,
        card_id: &str,
        session_id: &str,
        hours: f64,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::FinishTimer {
            card_id: card_id.to_string(),
            session_id: session_id.to_string(),
            hours,
        })
        .await
    }

    /// The list drops its reference first; on failure nothing else happens.
    pub async fn delete_card(
        &self,
        card_id: &str,
        list_id: &str,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.lists.delete_card(list_id, card_id).await?;
        let task = self
            .dispatch(CardCommand::DeleteCard {
                card_id: card_id.to_string(),
            })
            .await?;
        tracing::info!(card_id, list_id, "card deleted");
        Ok(task)
    }

    /// Returns the id of the new subtask with the persistence task.
    pub async fn add_sub_task(
        &self,
        card_id: &str,
        title: &str,
    ) -> Result<(String, PersistenceTask), ApplicationError> {
        let sub_task = SubTask {
            id: self.ids.generate(),
            title: title.to_string(),
            completed: false,
            created_time: self.clock.now_millis(),
        };
        let sub_task_id = sub_task.id.clone();
        let task = self
            .dispatch(CardCommand::AddSubTask {
                card_id: card_id.to_string(),
                sub_task,
            })
            .await?;
        Ok((sub_task_id, task))
    }

    pub async fn toggle_sub_task(
        &self,
        card_id: &str,
        sub_task_id: &str,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::ToggleSubTask {
            card_id: card_id.to_string(),
            sub_task_id: sub_task_id.to_string(),
        })
        .await
    }

    pub async fn delete_sub_task(
        &self,
        card_id: &str,
        sub_task_id: &str,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::DeleteSubTask {
            card_id: card_id.to_string(),
            sub_task_id: sub_task_id.to_string(),
        })
        .await
    }

    pub async fn update_sub_task(
        &self,
        card_id: &str,
        sub_task_id: &str,
        title: &str,
    ) -> Result<PersistenceTask, ApplicationError> {
        self.dispatch(CardCommand::UpdateSubTask {
            card_id: card_id.to_string(),
            sub_task_id: sub_task_id.to_string(),
            title: title.to_string(),
        })
        .await
    }

    async fn dispatch(&self, command: CardCommand) -> Result<PersistenceTask, ApplicationError> {
        let _ordered = self.dispatch_lock.lock().await;
        let intent = self.apply(command).await?;
        Ok(self.queue.enqueue(intent).await)
    }

    async fn apply(&self, command: CardCommand) -> Result<CardIntent, ApplicationError> {
        match decide(command) {
            Decision::Accepted { event, intent } => {
                self.projection.apply(event).await;
                self.mutations.fetch_add(1, Ordering::SeqCst);
                Ok(intent)
            }
            Decision::Rejected { reason } => Err(ApplicationError::Domain(reason.to_string())),
        }
    }
}

#[cfg(test)]
mod card_command_handler_tests {
    use super::*;
    use crate::modules::cards::adapters::outbound::card_store::PersistOutcome;
    use crate::modules::cards::adapters::outbound::persistence_queue::PersistenceStatus;
    use crate::shared::infrastructure::document_store::Filter;
    use crate::tests::fixtures::cards::CardBuilder;
    use crate::tests::fixtures::handlers::{TestContext, make_test_context};
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> TestContext {
        make_test_context()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_show_a_new_card_before_it_is_persisted(before_each: TestContext) {
        let ctx = before_each;
        ctx.store.set_delay_ms(20);

        let task = ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();

        let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
        assert_eq!(card.title, "Buy milk");
        assert_eq!(card.created_time, 1_700_000_000_000);
        assert_eq!(card.sub_tasks, Some(Vec::new()));
        assert_eq!(ctx.lists.cards_of("list1").await, vec!["c1"]);

        assert_eq!(task.outcome().await.unwrap(), PersistOutcome::Applied { matched: 1 });
        assert!(ctx.store.find_one(&Filter::by_id("c1")).await.unwrap().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_insert_a_card_its_list_refused(before_each: TestContext) {
        let ctx = before_each;
        ctx.lists.toggle_offline();

        let result = ctx.handler.add_card("c1", "list1", "Buy milk", "").await;

        assert!(matches!(result, Err(ApplicationError::ListDirectory(_))));
        assert!(ctx.store.find_all().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_the_card_when_its_list_cannot_drop_it(before_each: TestContext) {
        let ctx = before_each;
        ctx.handler
            .add_card("c1", "list1", "Buy milk", "")
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap();
        ctx.lists.toggle_offline();

        let result = ctx.handler.delete_card("c1", "list1").await;

        assert!(matches!(result, Err(ApplicationError::ListDirectory(_))));
        assert!(ctx.projection.contains("c1").await);
        assert!(ctx.store.find_one(&Filter::by_id("c1")).await.unwrap().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_delete_from_list_projection_and_store(before_each: TestContext) {
        let ctx = before_each;
        ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();

        ctx.handler
            .delete_card("c1", "list1")
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap();

        assert!(ctx.lists.cards_of("list1").await.is_empty());
        assert!(!ctx.projection.contains("c1").await);
        assert!(ctx.store.find_all().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_negative_hours_without_touching_state(before_each: TestContext) {
        let ctx = before_each;
        ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();
        let before = ctx.projection.snapshot().await;

        let result = ctx.handler.add_actual_time("c1", -2.0).await;

        assert!(matches!(result, Err(ApplicationError::Domain(_))));
        assert_eq!(ctx.projection.snapshot().await, before);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_hand_out_the_generated_subtask_id(before_each: TestContext) {
        let ctx = before_each;
        ctx.handler.add_card("c1", "list1", "Buy milk", "").await.unwrap();

        let (sub_task_id, task) = ctx.handler.add_sub_task("c1", "wash bottle").await.unwrap();
        task.outcome().await.unwrap();

        assert_eq!(sub_task_id, "id-1");
        let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
        let sub_task = card.sub_task(&sub_task_id).unwrap();
        assert!(!sub_task.completed);
        assert_eq!(sub_task.created_time, 1_700_000_000_000);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_load_stored_cards_on_fetch_all(before_each: TestContext) {
        let ctx = before_each;
        let card = CardBuilder::new().id("c7").title("From disk").build();
        ctx.store
            .insert(serde_json::to_value(&card).unwrap())
            .await
            .unwrap();

        let count = ctx.handler.fetch_all().await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            ctx.projection.snapshot().await.get("c7").map(|c| c.as_ref()),
            Some(&card)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_fetch_all_when_the_store_is_offline(before_each: TestContext) {
        let ctx = before_each;
        ctx.store.toggle_offline();

        let result = ctx.handler.fetch_all().await;

        assert!(matches!(result, Err(ApplicationError::Store(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_the_optimistic_state_when_a_write_fails(before_each: TestContext) {
        let ctx = before_each;
        ctx.handler
            .add_card("c1", "list1", "Buy milk", "")
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap();
        let mut reports = ctx.handler.subscribe_reports();
        ctx.store.fail_next_writes(1);

        let result = ctx
            .handler
            .on_timer_finished("c1", "s1", 1.5)
            .await
            .unwrap()
            .outcome()
            .await;

        assert!(result.is_err());
        let card = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
        assert_eq!(card.spent_time_in_hour.actual, 1.5);
        let report = reports.recv().await.unwrap();
        assert_eq!(report.intent, "record_session");
        assert!(matches!(report.status, PersistenceStatus::Failed { .. }));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn it_should_store_concurrent_renames_in_projection_order(before_each: TestContext) {
        let ctx = before_each;
        ctx.handler
            .add_card("c1", "list1", "Buy milk", "")
            .await
            .unwrap()
            .outcome()
            .await
            .unwrap();

        for round in 0..20 {
            let renames: Vec<_> = (0..8)
                .map(|i| {
                    let handler = ctx.handler.clone();
                    tokio::spawn(async move {
                        handler.rename_card("c1", &format!("title {round}-{i}")).await
                    })
                })
                .collect();
            for rename in renames {
                rename.await.unwrap().unwrap().outcome().await.unwrap();
            }

            let projected = ctx.projection.snapshot().await.get("c1").cloned().unwrap();
            let stored = ctx.store.find_one(&Filter::by_id("c1")).await.unwrap().unwrap();
            assert_eq!(stored["title"], serde_json::json!(projected.title));
        }
    }
}
