// Translate card intents into document store primitives.
//
// Purpose
// - Keep the persisted documents convergent with the projection by replaying the
//   same semantic operation as a minimal delta, never by diffing.
//
// Responsibilities
// - One intent maps to exactly one document store write (toggle adds one read first).
// - Report whether the write matched a document, so divergence can be observed.

use crate::modules::cards::core::intents::CardIntent;
use crate::shared::infrastructure::document_store::{
    DocumentStore, DocumentStoreError, Filter, Update,
};
use serde_json::{Value as Json, json};
use thiserror::Error;

const SUB_TASKS: &str = "subTasks";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] DocumentStoreError),

    #[error("failed to serialize card: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("persistence worker stopped before reporting an outcome")]
    WorkerStopped,
}

impl PersistenceError {
    pub fn is_transient(&self) -> bool {
        matches!(self, PersistenceError::Store(error) if error.is_transient())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Applied { matched: u64 },
    /// No document carried the card id: the projection and the store diverged.
    NoMatch,
    /// The toggle read found no such subtask, so nothing was written.
    Skipped,
}

impl PersistOutcome {
    fn from_matched(matched: u64) -> Self {
        if matched == 0 {
            PersistOutcome::NoMatch
        } else {
            PersistOutcome::Applied { matched }
        }
    }
}

pub async fn persist_intent<TStore>(
    store: &TStore,
    intent: &CardIntent,
) -> Result<PersistOutcome, PersistenceError>
where
    TStore: DocumentStore + ?Sized,
{
    match intent {
        CardIntent::InsertCard { card } => {
            store.insert(serde_json::to_value(card)?).await?;
            Ok(PersistOutcome::Applied { matched: 1 })
        }
        CardIntent::SetTitle { card_id, title } => {
            set_field(store, card_id, "title", json!(title)).await
        }
        CardIntent::SetContent { card_id, content } => {
            set_field(store, card_id, "content", json!(content)).await
        }
        CardIntent::SetEstimatedTime { card_id, hours } => {
            set_field(store, card_id, "spentTimeInHour.estimated", json!(hours)).await
        }
        CardIntent::SetActualTime { card_id, hours } => {
            set_field(store, card_id, "spentTimeInHour.actual", json!(hours)).await
        }
        CardIntent::IncrementActualTime { card_id, hours } => {
            let update = Update::new().inc("spentTimeInHour.actual", *hours);
            update_card(store, &Filter::by_id(card_id.as_str()), &update).await
        }
        CardIntent::RecordSession {
            card_id,
            session_id,
            hours,
        } => {
            // push and inc travel in one update so neither half lands alone
            let update = Update::new()
                .push("sessionIds", json!(session_id))
                .inc("spentTimeInHour.actual", *hours);
            update_card(store, &Filter::by_id(card_id.as_str()), &update).await
        }
        CardIntent::RemoveCard { card_id } => {
            let removed = store.remove(&Filter::by_id(card_id.as_str())).await?;
            Ok(PersistOutcome::from_matched(removed))
        }
        CardIntent::PushSubTask { card_id, sub_task } => {
            let update = Update::new().push(SUB_TASKS, serde_json::to_value(sub_task)?);
            update_card(store, &Filter::by_id(card_id.as_str()), &update).await
        }
        CardIntent::ToggleSubTask {
            card_id,
            sub_task_id,
        } => toggle_sub_task(store, card_id, sub_task_id).await,
        CardIntent::PullSubTask {
            card_id,
            sub_task_id,
        } => {
            let update = Update::new().pull_by_id(SUB_TASKS, sub_task_id.as_str());
            update_card(store, &Filter::by_id(card_id.as_str()), &update).await
        }
        CardIntent::SetSubTaskTitle {
            card_id,
            sub_task_id,
            title,
        } => {
            let filter =
                Filter::by_id(card_id.as_str()).with_element(SUB_TASKS, sub_task_id.as_str());
            let update = Update::new().set("subTasks.$.title", json!(title));
            update_card(store, &filter, &update).await
        }
    }
}

async fn set_field<TStore>(
    store: &TStore,
    card_id: &str,
    path: &str,
    value: Json,
) -> Result<PersistOutcome, PersistenceError>
where
    TStore: DocumentStore + ?Sized,
{
    update_card(store, &Filter::by_id(card_id), &Update::new().set(path, value)).await
}

async fn update_card<TStore>(
    store: &TStore,
    filter: &Filter,
    update: &Update,
) -> Result<PersistOutcome, PersistenceError>
where
    TStore: DocumentStore + ?Sized,
{
    let matched = store.update(filter, update).await?;
    Ok(PersistOutcome::from_matched(matched))
}

/// The store has no toggle primitive: read the stored flag, then write its negation.
/// Callers must not run two toggles for the same card concurrently.
async fn toggle_sub_task<TStore>(
    store: &TStore,
    card_id: &str,
    sub_task_id: &str,
) -> Result<PersistOutcome, PersistenceError>
where
    TStore: DocumentStore + ?Sized,
{
    let filter = Filter::by_id(card_id).with_element(SUB_TASKS, sub_task_id);
    let Some(document) = store.find_one(&filter).await? else {
        return Ok(PersistOutcome::Skipped);
    };
    let completed = document
        .get(SUB_TASKS)
        .and_then(Json::as_array)
        .and_then(|tasks| {
            tasks
                .iter()
                .find(|task| task.get("_id").and_then(Json::as_str) == Some(sub_task_id))
        })
        .and_then(|task| task.get("completed"))
        .and_then(Json::as_bool)
        .unwrap_or(false);
    let update = Update::new().set("subTasks.$.completed", json!(!completed));
    match store.update(&filter, &update).await? {
        0 => Ok(PersistOutcome::Skipped),
        matched => Ok(PersistOutcome::Applied { matched }),
    }
}
