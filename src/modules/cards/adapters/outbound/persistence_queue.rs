// Per-card persistence lanes.
//
// Purpose
// - Run the second phase of every command: write its intent to the document store
//   without holding up the caller.
//
// Responsibilities
// - One worker per card id, draining that card's intents in the order they were issued.
//   Writes for different cards run concurrently.
// - A worker whose lane is empty after a write closes the lane and removes it from the
//   table before replying, so idle and deleted cards hold no task.
// - Retry transient failures of idempotent intents with linear backoff.
// - Publish a PersistenceReport for every intent, successful or not.
//
// Boundaries
// - Never touches the projection. A failed write does not roll anything back.

use crate::modules::cards::adapters::outbound::card_store::{
    PersistOutcome, PersistenceError, persist_intent,
};
use crate::modules::cards::core::intents::CardIntent;
use crate::shared::infrastructure::document_store::DocumentStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};

const REPORT_CAPACITY: usize = 256;

type PersistResult = Result<PersistOutcome, PersistenceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts for an idempotent intent, the first one included.
    pub max_attempts: u32,
    /// Wait `backoff * n` after the n-th failed attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    fn attempts_for(&self, intent: &CardIntent) -> u32 {
        if intent.is_idempotent() {
            self.max_attempts.max(1)
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceStatus {
    Applied { matched: u64 },
    NoMatch,
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceReport {
    pub card_id: String,
    pub intent: &'static str,
    pub attempts: u32,
    pub status: PersistenceStatus,
}

/// Handle on one queued write. Dropping it leaves the write running.
#[derive(Debug)]
pub struct PersistenceTask {
    receiver: oneshot::Receiver<PersistResult>,
}

impl PersistenceTask {
    pub async fn outcome(self) -> PersistResult {
        self.receiver
            .await
            .unwrap_or(Err(PersistenceError::WorkerStopped))
    }
}

struct Job {
    intent: CardIntent,
    reply: oneshot::Sender<PersistResult>,
}

struct Lane {
    id: u64,
    sender: mpsc::UnboundedSender<Job>,
}

type Lanes = Arc<Mutex<HashMap<String, Lane>>>;

pub struct PersistenceQueue<TStore>
where
    TStore: DocumentStore + ?Sized + 'static,
{
    store: Arc<TStore>,
    policy: RetryPolicy,
    lanes: Lanes,
    next_lane_id: AtomicU64,
    reports: broadcast::Sender<PersistenceReport>,
}

impl<TStore> PersistenceQueue<TStore>
where
    TStore: DocumentStore + ?Sized + 'static,
{
    pub fn new(store: Arc<TStore>, policy: RetryPolicy) -> Self {
        let (reports, _) = broadcast::channel(REPORT_CAPACITY);
        Self {
            store,
            policy,
            lanes: Arc::new(Mutex::new(HashMap::new())),
            next_lane_id: AtomicU64::new(0),
            reports,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PersistenceReport> {
        self.reports.subscribe()
    }

    /// Number of cards with writes queued or in flight.
    pub async fn lane_count(&self) -> usize {
        self.lanes.lock().await.len()
    }

    pub async fn enqueue(&self, intent: CardIntent) -> PersistenceTask {
        let (reply, receiver) = oneshot::channel();
        let card_id = intent.card_id().to_string();
        tracing::debug!(card_id = %card_id, intent = intent.name(), "queueing intent");

        let mut lanes = self.lanes.lock().await;
        let mut job = Job { intent, reply };
        if let Some(lane) = lanes.get(&card_id) {
            match lane.sender.send(job) {
                Ok(()) => return PersistenceTask { receiver },
                Err(mpsc::error::SendError(returned)) => job = returned,
            }
        }
        let lane = self.spawn_lane(card_id.clone());
        // a fresh lane only refuses the job if its worker already died; the dropped reply
        // then surfaces as WorkerStopped
        let _ = lane.sender.send(job);
        lanes.insert(card_id, lane);
        PersistenceTask { receiver }
    }

    fn spawn_lane(&self, card_id: String) -> Lane {
        let (sender, mut jobs) = mpsc::unbounded_channel::<Job>();
        let id = self.next_lane_id.fetch_add(1, Ordering::Relaxed);
        let store = self.store.clone();
        let policy = self.policy;
        let reports = self.reports.clone();
        let lanes = self.lanes.clone();
        tracing::debug!(card_id = %card_id, lane = id, "opening persistence lane");
        tokio::spawn(async move {
            while let Some(Job { intent, reply }) = jobs.recv().await {
                let result = run(&*store, &policy, &reports, &intent).await;
                // enqueue sends under the same lock, so an empty lane here stays empty
                let idle = {
                    let mut open = lanes.lock().await;
                    let idle = jobs.is_empty();
                    if idle && open.get(&card_id).is_some_and(|lane| lane.id == id) {
                        open.remove(&card_id);
                    }
                    idle
                };
                let _ = reply.send(result);
                if idle {
                    break;
                }
            }
            tracing::debug!(card_id = %card_id, lane = id, "persistence lane closed");
        });
        Lane { id, sender }
    }
}

async fn run<TStore>(
    store: &TStore,
    policy: &RetryPolicy,
    reports: &broadcast::Sender<PersistenceReport>,
    intent: &CardIntent,
) -> PersistResult
where
    TStore: DocumentStore + ?Sized,
{
    let max_attempts = policy.attempts_for(intent);
    let mut attempts = 0;
    let result = loop {
        attempts += 1;
        match persist_intent(store, intent).await {
            Err(error) if error.is_transient() && attempts < max_attempts => {
                tracing::warn!(
                    card_id = intent.card_id(),
                    intent = intent.name(),
                    attempts,
                    %error,
                    "persistence attempt failed, retrying"
                );
                tokio::time::sleep(policy.backoff * attempts).await;
            }
            other => break other,
        }
    };

    let status = match &result {
        Ok(PersistOutcome::Applied { matched }) => {
            tracing::debug!(
                card_id = intent.card_id(),
                intent = intent.name(),
                attempts,
                "intent persisted"
            );
            PersistenceStatus::Applied { matched: *matched }
        }
        Ok(PersistOutcome::NoMatch) => {
            tracing::warn!(
                card_id = intent.card_id(),
                intent = intent.name(),
                "no stored card matched the intent"
            );
            PersistenceStatus::NoMatch
        }
        Ok(PersistOutcome::Skipped) => {
            tracing::warn!(
                card_id = intent.card_id(),
                intent = intent.name(),
                "toggle target missing in store, write skipped"
            );
            PersistenceStatus::Skipped
        }
        Err(error) => {
            tracing::error!(
                card_id = intent.card_id(),
                intent = intent.name(),
                attempts,
                %error,
                "intent could not be persisted"
            );
            PersistenceStatus::Failed {
                reason: error.to_string(),
            }
        }
    };
    // nobody listening is fine
    let _ = reports.send(PersistenceReport {
        card_id: intent.card_id().to_string(),
        intent: intent.name(),
        attempts,
        status,
    });
    result
}
