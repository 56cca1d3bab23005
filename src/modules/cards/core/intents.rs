use crate::modules::cards::core::state::{Card, SubTask};

/// Persistence intents produced by the decider as part of an Accepted decision.
/// Each one is the minimal delta that mirrors its event in the document store;
/// the outbound card_store adapter translates them into store primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum CardIntent {
    InsertCard {
        card: Card,
    },
    SetTitle {
        card_id: String,
        title: String,
    },
    SetContent {
        card_id: String,
        content: String,
    },
    SetEstimatedTime {
        card_id: String,
        hours: f64,
    },
    SetActualTime {
        card_id: String,
        hours: f64,
    },
    IncrementActualTime {
        card_id: String,
        hours: f64,
    },
    RecordSession {
        card_id: String,
        session_id: String,
        hours: f64,
    },
    RemoveCard {
        card_id: String,
    },
    PushSubTask {
        card_id: String,
        sub_task: SubTask,
    },
    ToggleSubTask {
        card_id: String,
        sub_task_id: String,
    },
    PullSubTask {
        card_id: String,
        sub_task_id: String,
    },
    SetSubTaskTitle {
        card_id: String,
        sub_task_id: String,
        title: String,
    },
}

impl CardIntent {
    pub fn card_id(&self) -> &str {
        match self {
            CardIntent::InsertCard { card } => &card.id,
            CardIntent::SetTitle { card_id, .. }
            | CardIntent::SetContent { card_id, .. }
            | CardIntent::SetEstimatedTime { card_id, .. }
            | CardIntent::SetActualTime { card_id, .. }
            | CardIntent::IncrementActualTime { card_id, .. }
            | CardIntent::RecordSession { card_id, .. }
            | CardIntent::RemoveCard { card_id }
            | CardIntent::PushSubTask { card_id, .. }
            | CardIntent::ToggleSubTask { card_id, .. }
            | CardIntent::PullSubTask { card_id, .. }
            | CardIntent::SetSubTaskTitle { card_id, .. } => card_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardIntent::InsertCard { .. } => "insert_card",
            CardIntent::SetTitle { .. } => "set_title",
            CardIntent::SetContent { .. } => "set_content",
            CardIntent::SetEstimatedTime { .. } => "set_estimated_time",
            CardIntent::SetActualTime { .. } => "set_actual_time",
            CardIntent::IncrementActualTime { .. } => "increment_actual_time",
            CardIntent::RecordSession { .. } => "record_session",
            CardIntent::RemoveCard { .. } => "remove_card",
            CardIntent::PushSubTask { .. } => "push_sub_task",
            CardIntent::ToggleSubTask { .. } => "toggle_sub_task",
            CardIntent::PullSubTask { .. } => "pull_sub_task",
            CardIntent::SetSubTaskTitle { .. } => "set_sub_task_title",
        }
    }

    /// Whether applying the intent twice leaves the store as applying it once.
    /// Increments and pushes accumulate, so they are never retried.
    ///
    /// A toggle is re-read before every write attempt, so a retry after a failed
    /// write negates the same stored value.
    pub fn is_idempotent(&self) -> bool {
        !matches!(
            self,
            CardIntent::IncrementActualTime { .. }
                | CardIntent::RecordSession { .. }
                | CardIntent::PushSubTask { .. }
        )
    }
}
