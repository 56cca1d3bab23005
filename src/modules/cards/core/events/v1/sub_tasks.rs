// Event payloads: edits to a card's nested subtask list.

use crate::modules::cards::core::state::SubTask;

/// The subtask is fully built by the command layer before this event exists.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct SubTaskAddedV1 {
    pub card_id: String,
    pub sub_task: SubTask,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct SubTaskToggledV1 {
    pub card_id: String,
    pub sub_task_id: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct SubTaskDeletedV1 {
    pub card_id: String,
    pub sub_task_id: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct SubTaskRenamedV1 {
    pub card_id: String,
    pub sub_task_id: String,
    pub title: String,
}
