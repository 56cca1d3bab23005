use crate::modules::cards::core::state::SubTask;

/// One caller intent against the card aggregate. Everything the decider needs
/// is already resolved here: ids, timestamps and new subtasks are generated by
/// the command handler before the command is built.
#[derive(Debug, Clone, PartialEq)]
pub enum CardCommand {
    AddCard {
        card_id: String,
        title: String,
        content: String,
        created_time: i64,
    },
    RenameCard {
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
    AddActualTime {
        card_id: String,
        hours: f64,
    },
    FinishTimer {
        card_id: String,
        session_id: String,
        hours: f64,
    },
    DeleteCard {
        card_id: String,
    },
    AddSubTask {
        card_id: String,
        sub_task: SubTask,
    },
    ToggleSubTask {
        card_id: String,
        sub_task_id: String,
    },
    DeleteSubTask {
        card_id: String,
        sub_task_id: String,
    },
    UpdateSubTask {
        card_id: String,
        sub_task_id: String,
        title: String,
    },
}
