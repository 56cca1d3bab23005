// Shared event fixtures: one constructor per CardEvent variant the tests replay.

use crate::modules::cards::core::events::CardEvent;
use crate::modules::cards::core::events::v1::card_fields::{
    ActualTimeSetV1, CardRenamedV1, EstimatedTimeSetV1,
};
use crate::modules::cards::core::events::v1::card_lifecycle::{CardAddedV1, CardDeletedV1};
use crate::modules::cards::core::events::v1::sub_tasks::{
    SubTaskAddedV1, SubTaskDeletedV1, SubTaskRenamedV1, SubTaskToggledV1,
};
use crate::modules::cards::core::events::v1::time_tracking::{
    ActualTimeAddedV1, SessionRecordedV1,
};
use crate::modules::cards::core::state::SubTask;

pub fn card_added(card_id: &str, title: &str, content: &str) -> CardEvent {
    CardEvent::CardAddedV1(CardAddedV1 {
        card_id: card_id.into(),
        title: title.into(),
        content: content.into(),
        created_time: 1_700_000_000_000,
    })
}

pub fn card_deleted(card_id: &str) -> CardEvent {
    CardEvent::CardDeletedV1(CardDeletedV1 {
        card_id: card_id.into(),
    })
}

pub fn card_renamed(card_id: &str, title: &str) -> CardEvent {
    CardEvent::CardRenamedV1(CardRenamedV1 {
        card_id: card_id.into(),
        title: title.into(),
    })
}

pub fn estimated_time_set(card_id: &str, hours: f64) -> CardEvent {
    CardEvent::EstimatedTimeSetV1(EstimatedTimeSetV1 {
        card_id: card_id.into(),
        hours,
    })
}

pub fn actual_time_set(card_id: &str, hours: f64) -> CardEvent {
    CardEvent::ActualTimeSetV1(ActualTimeSetV1 {
        card_id: card_id.into(),
        hours,
    })
}

pub fn actual_time_added(card_id: &str, hours: f64) -> CardEvent {
    CardEvent::ActualTimeAddedV1(ActualTimeAddedV1 {
        card_id: card_id.into(),
        hours,
    })
}

pub fn session_recorded(card_id: &str, session_id: &str, hours: f64) -> CardEvent {
    CardEvent::SessionRecordedV1(SessionRecordedV1 {
        card_id: card_id.into(),
        session_id: session_id.into(),
        hours,
    })
}

pub fn sub_task_added(card_id: &str, sub_task: SubTask) -> CardEvent {
    CardEvent::SubTaskAddedV1(SubTaskAddedV1 {
        card_id: card_id.into(),
        sub_task,
    })
}

pub fn sub_task_toggled(card_id: &str, sub_task_id: &str) -> CardEvent {
    CardEvent::SubTaskToggledV1(SubTaskToggledV1 {
        card_id: card_id.into(),
        sub_task_id: sub_task_id.into(),
    })
}

pub fn sub_task_deleted(card_id: &str, sub_task_id: &str) -> CardEvent {
    CardEvent::SubTaskDeletedV1(SubTaskDeletedV1 {
        card_id: card_id.into(),
        sub_task_id: sub_task_id.into(),
    })
}

pub fn sub_task_renamed(card_id: &str, sub_task_id: &str, title: &str) -> CardEvent {
    CardEvent::SubTaskRenamedV1(SubTaskRenamedV1 {
        card_id: card_id.into(),
        sub_task_id: sub_task_id.into(),
        title: title.into(),
    })
}
