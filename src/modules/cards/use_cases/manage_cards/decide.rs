use crate::modules::cards::core::{
    events::{
        CardEvent,
        v1::{
            card_fields::{ActualTimeSetV1, CardContentSetV1, CardRenamedV1, EstimatedTimeSetV1},
            card_lifecycle::{CardAddedV1, CardDeletedV1},
            sub_tasks::{SubTaskAddedV1, SubTaskDeletedV1, SubTaskRenamedV1, SubTaskToggledV1},
            time_tracking::{ActualTimeAddedV1, SessionRecordedV1},
        },
    },
    intents::CardIntent,
    state::Card,
};
use crate::modules::cards::use_cases::manage_cards::{
    command::CardCommand,
    decision::{DecideError, Decision},
};

pub fn decide(command: CardCommand) -> Decision {
    match command {
        CardCommand::AddCard {
            card_id,
            title,
            content,
            created_time,
        } => Decision::Accepted {
            intent: CardIntent::InsertCard {
                card: Card::new(card_id.clone(), title.clone(), content.clone(), created_time),
            },
            event: CardEvent::CardAddedV1(CardAddedV1 {
                card_id,
                title,
                content,
                created_time,
            }),
        },
        CardCommand::RenameCard { card_id, title } => Decision::Accepted {
            intent: CardIntent::SetTitle {
                card_id: card_id.clone(),
                title: title.clone(),
            },
            event: CardEvent::CardRenamedV1(CardRenamedV1 { card_id, title }),
        },
        CardCommand::SetContent { card_id, content } => Decision::Accepted {
            intent: CardIntent::SetContent {
                card_id: card_id.clone(),
                content: content.clone(),
            },
            event: CardEvent::CardContentSetV1(CardContentSetV1 { card_id, content }),
        },
        CardCommand::SetEstimatedTime { card_id, hours } => {
            accept_hours("estimated time", hours, || Decision::Accepted {
                intent: CardIntent::SetEstimatedTime {
                    card_id: card_id.clone(),
                    hours,
                },
                event: CardEvent::EstimatedTimeSetV1(EstimatedTimeSetV1 { card_id, hours }),
            })
        }
        CardCommand::SetActualTime { card_id, hours } => {
            accept_hours("actual time", hours, || Decision::Accepted {
                intent: CardIntent::SetActualTime {
                    card_id: card_id.clone(),
                    hours,
                },
                event: CardEvent::ActualTimeSetV1(ActualTimeSetV1 { card_id, hours }),
            })
        }
        CardCommand::AddActualTime { card_id, hours } => {
            accept_hours("added time", hours, || Decision::Accepted {
                intent: CardIntent::IncrementActualTime {
                    card_id: card_id.clone(),
                    hours,
                },
                event: CardEvent::ActualTimeAddedV1(ActualTimeAddedV1 { card_id, hours }),
            })
        }
        CardCommand::FinishTimer {
            card_id,
            session_id,
            hours,
        } => accept_hours("session time", hours, || Decision::Accepted {
            intent: CardIntent::RecordSession {
                card_id: card_id.clone(),
                session_id: session_id.clone(),
                hours,
            },
            event: CardEvent::SessionRecordedV1(SessionRecordedV1 {
                card_id,
                session_id,
                hours,
            }),
        }),
        CardCommand::DeleteCard { card_id } => Decision::Accepted {
            intent: CardIntent::RemoveCard {
                card_id: card_id.clone(),
            },
            event: CardEvent::CardDeletedV1(CardDeletedV1 { card_id }),
        },
        CardCommand::AddSubTask { card_id, sub_task } => Decision::Accepted {
            intent: CardIntent::PushSubTask {
                card_id: card_id.clone(),
                sub_task: sub_task.clone(),
            },
            event: CardEvent::SubTaskAddedV1(SubTaskAddedV1 { card_id, sub_task }),
        },
        CardCommand::ToggleSubTask {
            card_id,
            sub_task_id,
        } => Decision::Accepted {
            intent: CardIntent::ToggleSubTask {
                card_id: card_id.clone(),
                sub_task_id: sub_task_id.clone(),
            },
            event: CardEvent::SubTaskToggledV1(SubTaskToggledV1 {
                card_id,
                sub_task_id,
            }),
        },
        CardCommand::DeleteSubTask {
            card_id,
            sub_task_id,
        } => Decision::Accepted {
            intent: CardIntent::PullSubTask {
                card_id: card_id.clone(),
                sub_task_id: sub_task_id.clone(),
            },
            event: CardEvent::SubTaskDeletedV1(SubTaskDeletedV1 {
                card_id,
                sub_task_id,
            }),
        },
        CardCommand::UpdateSubTask {
            card_id,
            sub_task_id,
            title,
        } => Decision::Accepted {
            intent: CardIntent::SetSubTaskTitle {
                card_id: card_id.clone(),
                sub_task_id: sub_task_id.clone(),
                title: title.clone(),
            },
            event: CardEvent::SubTaskRenamedV1(SubTaskRenamedV1 {
                card_id,
                sub_task_id,
                title,
            }),
        },
    }
}

fn accept_hours(field: &'static str, hours: f64, accepted: impl FnOnce() -> Decision) -> Decision {
    if !hours.is_finite() || hours < 0.0 {
        return Decision::Rejected {
            reason: DecideError::InvalidHours {
                field,
                value: hours,
            },
        };
    }
    accepted()
}
