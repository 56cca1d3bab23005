// Evolve function: combine the current card collection with one event to produce the next one.
//
// Boundaries
// - No input or output. Never panics, never fails.
// - An event naming a card that is not in the collection leaves the collection unchanged.
// - Only the entry an event touches is replaced; every other entry keeps its Arc.

use crate::modules::cards::core::events::CardEvent;
use crate::modules::cards::core::events::v1::card_fields::{
    ActualTimeSetV1, CardContentSetV1, CardRenamedV1, EstimatedTimeSetV1,
};
use crate::modules::cards::core::events::v1::card_lifecycle::{
    CardAddedV1, CardDeletedV1, CardsReplacedV1,
};
use crate::modules::cards::core::events::v1::sub_tasks::{
    SubTaskAddedV1, SubTaskDeletedV1, SubTaskRenamedV1, SubTaskToggledV1,
};
use crate::modules::cards::core::events::v1::time_tracking::{
    ActualTimeAddedV1, SessionRecordedV1,
};
use crate::modules::cards::core::state::{Card, CardsState, SubTask};

pub fn evolve(mut state: CardsState, event: CardEvent) -> CardsState {
    match event {
        CardEvent::CardsReplacedV1(CardsReplacedV1 { cards }) => CardsState::from_cards(cards),
        CardEvent::CardAddedV1(CardAddedV1 {
            card_id,
            title,
            content,
            created_time,
        }) => {
            state.put(Card::new(card_id, title, content, created_time));
            state
        }
        CardEvent::CardDeletedV1(CardDeletedV1 { card_id }) => {
            state.remove(&card_id);
            state
        }
        CardEvent::CardRenamedV1(CardRenamedV1 { card_id, title }) => {
            with_card(state, &card_id, |card| {
                card.title = title;
                true
            })
        }
        CardEvent::CardContentSetV1(CardContentSetV1 { card_id, content }) => {
            with_card(state, &card_id, |card| {
                card.content = content;
                true
            })
        }
        CardEvent::EstimatedTimeSetV1(EstimatedTimeSetV1 { card_id, hours }) => {
            with_card(state, &card_id, |card| {
                card.spent_time_in_hour.estimated = hours;
                true
            })
        }
        CardEvent::ActualTimeSetV1(ActualTimeSetV1 { card_id, hours }) => {
            with_card(state, &card_id, |card| {
                card.spent_time_in_hour.actual = hours;
                true
            })
        }
        CardEvent::ActualTimeAddedV1(ActualTimeAddedV1 { card_id, hours }) => {
            with_card(state, &card_id, |card| {
                card.spent_time_in_hour.actual += hours;
                true
            })
        }
        CardEvent::SessionRecordedV1(SessionRecordedV1 {
            card_id,
            session_id,
            hours,
        }) => with_card(state, &card_id, |card| {
            card.session_ids.push(session_id);
            card.spent_time_in_hour.actual += hours;
            true
        }),
        CardEvent::SubTaskAddedV1(SubTaskAddedV1 { card_id, sub_task }) => {
            with_card(state, &card_id, |card| {
                card.sub_tasks.get_or_insert_with(Vec::new).push(sub_task);
                true
            })
        }
        CardEvent::SubTaskToggledV1(SubTaskToggledV1 {
            card_id,
            sub_task_id,
        }) => with_sub_task(state, &card_id, &sub_task_id, |task| {
            task.completed = !task.completed;
        }),
        CardEvent::SubTaskRenamedV1(SubTaskRenamedV1 {
            card_id,
            sub_task_id,
            title,
        }) => with_sub_task(state, &card_id, &sub_task_id, |task| {
            task.title = title;
        }),
        CardEvent::SubTaskDeletedV1(SubTaskDeletedV1 {
            card_id,
            sub_task_id,
        }) => with_card(state, &card_id, |card| {
            let Some(tasks) = card.sub_tasks.as_mut() else {
                return false;
            };
            let before = tasks.len();
            tasks.retain(|task| task.id != sub_task_id);
            tasks.len() != before
        }),
    }
}

/// Applies `change` to a copy of the card and stores it only if `change` reports a modification.
fn with_card(
    mut state: CardsState,
    card_id: &str,
    change: impl FnOnce(&mut Card) -> bool,
) -> CardsState {
    let Some(current) = state.get(card_id) else {
        return state;
    };
    let mut next = Card::clone(current);
    if change(&mut next) {
        state.put(next);
    }
    state
}

/// Edits one subtask in place. A card without a subtask list is left alone.
fn with_sub_task(
    state: CardsState,
    card_id: &str,
    sub_task_id: &str,
    change: impl FnOnce(&mut SubTask),
) -> CardsState {
    with_card(state, card_id, |card| {
        let Some(task) = card
            .sub_tasks
            .as_mut()
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == sub_task_id))
        else {
            return false;
        };
        change(task);
        true
    })
}
