// Root event enumeration for cards and re-exports of versioned payloads.
//
// Versioning and evolution
// - Prefer additive changes. A breaking change gets a new payload version and a new variant.
// - Events are consumed only by evolve; the store is kept convergent by intents, never by
//   replaying these payloads.

pub mod v1 {
    pub mod card_fields;
    pub mod card_lifecycle;
    pub mod sub_tasks;
    pub mod time_tracking;
}

use v1::card_fields::{ActualTimeSetV1, CardContentSetV1, CardRenamedV1, EstimatedTimeSetV1};
use v1::card_lifecycle::{CardAddedV1, CardDeletedV1, CardsReplacedV1};
use v1::sub_tasks::{SubTaskAddedV1, SubTaskDeletedV1, SubTaskRenamedV1, SubTaskToggledV1};
use v1::time_tracking::{ActualTimeAddedV1, SessionRecordedV1};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CardEvent {
    CardsReplacedV1(CardsReplacedV1),
    CardAddedV1(CardAddedV1),
    CardDeletedV1(CardDeletedV1),
    CardRenamedV1(CardRenamedV1),
    CardContentSetV1(CardContentSetV1),
    EstimatedTimeSetV1(EstimatedTimeSetV1),
    ActualTimeSetV1(ActualTimeSetV1),
    ActualTimeAddedV1(ActualTimeAddedV1),
    SessionRecordedV1(SessionRecordedV1),
    SubTaskAddedV1(SubTaskAddedV1),
    SubTaskToggledV1(SubTaskToggledV1),
    SubTaskDeletedV1(SubTaskDeletedV1),
    SubTaskRenamedV1(SubTaskRenamedV1),
}

impl CardEvent {
    /// The card this event targets; `None` for whole-collection events.
    pub fn card_id(&self) -> Option<&str> {
        match self {
            CardEvent::CardsReplacedV1(_) => None,
            CardEvent::CardAddedV1(e) => Some(&e.card_id),
            CardEvent::CardDeletedV1(e) => Some(&e.card_id),
            CardEvent::CardRenamedV1(e) => Some(&e.card_id),
            CardEvent::CardContentSetV1(e) => Some(&e.card_id),
            CardEvent::EstimatedTimeSetV1(e) => Some(&e.card_id),
            CardEvent::ActualTimeSetV1(e) => Some(&e.card_id),
            CardEvent::ActualTimeAddedV1(e) => Some(&e.card_id),
            CardEvent::SessionRecordedV1(e) => Some(&e.card_id),
            CardEvent::SubTaskAddedV1(e) => Some(&e.card_id),
            CardEvent::SubTaskToggledV1(e) => Some(&e.card_id),
            CardEvent::SubTaskDeletedV1(e) => Some(&e.card_id),
            CardEvent::SubTaskRenamedV1(e) => Some(&e.card_id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardEvent::CardsReplacedV1(_) => "CardsReplaced",
            CardEvent::CardAddedV1(_) => "CardAdded",
            CardEvent::CardDeletedV1(_) => "CardDeleted",
            CardEvent::CardRenamedV1(_) => "CardRenamed",
            CardEvent::CardContentSetV1(_) => "CardContentSet",
            CardEvent::EstimatedTimeSetV1(_) => "EstimatedTimeSet",
            CardEvent::ActualTimeSetV1(_) => "ActualTimeSet",
            CardEvent::ActualTimeAddedV1(_) => "ActualTimeAdded",
            CardEvent::SessionRecordedV1(_) => "SessionRecorded",
            CardEvent::SubTaskAddedV1(_) => "SubTaskAdded",
            CardEvent::SubTaskToggledV1(_) => "SubTaskToggled",
            CardEvent::SubTaskDeletedV1(_) => "SubTaskDeleted",
            CardEvent::SubTaskRenamedV1(_) => "SubTaskRenamed",
        }
    }
}
