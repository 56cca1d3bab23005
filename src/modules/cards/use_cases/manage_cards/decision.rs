use crate::modules::cards::core::events::CardEvent;
use crate::modules::cards::core::intents::CardIntent;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecideError {
    #[error("{field} must be a finite, non-negative number of hours, got {value}")]
    InvalidHours { field: &'static str, value: f64 },
}

/// Exactly one event for the projection and one intent for the store.
#[derive(Debug)]
pub enum Decision {
    Accepted {
        event: CardEvent,
        intent: CardIntent,
    },
    Rejected {
        reason: DecideError,
    },
}
