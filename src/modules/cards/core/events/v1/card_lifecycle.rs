// Event payloads: a card enters or leaves the collection, or the collection is replaced.
//
// Timestamps
// - `created_time` is epoch milliseconds, fixed at creation and never mutated afterwards.

use crate::modules::cards::core::state::Card;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CardAddedV1 {
    pub card_id: String,
    pub title: String,
    pub content: String,
    pub created_time: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CardDeletedV1 {
    pub card_id: String,
}

/// Full overwrite of the in-memory collection with what the store holds.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct CardsReplacedV1 {
    pub cards: Vec<Card>,
}
