// The normalized card collection the UI reads from.
//
// Notes
// - Field names serialize exactly like the persisted documents, so a card loaded
//   from the store and a card built by evolve are the same value.
// - Cards are held behind Arc: a transition replaces only the entry it touches,
//   every other entry stays pointer-identical.
// - `sub_tasks` is None only for documents written before subtasks existed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_time: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpentTime {
    pub estimated: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub session_ids: Vec<String>,
    #[serde(default)]
    pub spent_time_in_hour: SpentTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<SubTask>>,
}

impl Card {
    /// A freshly created card: zeroed time tracking and an empty, addressable subtask list.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_time: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created_time,
            session_ids: Vec::new(),
            spent_time_in_hour: SpentTime::default(),
            sub_tasks: Some(Vec::new()),
        }
    }

    pub fn sub_task(&self, sub_task_id: &str) -> Option<&SubTask> {
        self.sub_tasks
            .as_deref()
            .and_then(|tasks| tasks.iter().find(|task| task.id == sub_task_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardsState {
    cards: HashMap<String, Arc<Card>>,
}

impl CardsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards
                .into_iter()
                .map(|card| (card.id.clone(), Arc::new(card)))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Card>> {
        self.cards.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards ordered by creation time, ties broken by id.
    pub fn ordered(&self) -> Vec<Arc<Card>> {
        let mut cards: Vec<Arc<Card>> = self.cards.values().cloned().collect();
        cards.sort_by(|a, b| {
            a.created_time
                .cmp(&b.created_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        cards
    }

    pub(crate) fn put(&mut self, card: Card) {
        self.cards.insert(card.id.clone(), Arc::new(card));
    }

    pub(crate) fn remove(&mut self, id: &str) {
        self.cards.remove(id);
    }
}
