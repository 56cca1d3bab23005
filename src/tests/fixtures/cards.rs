// Shared card fixtures.
// The canonical card lives in json/card.json, in the same shape the store persists.

use crate::modules::cards::core::state::{Card, SubTask};
use std::fs;

const CARD_JSON: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/tests/fixtures/json/card.json");

pub struct CardBuilder {
    inner: Card,
}

impl Default for CardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CardBuilder {
    pub fn new() -> Self {
        let json_str = fs::read_to_string(CARD_JSON).unwrap();
        Self {
            inner: serde_json::from_str(&json_str).unwrap(),
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.inner.title = v.into();
        self
    }

    pub fn content(mut self, v: impl Into<String>) -> Self {
        self.inner.content = v.into();
        self
    }

    pub fn created_time(mut self, v: i64) -> Self {
        self.inner.created_time = v;
        self
    }

    pub fn estimated(mut self, v: f64) -> Self {
        self.inner.spent_time_in_hour.estimated = v;
        self
    }

    pub fn actual(mut self, v: f64) -> Self {
        self.inner.spent_time_in_hour.actual = v;
        self
    }

    pub fn session(mut self, v: impl Into<String>) -> Self {
        self.inner.session_ids.push(v.into());
        self
    }

    pub fn sub_task(mut self, v: SubTask) -> Self {
        self.inner.sub_tasks.get_or_insert_with(Vec::new).push(v);
        self
    }

    /// A card written before subtasks existed.
    pub fn without_sub_tasks(mut self) -> Self {
        self.inner.sub_tasks = None;
        self
    }

    pub fn build(self) -> Card {
        self.inner
    }
}

pub fn make_sub_task(id: &str, title: &str) -> SubTask {
    SubTask {
        id: id.to_string(),
        title: title.to_string(),
        completed: false,
        created_time: 1_700_000_000_000,
    }
}

#[cfg(test)]
mod card_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_parse_the_canonical_card() {
        let card = CardBuilder::default().build();
        assert_eq!(card, Card::new("c1", "Buy milk", "", 1_700_000_000_000));
    }

    #[rstest]
    fn it_should_override_fields() {
        let card = CardBuilder::new()
            .id("c2")
            .content("# notes")
            .created_time(5)
            .session("s1")
            .sub_task(make_sub_task("st-1", "first"))
            .build();
        assert_eq!(card.id, "c2");
        assert_eq!(card.content, "# notes");
        assert_eq!(card.created_time, 5);
        assert_eq!(card.session_ids, vec!["s1"]);
        assert_eq!(card.sub_tasks.map(|tasks| tasks.len()), Some(1));
    }
}
