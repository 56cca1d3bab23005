// Event payloads: single-field replacements on a card.
//
// `hours` may legitimately be zero; zero is a value, not "unset".

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CardRenamedV1 {
    pub card_id: String,
    pub title: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CardContentSetV1 {
    pub card_id: String,
    pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct EstimatedTimeSetV1 {
    pub card_id: String,
    pub hours: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ActualTimeSetV1 {
    pub card_id: String,
    pub hours: f64,
}
