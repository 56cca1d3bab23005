// Event payloads: strictly additive time tracking.

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ActualTimeAddedV1 {
    pub card_id: String,
    pub hours: f64,
}

/// A completed timer session: appended to the session log and added to `actual`
/// in the same transition.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct SessionRecordedV1 {
    pub card_id: String,
    pub session_id: String,
    pub hours: f64,
}
