use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::modules::cards::core::state::Card;
use crate::shell::state::AppState;

pub async fn list_cards(State(state): State<AppState>) -> impl IntoResponse {
    match state.queries.list_cards().await {
        Ok(cards) => {
            let cards: Vec<&Card> = cards.iter().map(|card| card.as_ref()).collect();
            Json(cards).into_response()
        }
        Err(error) => {
            tracing::error!(%error, "listing cards failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> impl IntoResponse {
    match state.queries.get_card(&card_id).await {
        Ok(Some(card)) => Json(card.as_ref()).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(error) => {
            tracing::error!(%error, card_id = %card_id, "reading card failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
