use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::cards::use_cases::list_cards::inbound::http as list_http;
use crate::modules::cards::use_cases::manage_cards::inbound::http as manage_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cards", get(list_http::list_cards).post(manage_http::add_card))
        .route(
            "/cards/{card_id}",
            get(list_http::get_card).delete(manage_http::delete_card),
        )
        .route("/cards/{card_id}/title", put(manage_http::rename_card))
        .route("/cards/{card_id}/content", put(manage_http::set_content))
        .route(
            "/cards/{card_id}/estimated-time",
            put(manage_http::set_estimated_time),
        )
        .route(
            "/cards/{card_id}/actual-time",
            put(manage_http::set_actual_time),
        )
        .route(
            "/cards/{card_id}/actual-time/increments",
            post(manage_http::add_actual_time),
        )
        .route("/cards/{card_id}/sessions", post(manage_http::record_session))
        .route("/cards/{card_id}/sub-tasks", post(manage_http::add_sub_task))
        .route(
            "/cards/{card_id}/sub-tasks/{sub_task_id}",
            put(manage_http::update_sub_task).delete(manage_http::delete_sub_task),
        )
        .route(
            "/cards/{card_id}/sub-tasks/{sub_task_id}/toggle",
            post(manage_http::toggle_sub_task),
        )
        .with_state(state)
}
