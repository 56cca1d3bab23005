// HTTP inbound adapter for card commands.
//
// Every command answers once the projection has applied it. Persistence keeps
// running in the background, so success is 202 (201 where an id is handed out).

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::modules::cards::adapters::outbound::persistence_queue::PersistenceTask;
use crate::modules::cards::use_cases::manage_cards::handler::ApplicationError;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct AddCardBody {
    pub list_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize)]
pub struct AddCardResponse {
    pub card_id: String,
}

#[derive(Deserialize)]
pub struct TitleBody {
    pub title: String,
}

#[derive(Deserialize)]
pub struct ContentBody {
    pub content: String,
}

#[derive(Deserialize)]
pub struct HoursBody {
    pub hours: f64,
}

#[derive(Deserialize)]
pub struct SessionBody {
    pub session_id: String,
    pub hours: f64,
}

#[derive(Deserialize)]
pub struct DeleteCardParams {
    pub list_id: String,
}

#[derive(Serialize)]
pub struct AddSubTaskResponse {
    pub sub_task_id: String,
}

fn error_response(error: ApplicationError) -> Response {
    match error {
        ApplicationError::Domain(reason) => {
            (StatusCode::UNPROCESSABLE_ENTITY, reason).into_response()
        }
        other => {
            tracing::error!(error = %other, "card command failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn accepted(result: Result<PersistenceTask, ApplicationError>) -> Response {
    match result {
        Ok(_task) => StatusCode::ACCEPTED.into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn add_card(
    State(state): State<AppState>,
    body: Result<Json<AddCardBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let card_id = state.handler.new_card_id();
    match state
        .handler
        .add_card(&card_id, &body.list_id, &body.title, &body.content)
        .await
    {
        Ok(_task) => (StatusCode::CREATED, Json(AddCardResponse { card_id })).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn rename_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Result<Json<TitleBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    accepted(state.handler.rename_card(&card_id, &body.title).await)
}

pub async fn set_content(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Result<Json<ContentBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    accepted(state.handler.set_content(&card_id, &body.content).await)
}

pub async fn set_estimated_time(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Result<Json<HoursBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    accepted(state.handler.set_estimated_time(&card_id, body.hours).await)
}

pub async fn set_actual_time(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Result<Json<HoursBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    accepted(state.handler.set_actual_time(&card_id, body.hours).await)
}

pub async fn add_actual_time(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Result<Json<HoursBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    accepted(state.handler.add_actual_time(&card_id, body.hours).await)
}

/// Inbound side of the timer: a finished session.
pub async fn record_session(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Result<Json<SessionBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    accepted(
        state
            .handler
            .on_timer_finished(&card_id, &body.session_id, body.hours)
            .await,
    )
}

pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Query(params): Query<DeleteCardParams>,
) -> impl IntoResponse {
    accepted(state.handler.delete_card(&card_id, &params.list_id).await)
}

pub async fn add_sub_task(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Result<Json<TitleBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    match state.handler.add_sub_task(&card_id, &body.title).await {
        Ok((sub_task_id, _task)) => {
            (StatusCode::CREATED, Json(AddSubTaskResponse { sub_task_id })).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub async fn update_sub_task(
    State(state): State<AppState>,
    Path((card_id, sub_task_id)): Path<(String, String)>,
    body: Result<Json<TitleBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    accepted(
        state
            .handler
            .update_sub_task(&card_id, &sub_task_id, &body.title)
            .await,
    )
}

pub async fn toggle_sub_task(
    State(state): State<AppState>,
    Path((card_id, sub_task_id)): Path<(String, String)>,
) -> impl IntoResponse {
    accepted(state.handler.toggle_sub_task(&card_id, &sub_task_id).await)
}

pub async fn delete_sub_task(
    State(state): State<AppState>,
    Path((card_id, sub_task_id)): Path<(String, String)>,
) -> impl IntoResponse {
    accepted(state.handler.delete_sub_task(&card_id, &sub_task_id).await)
}
