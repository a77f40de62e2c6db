use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use cheers_types::api::{MessageList, SendMessageRequest, StatusMessage};

use crate::compose::compose;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::state::{AppState, with_db};

/// POST /messages — compose, store and announce a congratulatory message.
pub async fn send_message(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    compose(&state, &req.username, &req.sprint_code)
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", e))?;

    Ok((
        StatusCode::CREATED,
        Json(StatusMessage::new("Congratulatory message sent successfully")),
    ))
}

pub async fn get_all_messages(State(state): State<AppState>) -> ApiResult<Json<MessageList>> {
    let messages = with_db(&state, |db| db.get_all_messages())
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", e))?;

    Ok(Json(MessageList { messages }))
}

pub async fn get_messages_by_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<MessageList>> {
    let messages = with_db(&state, move |db| db.get_messages_by_user(&username))
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", e))?;

    Ok(Json(MessageList { messages }))
}

pub async fn get_messages_by_sprint(
    State(state): State<AppState>,
    Path(sprint_code): Path<String>,
) -> ApiResult<Json<MessageList>> {
    let messages = with_db(&state, move |db| db.get_messages_by_sprint(&sprint_code))
        .await
        .map_err(|e| ApiError::internal("Internal Server Error", e))?;

    Ok(Json(MessageList { messages }))
}
