use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use cheers_types::api::{CreateSprintRequest, SprintList, StatusMessage, UpdateSprintRequest};
use cheers_types::models::Sprint;

use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::state::{AppState, with_db};

pub async fn create_sprint(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateSprintRequest>,
) -> ApiResult<impl IntoResponse> {
    let sprint = with_db(&state, move |db| {
        db.insert_sprint(&req.sprint_code, &req.sprint_title)
    })
    .await
    .map_err(|e| ApiError::internal("Internal Server Error while creating a new sprint", e))?;

    info!("Created sprint {}", sprint.sprint_code);
    Ok((StatusCode::CREATED, Json(sprint)))
}

pub async fn get_all_sprints(State(state): State<AppState>) -> ApiResult<Json<SprintList>> {
    let sprints = with_db(&state, |db| db.get_all_sprints())
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while retrieving sprints", e))?;

    Ok(Json(SprintList { sprints }))
}

pub async fn get_sprint_by_code(
    State(state): State<AppState>,
    Path(sprint_code): Path<String>,
) -> ApiResult<Json<Sprint>> {
    let sprint = with_db(&state, move |db| db.get_sprint_by_code(&sprint_code))
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while retrieving the sprint", e))?
        .ok_or_else(|| ApiError::not_found("Sprint not found"))?;

    Ok(Json(sprint))
}

/// PATCH /sprints/{sprint_code} — retitle a sprint, optionally moving it to a new code.
pub async fn update_sprint(
    State(state): State<AppState>,
    Path(sprint_code): Path<String>,
    ValidJson(req): ValidJson<UpdateSprintRequest>,
) -> ApiResult<Json<Sprint>> {
    let updated = Sprint {
        sprint_code: req.sprint_code.unwrap_or_else(|| sprint_code.clone()),
        sprint_title: req.sprint_title,
    };

    let row = updated.clone();
    let matched = with_db(&state, move |db| {
        db.update_sprint(&sprint_code, &row.sprint_code, &row.sprint_title)
    })
    .await
    .map_err(|e| ApiError::internal("Internal Server Error while updating the sprint", e))?;

    if !matched {
        return Err(ApiError::not_found("Sprint not found"));
    }

    Ok(Json(updated))
}

pub async fn delete_all_sprints(State(state): State<AppState>) -> ApiResult<Json<StatusMessage>> {
    let deleted = with_db(&state, |db| db.delete_all_sprints())
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while deleting sprints", e))?;

    if !deleted {
        return Err(ApiError::not_found("No sprints found to delete"));
    }

    Ok(Json(StatusMessage::new("All sprints deleted successfully")))
}

pub async fn delete_sprint_by_code(
    State(state): State<AppState>,
    Path(sprint_code): Path<String>,
) -> ApiResult<Json<StatusMessage>> {
    let code = sprint_code.clone();
    let deleted = with_db(&state, move |db| db.delete_sprint_by_code(&code))
        .await
        .map_err(|e| {
            ApiError::internal(
                format!("Internal Server Error while deleting sprint with code {}", sprint_code),
                e,
            )
        })?;

    if !deleted {
        return Err(ApiError::not_found(format!(
            "Sprint with code {} not found",
            sprint_code
        )));
    }

    Ok(Json(StatusMessage::new(format!(
        "Sprint with code {} deleted successfully",
        sprint_code
    ))))
}
