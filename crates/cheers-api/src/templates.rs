use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use cheers_types::api::{CreateTemplateRequest, TemplateList, UpdateTemplateRequest};
use cheers_types::models::Template;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidJson, ValidPath};
use crate::state::{AppState, with_db};

/// POST /templates — the store assigns an id unless the body carries one.
pub async fn create_template(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateTemplateRequest>,
) -> ApiResult<impl IntoResponse> {
    let template = with_db(&state, move |db| db.insert_template(req.id, &req.message))
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while creating a new template", e))?;

    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn get_all_templates(State(state): State<AppState>) -> ApiResult<Json<TemplateList>> {
    let templates = with_db(&state, |db| db.get_all_templates())
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while retrieving templates", e))?;

    Ok(Json(TemplateList { templates }))
}

pub async fn get_template_by_id(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> ApiResult<Json<Template>> {
    let template = with_db(&state, move |db| db.get_template_by_id(id))
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while retrieving the template", e))?
        .ok_or_else(|| ApiError::not_found("Template not found"))?;

    Ok(Json(template))
}

pub async fn update_template(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(req): ValidJson<UpdateTemplateRequest>,
) -> ApiResult<Json<Template>> {
    let message = req.message.clone();
    let matched = with_db(&state, move |db| db.update_template(id, &message))
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while updating the template", e))?;

    if !matched {
        return Err(ApiError::not_found("Template not found"));
    }

    Ok(Json(Template {
        id,
        message: req.message,
    }))
}

pub async fn delete_template(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> ApiResult<StatusCode> {
    let deleted = with_db(&state, move |db| db.delete_template(id))
        .await
        .map_err(|e| ApiError::internal("Internal Server Error while deleting the template", e))?;

    if !deleted {
        return Err(ApiError::not_found("Template not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
