use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::state::AppState;
use crate::{messages, sprints, templates};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/messages",
            post(messages::send_message).get(messages::get_all_messages),
        )
        .route("/messages/{username}", get(messages::get_messages_by_user))
        .route(
            "/messages/sprint/{sprint_code}",
            get(messages::get_messages_by_sprint),
        )
        .route(
            "/sprints",
            post(sprints::create_sprint)
                .get(sprints::get_all_sprints)
                .delete(sprints::delete_all_sprints),
        )
        .route(
            "/sprints/{sprint_code}",
            get(sprints::get_sprint_by_code)
                .patch(sprints::update_sprint)
                .delete(sprints::delete_sprint_by_code),
        )
        .route(
            "/templates",
            post(templates::create_template).get(templates::get_all_templates),
        )
        .route(
            "/templates/{id}",
            get(templates::get_template_by_id)
                .patch(templates::update_template)
                .delete(templates::delete_template),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
