use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{CongratulatoryMessage, Sprint, Template};

/// Required text fields must hold something other than whitespace.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

// -- Messages --

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[validate(custom(function = "not_blank"))]
    pub sprint_code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<CongratulatoryMessage>,
}

// -- Sprints --

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSprintRequest {
    #[validate(custom(function = "not_blank"))]
    pub sprint_code: String,
    #[validate(custom(function = "not_blank"))]
    pub sprint_title: String,
}

/// PATCH body. An absent `sprintCode` keeps the sprint's current code.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSprintRequest {
    #[validate(custom(function = "not_blank"))]
    pub sprint_title: String,
    #[validate(custom(function = "not_blank"))]
    pub sprint_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SprintList {
    pub sprints: Vec<Sprint>,
}

// -- Templates --

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    pub id: Option<i64>,
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTemplateRequest {
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateList {
    pub templates: Vec<Template>,
}
