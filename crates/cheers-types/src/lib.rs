pub mod api;
pub mod models;

/// Title used when a message references a sprint code with no stored sprint.
pub const DEFAULT_SPRINT_TITLE: &str = "Default Sprint Title";

/// Message body used when no templates are stored.
pub const DEFAULT_TEMPLATE_MESSAGE: &str = "Default Template Message";
