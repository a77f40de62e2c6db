pub mod compose;
pub mod error;
pub mod extract;
pub mod messages;
pub mod routes;
pub mod sprints;
pub mod state;
pub mod templates;

pub use routes::create_router;
pub use state::{AppState, AppStateInner};
