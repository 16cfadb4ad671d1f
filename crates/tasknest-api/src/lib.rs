//! Tasknest API crate - axum HTTP server and route handlers.
//!
//! Serves the `/users` account endpoints (signup, login, password and email
//! changes) and the `/todos` CRUD endpoints over injected record stores.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
