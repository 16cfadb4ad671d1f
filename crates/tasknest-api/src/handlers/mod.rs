//! Route handler functions, one module per resource.

pub mod todos;
pub mod users;

use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of every success response that carries no record.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}
