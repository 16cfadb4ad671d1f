//! Schema-checked JSON body extractor.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use tasknest_core::validation::Schema;

use crate::error::ApiError;

/// A request body type with a declarative schema.
pub trait RequestSchema {
    fn schema() -> Schema;
}

/// JSON body that passed its [`RequestSchema`] before being deserialized.
///
/// Unreadable JSON is a `BadRequest`; schema violations are a `Validation`
/// error listing every violated rule.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + RequestSchema + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        T::schema().validate(&body)?;

        let value = serde_json::from_value(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
        Ok(Self(value))
    }
}
