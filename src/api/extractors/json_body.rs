//! Free-form JSON body extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::errors::AppError;

/// Any JSON document, with malformed bodies answered as `400 BAD_REQUEST`.
///
/// Resource bodies keep unknown fields, so they are decoded by the domain
/// types rather than by a fixed request struct.
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        Ok(JsonBody(value))
    }
}
