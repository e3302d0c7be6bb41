use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// A message-only response for a request that left the data as it was
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Response to a delete addressed by identifier
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<u64>,
}

impl DeletedResponse {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: id.into(),
            deleted_count: None,
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.deleted_count = Some(count);
        self
    }
}

/// Created response helper for POST endpoints that wrap their payload
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Outcome of a bulk replacement
#[derive(Debug, Serialize)]
pub struct BulkResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub items: Vec<T>,
}

impl<T: Serialize> BulkResponse<T> {
    pub fn new(items: Vec<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: items.len(),
            items,
        }
    }
}

