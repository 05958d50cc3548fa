use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors a handler can return. Each variant maps onto one HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required input is missing or malformed. Raised before any database call.
    #[error("{0}")]
    BadRequest(String),

    /// The targeted record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Database failures, constraint violations and anything unexpected.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every failed response.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::BadRequest(message) | AppError::NotFound(message) => ErrorResponse {
                success: false,
                message: Some(message),
                error: None,
            },
            AppError::Other(err) => {
                tracing::error!("Request failed: {:#}", err);
                ErrorResponse {
                    success: false,
                    message: None,
                    error: Some(format!("{:#}", err)),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Body of every successful response carrying data.
#[derive(Serialize, Debug, ToSchema)]
pub struct StdResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> StdResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> StdResponse<Vec<T>> {
    /// Wraps a list and records its length in `count`.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: Some(items),
            message: None,
        }
    }
}

impl<T: Serialize> IntoResponse for StdResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Body of successful responses that only acknowledge an action.
#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_uses_message_field() {
        let response = AppError::BadRequest("Required fields: id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Required fields: id");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn other_errors_expose_the_whole_chain() {
        let err: Result<(), _> = Err(anyhow!("duplicate key value")).context("Failed to create product");
        let response = AppError::from(err.unwrap_err()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to create product: duplicate key value");
    }

    #[tokio::test]
    async fn list_response_counts_items() {
        let body = body_json(StdResponse::list(vec![1, 2, 3]).into_response()).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body.get("message").is_none());
    }
}
