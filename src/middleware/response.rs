use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that adds the `{ success, data, ... }` envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub status_code: Option<StatusCode>,
    extra: Map<String, Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            status_code: None,
            extra: Map::new(),
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::success(data)
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.extra.insert("message".to_string(), json!(message.into()));
        self
    }

    /// Adds `total`, `pages` and `currentPage` for a paged listing.
    pub fn paginated(mut self, total: i64, page: i64, limit: i64) -> Self {
        let pages = if limit > 0 && total > 0 { (total - 1) / limit + 1 } else { 0 };
        self.extra.insert("total".to_string(), json!(total));
        self.extra.insert("pages".to_string(), json!(pages));
        self.extra.insert("currentPage".to_string(), json!(page));
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A listing; `count` is the number of items returned.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        let mut response = Self::success(items);
        response.extra.insert("count".to_string(), json!(count));
        response
    }
}

impl ApiResponse<()> {
    /// `{ success: true, message }` with no `data`.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            status_code: None,
            extra: Map::new(),
        }
        .message(message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        envelope.extend(self.extra);

        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => {
                    envelope.insert("data".to_string(), value);
                }
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Server error",
                            "error": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (status, Json(Value::Object(envelope))).into_response()
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_includes_count() {
        let response = ApiResponse::list(vec![1, 2, 3]).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert_eq!(body, json!({ "success": true, "count": 3, "data": [1, 2, 3] }));
    }

    #[tokio::test]
    async fn pagination_rounds_pages_up() {
        let body = body_of(ApiResponse::list(vec!["a"]).paginated(21, 3, 10).into_response()).await;
        assert_eq!(body["pages"], 3);
        assert_eq!(body["currentPage"], 3);
        assert_eq!(body["total"], 21);
    }

    #[tokio::test]
    async fn huge_limit_is_a_single_page() {
        let body = body_of(ApiResponse::list(vec!["a", "b"]).paginated(2, 1, i64::MAX).into_response()).await;
        assert_eq!(body["pages"], 1);

        let body = body_of(ApiResponse::<Vec<&str>>::list(vec![]).paginated(0, 1, 10).into_response()).await;
        assert_eq!(body["pages"], 0);
    }

    #[tokio::test]
    async fn message_only_has_no_data() {
        let response = ApiResponse::message_only("Site deleted successfully").into_response();
        let body = body_of(response).await;
        assert_eq!(body, json!({ "success": true, "message": "Site deleted successfully" }));
    }
}
