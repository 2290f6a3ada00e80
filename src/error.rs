// Gateway error types and the status code table
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Dispatch-level failure. Each variant owns exactly one status code and
/// never carries field-level detail other than the joined validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest,

    // 403 Forbidden
    Forbidden,

    // 404 Not Found
    NotFound(Option<String>),

    // 422 Invalid Request (envelope or arguments failed validation)
    InvalidRequest(String),

    // 500 Internal Server Error
    Internal,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message, falling back to the status text
    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(Some(msg)) => msg,
            ApiError::InvalidRequest(msg) if !msg.is_empty() => msg,
            _ => default_error_text(self.status_code()),
        }
    }

    /// Convert to the `{"error", "code"}` response envelope
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.message(),
            "code": self.status_code().as_u16(),
        })
    }
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError::NotFound(None)
    }

    pub fn method_not_found() -> Self {
        ApiError::NotFound(Some("Method not found".to_string()))
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(message.into())
    }
}

/// Default text shown when a failure carries no message of its own
pub fn default_error_text(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::UNPROCESSABLE_ENTITY => "Invalid Request",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "Unknown Error",
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_messages_fall_back_to_status_text() {
        assert_eq!(ApiError::Forbidden.to_json(), json!({"error": "Forbidden", "code": 403}));
        assert_eq!(ApiError::Internal.to_json(), json!({"error": "Internal Server Error", "code": 500}));
        assert_eq!(ApiError::not_found().message(), "Not Found");
        assert_eq!(ApiError::invalid_request("").message(), "Invalid Request");
    }

    #[test]
    fn explicit_messages_are_kept() {
        assert_eq!(
            ApiError::method_not_found().to_json(),
            json!({"error": "Method not found", "code": 404})
        );
        assert_eq!(
            ApiError::invalid_request("login field not found").to_json(),
            json!({"error": "login field not found", "code": 422})
        );
    }
}
