use axum::response::{IntoResponse, Json, Response};

use crate::handlers::MethodReply;

// The HTTP status always mirrors the `code` inside the envelope
impl IntoResponse for MethodReply {
    fn into_response(self) -> Response {
        (self.code, Json(self.to_json())).into_response()
    }
}
