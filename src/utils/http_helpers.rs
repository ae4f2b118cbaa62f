use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// The fixed body of the session error signal. Raised whenever a protected
/// operation runs without a valid authenticated session.
pub const UNAUTHORISED_MESSAGE: &str = "Unauthorised";

/// A general purpose HTTP error type that can be converted into a response.
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    /// The session error signal: fixed message, fixed 401 status.
    pub fn unauthorised() -> Self {
        HTTPError::new(StatusCode::UNAUTHORIZED, UNAUTHORISED_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message }).to_string();
        Response::builder()
            .status(self.status)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }
}
