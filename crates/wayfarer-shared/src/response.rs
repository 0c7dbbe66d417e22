//! Error payload returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// `{ "success": false, "statusCode": 404, "message": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,

    /// The HTTP status code.
    pub status_code: u16,

    /// A human-readable explanation specific to this occurrence.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(409, message)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_shape() {
        let json = serde_json::to_value(ErrorResponse::not_found("Post not found")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "statusCode": 404,
                "message": "Post not found"
            })
        );
    }
}
