//! Transport-layer types shared by the market core, the HTTP handlers and the
//! integration tests, so every layer agrees on the JSON shapes.

mod accounts;
mod products;

pub use accounts::{AccountSummary, FollowDto, ProfileDto};
pub use products::{CategoryDto, HashTagDto, ProductDetailDto, ProductDto};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code, e.g. `NOT_FOUND`
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_serializes_with_flags() {
        let body = ApiResponse::ok(vec![1, 2], "Fetched");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["message"], "Fetched");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn error_response_is_never_successful() {
        let body = ErrorResponse::new("Product 3 not found", "NOT_FOUND");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "NOT_FOUND");

        let back: ErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back.error, "Product 3 not found");
    }
}
