//! Success response envelope shared by all API routes.
//!
//! Every successful response carries `success: true` alongside an optional
//! human readable message and the payload itself. Error responses use the
//! mirror shape in [`crate::error`].

use serde::Serialize;

/// Standard success envelope wrapping a data payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload with no message.
    pub fn new(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data,
        }
    }

    /// Wrap a payload with a confirmation message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Success envelope for operations with no payload, such as deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            success: true,
            message: message.into(),
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    /// Build pagination metadata from a page request and total row count.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Pagination {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_omits_empty_message() {
        let response = ApiResponse::new(42);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_api_response_with_message() {
        let response = ApiResponse::with_message("Created", "payload");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Created");
        assert_eq!(json["data"], "payload");
    }

    #[test]
    fn test_pagination_rounds_up() {
        let pagination = Pagination::new(1, 10, 25);
        assert_eq!(pagination.pages, 3);

        let exact = Pagination::new(2, 10, 30);
        assert_eq!(exact.pages, 3);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.pages, 0);
    }
}
