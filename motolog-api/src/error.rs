//! Error handling for the MotoLog API server.
//!
//! Defines the [`ApiError`] type returned by every route handler and its
//! mapping onto HTTP status codes and the JSON error envelope. Database and
//! auth errors from the shared crate convert into `ApiError` via `From`
//! impls so handlers can use `?` throughout.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use motolog_shared::auth::{jwt::JwtError, password::PasswordError};

/// API error types that map to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),

    /// 400 Bad Request with per-field validation details
    ValidationError(Vec<ValidationErrorDetail>),

    /// 401 Unauthorized
    Unauthorized(String),

    /// 404 Not Found
    NotFound(String),

    /// 409 Conflict
    Conflict(String),

    /// 429 Too Many Requests
    RateLimitExceeded { retry_after: u64, message: String },

    /// 500 Internal Server Error
    InternalError(String),

    /// 503 Service Unavailable
    ServiceUnavailable(String),
}

/// Convenience alias for handler return types.
pub type ApiResult<T> = Result<T, ApiError>;

/// Single field failure inside a validation error response.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// JSON error envelope returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationErrorDetail>>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(details) => {
                write!(f, "Validation failed ({} field errors)", details.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::RateLimitExceeded { message, .. } => {
                write!(f, "Rate limit exceeded: {}", message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Rate limit errors carry a Retry-After header alongside the body
        if let ApiError::RateLimitExceeded {
            retry_after,
            message,
        } = self
        {
            let body = ErrorResponse {
                success: false,
                message,
                errors: None,
            };
            let mut response =
                (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
            return response;
        }

        let (status, message, errors) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::ValidationError(details) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(details),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
            ApiError::RateLimitExceeded { .. } => unreachable!(),
        };

        let body = ErrorResponse {
            success: false,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    let constraint = db_err.constraint().unwrap_or("");
                    if constraint.contains("email") {
                        ApiError::Conflict("Email already registered".to_string())
                    } else if constraint.contains("registration") {
                        ApiError::Conflict(
                            "Vehicle with this registration number already exists".to_string(),
                        )
                    } else {
                        ApiError::Conflict("A record with these details already exists".to_string())
                    }
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    ApiError::BadRequest("Referenced resource does not exist".to_string())
                }
                sqlx::error::ErrorKind::NotNullViolation => {
                    ApiError::BadRequest("A required field is missing".to_string())
                }
                _ => {
                    tracing::error!("Database error: {}", err);
                    ApiError::InternalError("Database operation failed".to_string())
                }
            },
            _ => {
                tracing::error!("Database error: {}", err);
                ApiError::InternalError("Database operation failed".to_string())
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => {
                ApiError::Unauthorized("Invalid token issuer".to_string())
            }
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();
        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Vehicle not found".to_string());
        assert_eq!(err.to_string(), "Not found: Vehicle not found");

        let err = ApiError::Conflict("Email already registered".to_string());
        assert_eq!(err.to_string(), "Conflict: Email already registered");
    }

    #[test]
    fn test_jwt_error_conversion() {
        let err: ApiError = JwtError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(msg) if msg == "Token expired"));

        let err: ApiError = JwtError::ValidationError("bad signature".to_string()).into();
        assert!(matches!(err, ApiError::Unauthorized(msg) if msg == "Invalid token"));
    }

    #[test]
    fn test_sqlx_row_not_found_conversion() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_validation_error_conversion() {
        #[derive(Validate)]
        struct TestInput {
            #[validate(length(min = 2, message = "Make must be between 2 and 50 characters"))]
            make: String,
        }

        let input = TestInput {
            make: "a".to_string(),
        };
        let err: ApiError = input.validate().unwrap_err().into();

        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "make");
                assert_eq!(
                    details[0].message,
                    "Make must be between 2 and 50 characters"
                );
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse {
            success: false,
            message: "Validation failed".to_string(),
            errors: Some(vec![ValidationErrorDetail {
                field: "email".to_string(),
                message: "Please provide a valid email".to_string(),
            }]),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["field"], "email");
    }
}
