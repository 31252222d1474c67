//! # API Error Type
//!
//! Unified error type for the HTTP handlers that sit in front of the
//! coordinator.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Flow in the Order Service                    │
//! │                                                                         │
//! │  Storefront                  Rust Backend                               │
//! │  ──────────                  ────────────                               │
//! │                                                                         │
//! │  POST /orders                                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, LedgerError>                                          │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ─── ValidationError ─── 400 VALIDATION_ERROR ──┐   │  │
//! │  │  Coupon?     ─── CouponRejection ─── 422 BUSINESS_RULE ─────┤   │  │
//! │  │  CAS lost?   ─── Conflict ────────── 409 CONFLICT ──────────┼──►│  │
//! │  │  Missing?    ─── NotFound ────────── 404 NOT_FOUND ─────────┤   │  │
//! │  │  Store?      ─── StoreError ──────── 500 STORAGE_ERROR ─────┘   │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄───── { "code": "BUSINESS_RULE",                                      │
//! │          "message": "coupon already used by this customer" }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use doceria_store::StoreError;

use crate::error::LedgerError;

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 7f3a..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// A business rule rejected the request, e.g. a coupon check (422)
    BusinessRule,

    /// A concurrent update won; resubmit against fresh state (409)
    Conflict,

    /// Storage operation failed (500)
    StorageError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// The HTTP status this code maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::ValidationError => 400,
            ErrorCode::BusinessRule => 422,
            ErrorCode::Conflict => 409,
            ErrorCode::StorageError | ErrorCode::Internal => 500,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// The HTTP status for this error.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

/// Converts coordinator errors to API errors.
impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(e) => ApiError::validation(e.to_string()),
            LedgerError::Rejected(rejection) => {
                ApiError::new(ErrorCode::BusinessRule, rejection.to_string())
            }
            LedgerError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            LedgerError::Conflict { id } => ApiError::new(
                ErrorCode::Conflict,
                format!("Order {} was updated concurrently; retry with fresh state", id),
            ),
            LedgerError::Store(store) => match store {
                StoreError::NotFound { collection, id } => {
                    ApiError::not_found(&collection, &id)
                }
                StoreError::AlreadyExists { collection, id } => ApiError::new(
                    ErrorCode::ValidationError,
                    format!("{} '{}' already exists", collection, id),
                ),
                StoreError::Serialization(e) => {
                    // A document that fails to (de)serialize is a bug in
                    // this service, not a storage fault.
                    tracing::error!("Document serialization failed: {}", e);
                    ApiError::internal("Internal error")
                }
                other => {
                    // Log the actual error but return a generic message
                    tracing::error!("Store operation failed: {}", other);
                    ApiError::new(ErrorCode::StorageError, "Storage operation failed")
                }
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use doceria_core::coupon::CouponRejection;
    use doceria_core::ValidationError;

    #[test]
    fn test_status_mapping() {
        let api: ApiError = LedgerError::not_found("Order", "o1").into();
        assert_eq!(api.code, ErrorCode::NotFound);
        assert_eq!(api.http_status(), 404);

        let api: ApiError =
            LedgerError::Validation(ValidationError::required("items")).into();
        assert_eq!(api.http_status(), 400);

        let api: ApiError = LedgerError::Rejected(CouponRejection::AlreadyRedeemed).into();
        assert_eq!(api.code, ErrorCode::BusinessRule);
        assert_eq!(api.http_status(), 422);
        assert_eq!(api.message, "coupon already used by this customer");

        let api: ApiError = LedgerError::Conflict {
            id: "o1".to_string(),
        }
        .into();
        assert_eq!(api.http_status(), 409);
    }

    #[test]
    fn test_backend_errors_are_not_leaked() {
        let api: ApiError =
            LedgerError::Store(StoreError::Backend("connection reset".to_string())).into();
        assert_eq!(api.code, ErrorCode::StorageError);
        assert_eq!(api.message, "Storage operation failed");
    }

    #[test]
    fn test_serialization_failures_map_to_internal() {
        let bad = serde_json::from_str::<i64>("not json").unwrap_err();
        let api: ApiError = LedgerError::Store(StoreError::Serialization(bad)).into();
        assert_eq!(api.code, ErrorCode::Internal);
        assert_eq!(api.http_status(), 500);
        assert_eq!(api.message, "Internal error");
    }

    #[test]
    fn test_serializes_screaming_snake_case() {
        let api = ApiError::validation("items must not be empty");
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "items must not be empty");
    }
}
