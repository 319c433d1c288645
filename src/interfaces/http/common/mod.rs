//! Shared HTTP plumbing: response envelope, error mapping, extractors

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope.
///
/// Every REST endpoint wraps its payload in this shape.
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request completed successfully
    pub success: bool,
    /// Payload. `null` on error
    pub data: Option<T>,
    /// Error description. `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Map a domain error to an HTTP status + enveloped error body.
pub fn error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::InvalidState(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

/// Extract the bearer token from the Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn envelope_success_carries_data() {
        let resp = ApiResponse::success(42);
        assert!(resp.success);
        assert_eq!(resp.data, Some(42));
        assert!(resp.error.is_none());
    }

    #[test]
    fn envelope_error_skips_data() {
        let resp: ApiResponse<i32> = ApiResponse::error("boom");
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("boom"));
    }

    #[test]
    fn bearer_token_parses_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn error_response_maps_statuses() {
        let (status, _) = error_response::<()>(DomainError::Conflict("slot taken".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = error_response::<()>(DomainError::not_found("Slot", "id", 7));
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = error_response::<()>(DomainError::Storage("db down".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
