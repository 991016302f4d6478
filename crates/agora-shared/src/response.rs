//! Standardized API response types (RFC 7807 compliant for errors).

use serde::{Deserialize, Serialize};

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Base of the `type` URIs for the problems this API reports.
pub const PROBLEM_BASE: &str = "/problems";

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    /// Problem with a typed `type` URI, e.g. `/problems/not-found`.
    pub fn problem(status: u16, kind: &str, title: impl Into<String>) -> Self {
        Self {
            error_type: format!("{PROBLEM_BASE}/{kind}"),
            ..Self::new(status, title)
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::problem(400, "bad-request", "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::problem(401, "unauthenticated", "Unauthorized")
    }

    /// The requester's role or ownership does not allow the action.
    pub fn forbidden() -> Self {
        Self::problem(403, "forbidden", "Forbidden")
            .with_detail("Your role does not permit this action.")
    }

    /// Also used for posts the requester is not allowed to see.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::problem(404, "not-found", "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::problem(409, "duplicate", "Conflict").with_detail(detail)
    }

    pub fn validation_failed(detail: impl Into<String>) -> Self {
        Self::problem(422, "validation", "Validation Failed").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}
