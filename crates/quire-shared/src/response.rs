//! Error response body (RFC 7807 Problem Details, plus field errors).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to message mapping returned with validation failures.
pub type FieldErrors = BTreeMap<String, String>;

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

    /// Per-field messages for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            errors: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn method_not_allowed(detail: impl Into<String>) -> Self {
        Self::new(405, "Method Not Allowed").with_detail(detail)
    }

    pub fn validation(summary: impl Into<String>, errors: FieldErrors) -> Self {
        Self::new(422, "Validation Failed")
            .with_detail(summary)
            .with_errors(errors)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_shape() {
        let mut errors = FieldErrors::new();
        errors.insert("title".to_string(), "The title field is required.".to_string());

        let body = serde_json::to_value(ErrorResponse::validation("The title field is required.", errors))
            .unwrap();

        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["status"], 422);
        assert_eq!(body["errors"]["title"], "The title field is required.");
    }

    #[test]
    fn test_optional_members_omitted() {
        let body = serde_json::to_value(ErrorResponse::unauthorized()).unwrap();
        assert!(body.get("detail").is_none());
        assert!(body.get("errors").is_none());
    }
}
