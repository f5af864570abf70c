//! Error response returned to callers of the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{ClaimError, ErrorKind};

/// Serialized as `{"message", "details", "statusCode"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Short, fixed message per error kind.
    pub message: String,

    /// The underlying error text.
    pub details: Option<String>,

    /// HTTP status code.
    pub status_code: u16,
}

impl ErrorResponse {
    /// Build a response for an error of the given kind.
    pub fn new(kind: ErrorKind, details: impl Into<String>) -> Self {
        let message = match kind {
            ErrorKind::EmptyInput | ErrorKind::NoUsableExpenseData => "Invalid Arguments.",
            ErrorKind::MalformedFragment => "Invalid XML File format.",
            ErrorKind::Internal => "An unexpected error occurred.",
        };

        Self {
            message: message.to_string(),
            details: Some(details.into()),
            status_code: kind.status_code(),
        }
    }
}

impl From<&ClaimError> for ErrorResponse {
    fn from(error: &ClaimError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, TaxError};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_malformed_response() {
        let error = ClaimError::from(ExtractionError::MalformedFragment {
            tag: "expense".to_string(),
        });
        let response = ErrorResponse::from(&error);

        assert_eq!(response.status_code, 406);
        assert_eq!(response.message, "Invalid XML File format.");
        assert_eq!(
            response.details.as_deref(),
            Some("extraction error: malformed <expense> fragment")
        );
    }

    #[test]
    fn test_bad_request_and_internal() {
        assert_eq!(ErrorResponse::from(&ClaimError::EmptyInput).status_code, 400);
        assert_eq!(
            ErrorResponse::from(&ClaimError::NoUsableExpenseData).message,
            "Invalid Arguments."
        );
        assert_eq!(
            ErrorResponse::from(&ClaimError::from(TaxError::DivisionByZero)).status_code,
            500
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(ErrorResponse::from(&ClaimError::EmptyInput)).unwrap();
        assert_eq!(json["statusCode"], 400);
        assert!(json.get("message").is_some());
        assert!(json.get("details").is_some());
    }
}
