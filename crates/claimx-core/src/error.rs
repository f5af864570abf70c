//! Error types for the claimx-core library.

use thiserror::Error;

/// Main error type for the claimx library.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// The request text was empty or whitespace only.
    #[error("could not process the request, the text is empty")]
    EmptyInput,

    /// Extraction succeeded but no expense block carried a positive total.
    #[error("could not extract expense data from the request, please verify the request")]
    NoUsableExpenseData,

    /// Tagged field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Tax arithmetic error.
    #[error("tax error: {0}")]
    Tax(#[from] TaxError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while pulling tagged fields out of free text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A tagged region exists but is not well-formed markup.
    #[error("malformed <{tag}> fragment")]
    MalformedFragment { tag: String },
}

/// Errors raised by the tax calculator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxError {
    /// The configured tax percentage is zero.
    #[error("division by zero: sales tax percentage is 0")]
    DivisionByZero,

    /// The result does not fit in a decimal.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Coarse classification of a [`ClaimError`], used by callers to pick a
/// response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    MalformedFragment,
    NoUsableExpenseData,
    Internal,
}

impl ErrorKind {
    /// HTTP status code a web caller should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::EmptyInput | ErrorKind::NoUsableExpenseData => 400,
            ErrorKind::MalformedFragment => 406,
            ErrorKind::Internal => 500,
        }
    }
}

impl ClaimError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::EmptyInput => ErrorKind::EmptyInput,
            ClaimError::NoUsableExpenseData => ErrorKind::NoUsableExpenseData,
            ClaimError::Extraction(ExtractionError::MalformedFragment { .. }) => {
                ErrorKind::MalformedFragment
            }
            ClaimError::Tax(_) | ClaimError::Config(_) | ClaimError::Io(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for the claimx library.
pub type Result<T> = std::result::Result<T, ClaimError>;
