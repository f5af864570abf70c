//! Core library for expense claim extraction.
//!
//! This crate provides:
//! - Extraction of `<expense>` blocks and inline `<vendor>`, `<description>`
//!   and `<date>` tags from free text such as email bodies
//! - Well-formedness checking of every extracted fragment
//! - A processing pipeline that validates the expense data, defaults
//!   missing cost centres and splits out sales tax
//! - Error classification and response models for callers

pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod tax;

pub use error::{ClaimError, ErrorKind, ExtractionError, Result, TaxError};
pub use extract::{ExpenseBlockParser, ReservationExtractor, TaggedFieldExtractor};
pub use models::{
    ClaimConfig, ErrorResponse, ExtractedReservation, ProcessedExpenseLine, ProcessedReservation,
    RawExpenseFragment,
};
pub use pipeline::{process_text, ExpenseClaimProcessor};
pub use tax::{PercentageTaxCalculator, TaxCalculator};
