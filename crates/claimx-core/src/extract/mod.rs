//! Tagged field extraction module.

pub mod amounts;
pub mod dates;
mod expense;
pub mod markup;
pub mod patterns;
mod tagged;

pub use amounts::{format_amount, parse_total};
pub use dates::parse_long_date;
pub use expense::ExpenseBlockParser;
pub use markup::is_well_formed;
pub use tagged::TaggedFieldExtractor;

use crate::error::ExtractionError;
use crate::models::reservation::ExtractedReservation;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for reservation extractors.
pub trait ReservationExtractor {
    /// Extract reservation fields and expense blocks from free text.
    fn extract(&self, text: &str) -> Result<ExtractedReservation>;
}
