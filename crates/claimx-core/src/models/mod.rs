//! Data models for reservations, configuration and error responses.

pub mod config;
pub mod reservation;
pub mod response;

pub use config::{ClaimConfig, TaxConfig};
pub use reservation::{
    ExtractedReservation, ProcessedExpenseLine, ProcessedReservation, RawExpenseFragment,
    UNKNOWN_COST_CENTRE,
};
pub use response::ErrorResponse;
