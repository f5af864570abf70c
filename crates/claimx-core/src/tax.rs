//! Tax calculation.

use rust_decimal::Decimal;

use crate::error::TaxError;

/// Trait for tax calculators.
pub trait TaxCalculator {
    /// Tax contained in `total_including_tax` at `tax_percentage`.
    fn calculate_tax(
        &self,
        tax_percentage: Decimal,
        total_including_tax: Decimal,
    ) -> Result<Decimal, TaxError>;
}

/// Divides the tax-inclusive total by the percentage figure itself, so a
/// rate of 10 on a total of 100 gives 10.
///
/// Note this is not the usual `total * rate / (100 + rate)` extraction;
/// reports built on this crate expect the figures it produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentageTaxCalculator;

impl TaxCalculator for PercentageTaxCalculator {
    fn calculate_tax(
        &self,
        tax_percentage: Decimal,
        total_including_tax: Decimal,
    ) -> Result<Decimal, TaxError> {
        if tax_percentage.is_zero() {
            return Err(TaxError::DivisionByZero);
        }
        total_including_tax
            .checked_div(tax_percentage)
            .ok_or(TaxError::Overflow)
    }
}
