//! Expense claim processing: extraction, validation, defaults and tax.

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::error::{ClaimError, Result, TaxError};
use crate::extract::{ReservationExtractor, TaggedFieldExtractor};
use crate::models::config::{ClaimConfig, DEFAULT_SALES_TAX_PERCENTAGE};
use crate::models::reservation::{
    ProcessedExpenseLine, ProcessedReservation, RawExpenseFragment, UNKNOWN_COST_CENTRE,
};
use crate::tax::{PercentageTaxCalculator, TaxCalculator};

/// Turns free text into a [`ProcessedReservation`].
///
/// The processor holds no mutable state; one instance can serve any number
/// of requests, concurrently if its collaborators are `Sync`.
pub struct ExpenseClaimProcessor<E = TaggedFieldExtractor, C = PercentageTaxCalculator> {
    extractor: E,
    calculator: C,
    sales_tax_percentage: Decimal,
}

impl ExpenseClaimProcessor {
    /// Create a processor with the default extractor and calculator.
    pub fn new() -> Self {
        Self::with_components(
            TaggedFieldExtractor::new(),
            PercentageTaxCalculator,
            DEFAULT_SALES_TAX_PERCENTAGE,
        )
    }

    /// Create a processor using the tax rate from `config`.
    pub fn from_config(config: &ClaimConfig) -> Self {
        Self::new().with_sales_tax_percentage(config.sales_tax_percentage())
    }
}

impl Default for ExpenseClaimProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C> ExpenseClaimProcessor<E, C>
where
    E: ReservationExtractor,
    C: TaxCalculator,
{
    /// Create a processor from explicit collaborators.
    pub fn with_components(extractor: E, calculator: C, sales_tax_percentage: Decimal) -> Self {
        Self {
            extractor,
            calculator,
            sales_tax_percentage,
        }
    }

    /// Set the sales tax percentage.
    pub fn with_sales_tax_percentage(mut self, sales_tax_percentage: Decimal) -> Self {
        self.sales_tax_percentage = sales_tax_percentage;
        self
    }

    /// Sales tax percentage applied to every expense line.
    pub fn sales_tax_percentage(&self) -> Decimal {
        self.sales_tax_percentage
    }

    /// Process an optional request body; `None` counts as empty input.
    pub fn process_optional(&self, text: Option<&str>) -> Result<ProcessedReservation> {
        self.process(text.unwrap_or_default())
    }

    /// Extract, validate and compute tax figures for `text`.
    pub fn process(&self, text: &str) -> Result<ProcessedReservation> {
        if text.trim().is_empty() {
            error!("Could not process the request, the text is empty");
            return Err(ClaimError::EmptyInput);
        }

        let reservation = self.extractor.extract(text)?;

        if !reservation.has_usable_expense() {
            error!(
                "Could not extract expense data from the request ({} expense block(s), none with a positive total)",
                reservation.expense_fragments.len()
            );
            return Err(ClaimError::NoUsableExpenseData);
        }

        info!(
            "Successfully extracted {} expense block(s) from the request",
            reservation.expense_fragments.len()
        );

        let expense_lines = reservation
            .expense_fragments
            .iter()
            .map(|fragment| self.process_fragment(fragment))
            .collect::<std::result::Result<Vec<_>, TaxError>>()?;

        let processed = ProcessedReservation {
            vendor: reservation.vendor,
            description: reservation.description,
            date: reservation.date,
            expense_lines,
        };

        info!(
            "Successfully processed the request at {}% sales tax",
            self.sales_tax_percentage
        );

        Ok(processed)
    }

    fn process_fragment(
        &self,
        fragment: &RawExpenseFragment,
    ) -> std::result::Result<ProcessedExpenseLine, TaxError> {
        let tax = self.calculator.calculate_tax(
            self.sales_tax_percentage,
            fragment.total.unwrap_or_default(),
        )?;

        let total_excluding_tax = fragment
            .total
            .map(|total| total.checked_sub(tax).ok_or(TaxError::Overflow))
            .transpose()?;

        let cost_centre = match fragment.cost_centre.as_deref() {
            Some(cost_centre) if !cost_centre.is_empty() => cost_centre.to_string(),
            _ => UNKNOWN_COST_CENTRE.to_string(),
        };

        Ok(ProcessedExpenseLine {
            cost_centre,
            total_including_tax: fragment.total,
            total_excluding_tax,
            tax: Some(tax),
            payment_method: fragment.payment_method.clone(),
        })
    }
}

/// Process `text` with the default components and the rate from `config`.
pub fn process_text(text: &str, config: &ClaimConfig) -> Result<ProcessedReservation> {
    ExpenseClaimProcessor::from_config(config).process(text)
}
