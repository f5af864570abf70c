//! WASM bindings for expense claim extraction.
//!
//! This crate exposes the claim pipeline to browsers and Node.js.

use wasm_bindgen::prelude::*;

use claimx_core::models::config::DEFAULT_SALES_TAX_PERCENTAGE;
use claimx_core::{ClaimConfig, ClaimError, ErrorResponse, ExpenseClaimProcessor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Process email text into a reservation with tax figures.
///
/// `sales_tax_percentage` is read leniently: a missing or unparsable value
/// falls back to the default rate. Failures reject with the serialized
/// `{message, details, statusCode}` error response.
#[wasm_bindgen]
pub fn process_text(
    text: Option<String>,
    sales_tax_percentage: Option<String>,
) -> Result<JsValue, JsValue> {
    let mut config = ClaimConfig::default();
    if let Some(raw) = sales_tax_percentage.as_deref() {
        config.apply_sales_tax_override(raw);
    }

    let processor = ExpenseClaimProcessor::from_config(&config);
    let result = processor.process_optional(text.as_deref());
    to_js(result)
}

/// Check whether a markup fragment is well-formed.
#[wasm_bindgen]
pub fn is_well_formed(markup: &str) -> bool {
    claimx_core::extract::is_well_formed(markup)
}

/// Claim processor class for browser use.
#[wasm_bindgen]
pub struct ClaimProcessor {
    processor: ExpenseClaimProcessor,
}

#[wasm_bindgen]
impl ClaimProcessor {
    /// Create a processor using the default sales tax percentage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            processor: ExpenseClaimProcessor::new(),
        }
    }

    /// Set the sales tax percentage. Returns false and keeps the current
    /// rate when `rate` is not a number.
    #[wasm_bindgen]
    pub fn set_sales_tax_percentage(&mut self, rate: &str) -> bool {
        match claimx_core::models::config::parse_percentage(rate) {
            Some(rate) => {
                self.processor = ExpenseClaimProcessor::new().with_sales_tax_percentage(rate);
                true
            }
            None => false,
        }
    }

    /// Current sales tax percentage as text.
    #[wasm_bindgen]
    pub fn sales_tax_percentage(&self) -> String {
        self.processor.sales_tax_percentage().to_string()
    }

    /// Process email text.
    #[wasm_bindgen]
    pub fn process(&self, text: Option<String>) -> Result<JsValue, JsValue> {
        to_js(self.processor.process_optional(text.as_deref()))
    }

    /// Reset to the default sales tax percentage.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.processor =
            ExpenseClaimProcessor::new().with_sales_tax_percentage(DEFAULT_SALES_TAX_PERCENTAGE);
    }
}

impl Default for ClaimProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: serde::Serialize>(result: Result<T, ClaimError>) -> Result<JsValue, JsValue> {
    match result {
        Ok(value) => {
            serde_wasm_bindgen::to_value(&value).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        Err(e) => {
            let response = ErrorResponse::from(&e);
            Err(serde_wasm_bindgen::to_value(&response)
                .unwrap_or_else(|_| JsValue::from_str(&response.message)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_is_well_formed() {
        assert!(is_well_formed("<expense><total>100</total></expense>"));
        assert!(!is_well_formed("<expense><total>100</expense>"));
    }

    #[wasm_bindgen_test]
    fn test_set_sales_tax_percentage() {
        let mut processor = ClaimProcessor::new();
        assert_eq!(processor.sales_tax_percentage(), "10");

        assert!(processor.set_sales_tax_percentage("12.5"));
        assert_eq!(processor.sales_tax_percentage(), "12.5");

        assert!(!processor.set_sales_tax_percentage("twelve"));
        assert_eq!(processor.sales_tax_percentage(), "12.5");

        processor.reset();
        assert_eq!(processor.sales_tax_percentage(), "10");
    }

    #[wasm_bindgen_test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
