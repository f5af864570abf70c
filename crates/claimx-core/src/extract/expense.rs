//! Decoding of `<expense>` blocks.

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::reservation::RawExpenseFragment;

use super::amounts::parse_total;
use super::markup::{parse_document, MarkupElement};
use super::Result;

const COST_CENTRE: &str = "cost_centre";
const TOTAL: &str = "total";
const PAYMENT_METHOD: &str = "payment_method";

/// Reads the leaf fields of one expense block.
pub struct ExpenseBlockParser;

impl ExpenseBlockParser {
    /// Create a new expense block parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a single `<expense>...</expense>` fragment.
    ///
    /// Fails only when the markup is not well-formed; missing or unparsable
    /// fields come back as `None`.
    pub fn parse(&self, markup: &str) -> Result<RawExpenseFragment> {
        let root = parse_document(markup).map_err(|e| {
            debug!("Expense block rejected: {}", e);
            ExtractionError::MalformedFragment {
                tag: "expense".to_string(),
            }
        })?;
        Ok(self.from_element(&root))
    }

    /// Decode an already parsed block.
    pub fn from_element(&self, root: &MarkupElement) -> RawExpenseFragment {
        let field = |name: &str| root.child(name).map(MarkupElement::text);

        RawExpenseFragment {
            cost_centre: field(COST_CENTRE),
            total: field(TOTAL).as_deref().and_then(parse_total),
            payment_method: field(PAYMENT_METHOD),
        }
    }
}

impl Default for ExpenseBlockParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_full_block() {
        let fragment = ExpenseBlockParser::new()
            .parse(
                "<expense><cost_centre>DEV632</cost_centre><total>35,000</total>\
                 <payment_method>personal card</payment_method></expense>",
            )
            .unwrap();

        assert_eq!(
            fragment,
            RawExpenseFragment {
                cost_centre: Some("DEV632".to_string()),
                total: Some(Decimal::from(35000)),
                payment_method: Some("personal card".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_fields_are_none() {
        let fragment = ExpenseBlockParser::new()
            .parse("<expense><total>1024.01</total></expense>")
            .unwrap();

        assert_eq!(fragment.cost_centre, None);
        assert_eq!(fragment.total, Some(Decimal::new(102401, 2)));
        assert_eq!(fragment.payment_method, None);
    }

    #[test]
    fn test_unparsable_total_is_none() {
        let fragment = ExpenseBlockParser::new()
            .parse("<expense><cost_centre>OPS</cost_centre><total>about 300</total></expense>")
            .unwrap();

        assert_eq!(fragment.cost_centre.as_deref(), Some("OPS"));
        assert_eq!(fragment.total, None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let fragment = ExpenseBlockParser::new()
            .parse("<expense><total>10</total><total>20</total></expense>")
            .unwrap();

        assert_eq!(fragment.total, Some(Decimal::from(10)));
    }

    #[test]
    fn test_entities_are_decoded() {
        let fragment = ExpenseBlockParser::new()
            .parse("<expense><payment_method>cash &amp; card</payment_method></expense>")
            .unwrap();

        assert_eq!(fragment.payment_method.as_deref(), Some("cash & card"));
    }

    #[test]
    fn test_malformed_block() {
        let result = ExpenseBlockParser::new()
            .parse("<expense><cost_centre>DEV632<total>35,000</total></expense>");

        assert_eq!(
            result,
            Err(ExtractionError::MalformedFragment {
                tag: "expense".to_string()
            })
        );
    }
}
