//! Extractor for `<expense>` blocks and inline tags embedded in free text.

use regex::Regex;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::reservation::ExtractedReservation;

use super::dates::parse_long_date;
use super::expense::ExpenseBlockParser;
use super::markup::parse_document;
use super::patterns::{DATE_TAG, DESCRIPTION_TAG, EXPENSE_BLOCK, VENDOR_TAG};
use super::{ReservationExtractor, Result};

/// Pulls the expense blocks and the vendor, description and date tags out
/// of a piece of text such as an email body.
///
/// Every matched fragment must be well-formed markup; the first one that is
/// not aborts the extraction with [`ExtractionError::MalformedFragment`].
/// Tags that do not occur at all simply come back as `None`.
pub struct TaggedFieldExtractor {
    block_parser: ExpenseBlockParser,
}

impl TaggedFieldExtractor {
    /// Create an extractor with the default expense block parser.
    pub fn new() -> Self {
        Self {
            block_parser: ExpenseBlockParser::new(),
        }
    }

    fn inline_field(&self, pattern: &Regex, tag: &str, text: &str) -> Result<Option<String>> {
        let Some(caps) = pattern.captures(text) else {
            return Ok(None);
        };

        if let Err(e) = parse_document(&caps[0]) {
            debug!("Inline <{}> tag rejected: {}", tag, e);
            return Err(malformed(tag));
        }

        Ok(Some(caps[1].to_string()))
    }
}

impl Default for TaggedFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationExtractor for TaggedFieldExtractor {
    fn extract(&self, text: &str) -> Result<ExtractedReservation> {
        let mut expense_fragments = Vec::new();

        for block in EXPENSE_BLOCK.find_iter(text) {
            let root = parse_document(block.as_str()).map_err(|e| {
                debug!("Expense block at {}..{} rejected: {}", block.start(), block.end(), e);
                malformed("expense")
            })?;
            expense_fragments.push(self.block_parser.from_element(&root));
        }

        let vendor = self.inline_field(&VENDOR_TAG, "vendor", text)?;
        let description = self.inline_field(&DESCRIPTION_TAG, "description", text)?;
        let date = self
            .inline_field(&DATE_TAG, "date", text)?
            .as_deref()
            .and_then(parse_long_date);

        debug!(
            "Found {} expense block(s), vendor: {}, description: {}, date: {}",
            expense_fragments.len(),
            vendor.is_some(),
            description.is_some(),
            date.is_some()
        );

        Ok(ExtractedReservation {
            vendor,
            description,
            date,
            expense_fragments,
        })
    }
}

fn malformed(tag: &str) -> ExtractionError {
    ExtractionError::MalformedFragment {
        tag: tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const EMAIL: &str = "Hi Patricia,\n\
        Please create an expense claim for the below. Relevant details are marked up as requested...\n\
        <expense><cost_centre>DEV632</cost_centre><total>35,000</total>\
        <payment_method>personal card</payment_method></expense>\n\
        From: William Steele\n\
        Sent: Friday, 16 June 2022 10:32 AM\n\
        To: Maria Washington\n\
        Subject: test\n\
        Hi Maria,\n\
        Please create a reservation for 10 at the <vendor>Seaside Steakhouse</vendor> for our \
        <description>development team’s project end celebration</description> on \
        <date>27 April 2022</date> at 7.30pm.\n\
        Regards,\n\
        William";

    #[test]
    fn test_extract_sample_email() {
        let reservation = TaggedFieldExtractor::new().extract(EMAIL).unwrap();

        assert_eq!(reservation.vendor.as_deref(), Some("Seaside Steakhouse"));
        assert_eq!(
            reservation.description.as_deref(),
            Some("development team’s project end celebration")
        );
        assert_eq!(reservation.date, NaiveDate::from_ymd_opt(2022, 4, 27));
        assert_eq!(reservation.expense_fragments.len(), 1);

        let fragment = &reservation.expense_fragments[0];
        assert_eq!(fragment.cost_centre.as_deref(), Some("DEV632"));
        assert_eq!(fragment.total, Some(Decimal::from(35000)));
        assert_eq!(fragment.payment_method.as_deref(), Some("personal card"));
    }

    #[test]
    fn test_no_tags_at_all() {
        let reservation = TaggedFieldExtractor::new()
            .extract("Nothing structured in here.")
            .unwrap();

        assert_eq!(reservation, ExtractedReservation::default());
    }

    #[test]
    fn test_multiple_blocks_keep_order() {
        let text = "first <expense><total>10</total></expense>\n\
                    second <expense><cost_centre>B</cost_centre><total>20</total></expense>";
        let reservation = TaggedFieldExtractor::new().extract(text).unwrap();

        let totals: Vec<Option<Decimal>> =
            reservation.expense_fragments.iter().map(|f| f.total).collect();
        assert_eq!(totals, vec![Some(Decimal::from(10)), Some(Decimal::from(20))]);
        assert_eq!(reservation.expense_fragments[1].cost_centre.as_deref(), Some("B"));
    }

    #[test]
    fn test_block_spanning_lines() {
        let text = "<expense>\n  <cost_centre>HR1</cost_centre>\n  <total>99.50</total>\n</expense>";
        let reservation = TaggedFieldExtractor::new().extract(text).unwrap();

        assert_eq!(reservation.expense_fragments[0].total, Some(Decimal::new(9950, 2)));
    }

    #[test]
    fn test_unclosed_tag_in_block_fails() {
        let text = "<expense><cost_centre>DEV632<total>35,000</total>\
                    <payment_method>personal card</payment_method></expense> \
                    <vendor>Seaside Steakhouse</vendor>";

        assert_eq!(
            TaggedFieldExtractor::new().extract(text),
            Err(ExtractionError::MalformedFragment {
                tag: "expense".to_string()
            })
        );
    }

    #[test]
    fn test_second_malformed_block_aborts() {
        let text = "<expense><total>10</total></expense> <expense><total>20</expense>";

        assert!(TaggedFieldExtractor::new().extract(text).is_err());
    }

    #[test]
    fn test_malformed_inline_tag_fails() {
        let text = "<expense><total>10</total></expense> <vendor>Fish &chips; Co</vendor>";

        assert_eq!(
            TaggedFieldExtractor::new().extract(text),
            Err(ExtractionError::MalformedFragment {
                tag: "vendor".to_string()
            })
        );
    }

    #[test]
    fn test_inline_tag_with_nested_markup_fails() {
        let text = "<description>dinner <b>for ten</description>";

        assert!(TaggedFieldExtractor::new().extract(text).is_err());
    }

    #[test]
    fn test_inline_value_is_raw() {
        let text = "<vendor>Fish &amp; Chips</vendor>";
        let reservation = TaggedFieldExtractor::new().extract(text).unwrap();

        assert_eq!(reservation.vendor.as_deref(), Some("Fish &amp; Chips"));
    }

    #[test]
    fn test_only_first_inline_tag_is_used() {
        let text = "<vendor>First</vendor> and later <vendor>Second</vendor>";
        let reservation = TaggedFieldExtractor::new().extract(text).unwrap();

        assert_eq!(reservation.vendor.as_deref(), Some("First"));
    }

    #[test]
    fn test_inline_tag_inside_block_is_found() {
        let text = "<expense><vendor>Inside</vendor><total>5</total></expense>";
        let reservation = TaggedFieldExtractor::new().extract(text).unwrap();

        assert_eq!(reservation.vendor.as_deref(), Some("Inside"));
        assert_eq!(reservation.expense_fragments.len(), 1);
    }

    #[test]
    fn test_bad_date_format_is_soft() {
        let text = "<date>Thursday next week</date>";
        let reservation = TaggedFieldExtractor::new().extract(text).unwrap();

        assert_eq!(reservation.date, None);
    }
}
