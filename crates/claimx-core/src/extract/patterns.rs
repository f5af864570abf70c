//! Regex patterns for tagged field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Structured expense block, shortest match, across lines
    pub static ref EXPENSE_BLOCK: Regex = Regex::new(
        r"(?s)<expense>.*?</expense>"
    ).unwrap();

    // Inline tags; group 1 is the raw inner text
    pub static ref VENDOR_TAG: Regex = Regex::new(
        r"(?s)<vendor>(.*?)</vendor>"
    ).unwrap();

    pub static ref DESCRIPTION_TAG: Regex = Regex::new(
        r"(?s)<description>(.*?)</description>"
    ).unwrap();

    pub static ref DATE_TAG: Regex = Regex::new(
        r"(?s)<date>(.*?)</date>"
    ).unwrap();

    // "27 April 2022", two-digit day
    pub static ref LONG_DATE: Regex = Regex::new(
        r"^([0-9]{2}) ([A-Za-z]+) ([0-9]{4})$"
    ).unwrap();

    // Plain decimal after thousands separators are removed
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_block_is_lazy() {
        let text = "<expense><total>1</total></expense> and <expense><total>2</total></expense>";
        let blocks: Vec<&str> = EXPENSE_BLOCK.find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(
            blocks,
            vec![
                "<expense><total>1</total></expense>",
                "<expense><total>2</total></expense>"
            ]
        );
    }

    #[test]
    fn test_inline_tag_spans_lines() {
        let caps = DESCRIPTION_TAG
            .captures("<description>team\ndinner</description>")
            .unwrap();
        assert_eq!(&caps[1], "team\ndinner");
    }

    #[test]
    fn test_total_amount() {
        assert!(TOTAL_AMOUNT.is_match("35000"));
        assert!(TOTAL_AMOUNT.is_match("-12.50"));
        assert!(TOTAL_AMOUNT.is_match(".5"));
        assert!(!TOTAL_AMOUNT.is_match("1e3"));
        assert!(!TOTAL_AMOUNT.is_match("1_000"));
        assert!(!TOTAL_AMOUNT.is_match("."));
    }
}
