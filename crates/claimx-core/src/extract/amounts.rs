//! Amount parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::TOTAL_AMOUNT;

/// Parse a total such as `"35,000"` or `" 1,234.50 "`.
///
/// Thousands separators are stripped before parsing. Anything that is not a
/// plain decimal number afterwards yields `None`.
pub fn parse_total(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if !TOTAL_AMOUNT.is_match(cleaned) {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Format an amount with two decimals and comma thousands separators
/// (`35,000.00`).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_total() {
        assert_eq!(parse_total("35,000"), Some(Decimal::from(35000)));
        assert_eq!(parse_total("1,234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_total(" 120 "), Some(Decimal::from(120)));
        assert_eq!(parse_total("-5"), Some(Decimal::from(-5)));
    }

    #[test]
    fn test_parse_total_rejects_garbage() {
        assert_eq!(parse_total(""), None);
        assert_eq!(parse_total(" , "), None);
        assert_eq!(parse_total("$35,000"), None);
        assert_eq!(parse_total("thirty"), None);
        assert_eq!(parse_total("1.2.3"), None);
        assert_eq!(parse_total("1e3"), None);
        assert_eq!(parse_total("1_000"), None);
        assert_eq!(parse_total("0x10"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(35000)), "35,000.00");
        assert_eq!(format_amount(Decimal::from_str("1234567.891").unwrap()), "1,234,567.89");
        assert_eq!(format_amount(Decimal::from_str("-3500.5").unwrap()), "-3,500.50");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }
}
