//! Text cleanup and price parsing for rendered table cells.
//!
//! Cell text comes straight out of the DOM, so it carries layout whitespace
//! (newlines between nested spans, non-breaking spaces, indentation). Every
//! field goes through [`normalize_whitespace`] before it is validated.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// `$` followed by an amount with optional thousands separators and up to two
/// decimal digits. Matches inside longer text such as `"CA$1,234.50 total"`.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{0,2}))?").expect("valid price regex")
});

/// Collapses every run of whitespace to a single ASCII space and trims both
/// ends.
///
/// Idempotent: `normalize_whitespace(&normalize_whitespace(x)) == normalize_whitespace(x)`.
#[must_use]
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses the first `$`-prefixed amount in `raw`.
///
/// Thousands separators are stripped and the amount is returned with trailing
/// zeros removed (`"$24.90"` parses to `24.9`). Returns `None` when no amount
/// is present or the digits do not form a valid decimal.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let caps = PRICE_RE.captures(raw)?;
    let whole = caps.get(1)?.as_str().replace(',', "");
    let amount = match caps.get(2).map(|m| m.as_str()) {
        Some(frac) if !frac.is_empty() => format!("{whole}.{frac}"),
        _ => whole,
    };
    Decimal::from_str(&amount).ok().map(|d| d.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // normalize_whitespace
    // -----------------------------------------------------------------------

    #[test]
    fn collapses_internal_runs_and_trims() {
        assert_eq!(
            normalize_whitespace("  Feb 22,\n 2026,\t10:09:13   AM "),
            "Feb 22, 2026, 10:09:13 AM"
        );
    }

    #[test]
    fn treats_non_breaking_space_as_whitespace() {
        assert_eq!(normalize_whitespace("Pho\u{a0}\u{a0}House"), "Pho House");
    }

    #[test]
    fn empty_and_blank_inputs_become_empty() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "",
            "plain",
            "  leading",
            "trailing  ",
            "a \n\n b\t\tc",
            "\u{a0}Sushi\u{2003}Bar\r\n",
        ];
        for raw in samples {
            let once = normalize_whitespace(raw);
            assert_eq!(normalize_whitespace(&once), once, "not idempotent for {raw:?}");
        }
    }

    // -----------------------------------------------------------------------
    // parse_price
    // -----------------------------------------------------------------------

    #[test]
    fn parses_dollars_and_cents() {
        assert_eq!(parse_price("$24.99"), Some(Decimal::new(2499, 2)));
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_price("$1,234.5"), Some(Decimal::new(12345, 1)));
    }

    #[test]
    fn whole_dollar_amounts() {
        assert_eq!(parse_price("$0"), Some(Decimal::ZERO));
        assert_eq!(parse_price("$15"), Some(Decimal::new(15, 0)));
    }

    #[test]
    fn rejects_text_without_amount() {
        assert_eq!(parse_price("no price here"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("24.99"), None);
        assert_eq!(parse_price("$"), None);
    }

    #[test]
    fn finds_amount_inside_surrounding_text() {
        assert_eq!(parse_price("CA$18.40 (incl. tax)"), Some(Decimal::new(184, 1)));
    }

    #[test]
    fn trailing_zeros_are_dropped() {
        let price = parse_price("$24.90").unwrap();
        assert_eq!(price.to_string(), "24.9");
        assert_eq!(parse_price("$7.00").unwrap().to_string(), "7");
    }

    #[test]
    fn dangling_decimal_point_is_whole_amount() {
        assert_eq!(parse_price("$12."), Some(Decimal::new(12, 0)));
    }

    #[test]
    fn at_most_two_decimals_are_read() {
        assert_eq!(parse_price("$3.999"), Some(Decimal::new(399, 2)));
    }
}
