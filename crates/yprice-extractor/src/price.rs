//! Reading year labels and price cells

use crate::error::PriceError;
use yprice_domain::Year;

/// Parse a closing-price cell such as `"1,234(12/30)"` or `"1,234(△56)"`
///
/// Grouping commas are removed and everything from the first opening
/// parenthesis (ASCII or full-width) on is ignored. The result must be a
/// finite, non-negative number.
///
/// # Examples
///
/// ```
/// use yprice_extractor::parse_price;
///
/// assert_eq!(parse_price("1,234(△56)").unwrap(), 1234.0);
/// assert_eq!(parse_price("987.5").unwrap(), 987.5);
/// assert!(parse_price("--").is_err());
/// ```
pub fn parse_price(raw: &str) -> Result<f64, PriceError> {
    let amount = raw.split(['(', '（']).next().unwrap_or_default();
    let cleaned: String = amount.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();

    match cleaned.parse::<f64>() {
        // "-0" parses to negative zero, which would print as "-0.0"
        Ok(value) if value == 0.0 => Ok(0.0),
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(PriceError(cleaned.to_string())),
    }
}

/// Parse a year label such as `"2019年"` into a supported [`Year`]
///
/// Returns `None` when the suffix is missing, the number is malformed, or the
/// year lies outside the supported range.
pub fn parse_year_label(label: &str, suffix: &str) -> Option<Year> {
    let number = label.trim().strip_suffix(suffix)?;
    number.trim().parse::<u16>().ok().and_then(Year::new)
}
