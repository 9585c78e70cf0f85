use crate::model::Quantity;
use crate::scanner::TokenKind;

/// Quantity and unit resolved from the text of an amount group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amount {
    pub quantity: Quantity,
    pub unit: Option<String>,
}

/// Resolve the text between `{` and `}`
///
/// Blank text means no quantity. Otherwise the first `%` splits the
/// amount from the unit. An amount that is entirely a number (integer,
/// decimal, fraction or whole number plus fraction) becomes `Numeric`;
/// anything else, an empty amount included, is kept as `Literal`.
pub fn resolve_amount(raw: &str) -> Amount {
    if raw.trim().is_empty() {
        return Amount::default();
    }
    let (amount, unit) = match raw.split_once('%') {
        Some((amount, unit)) => (amount.trim(), Some(unit.trim())),
        None => (raw.trim(), None),
    };

    let quantity = match parse_number(amount) {
        Some((value, _)) => Quantity::Numeric(value),
        None => Quantity::Literal(amount.to_string()),
    };
    let unit = unit.filter(|u| !u.is_empty()).map(str::to_string);

    Amount { quantity, unit }
}

/// Parse the whole of `text` as a number, reporting which form it took
///
/// Returns `None` unless every character belongs to the number.
pub fn parse_number(text: &str) -> Option<(f64, TokenKind)> {
    let text = text.trim();

    let (value, kind) = if let Some((whole, fraction)) = text.split_once([' ', '\t']) {
        let whole = parse_integer(whole)?;
        let fraction = parse_fraction(fraction.trim_start())?;
        (whole + fraction, TokenKind::WholeFractional)
    } else if text.contains('/') {
        (parse_fraction(text)?, TokenKind::Fractional)
    } else if text.contains('.') {
        (parse_decimal(text)?, TokenKind::Decimal)
    } else {
        (parse_integer(text)?, TokenKind::Integer)
    };

    value.is_finite().then_some((value, kind))
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_integer(text: &str) -> Option<f64> {
    if !all_digits(text) {
        return None;
    }
    text.parse().ok()
}

fn parse_decimal(text: &str) -> Option<f64> {
    let (whole, fraction) = text.split_once('.')?;
    if !(whole.is_empty() || all_digits(whole)) || !all_digits(fraction) {
        return None;
    }
    let whole = if whole.is_empty() { "0" } else { whole };
    format!("{}.{}", whole, fraction).parse().ok()
}

fn parse_fraction(text: &str) -> Option<f64> {
    let (numerator, denominator) = text.split_once('/')?;
    let numerator = parse_integer(numerator)?;
    let denominator = parse_integer(denominator)?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
