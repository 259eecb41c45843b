//! Coercion of user-typed text into the numbers the calculator expects.

pub mod normalize;

use std::convert::Infallible;

/// Parses an amount such as `"100,000"`, `"$99"` or `"5%"`. Anything that
/// does not parse to a finite number becomes `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let sanitized = raw
        .trim()
        .trim_start_matches('$')
        .replace([',', '_', '%'], "");
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return 0.0;
    }
    match sanitized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parses a user count. Negative input becomes zero, fractions round up.
pub fn parse_count(raw: &str) -> u64 {
    let value = parse_amount(raw);
    if value <= 0.0 {
        return 0;
    }
    value.ceil() as u64
}

/// Clap value parser for amount arguments.
pub fn amount_arg(raw: &str) -> Result<f64, Infallible> {
    Ok(parse_amount(raw))
}

/// Clap value parser for user-count arguments.
pub fn count_arg(raw: &str) -> Result<u64, Infallible> {
    Ok(parse_count(raw))
}
