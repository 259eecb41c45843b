//! en-US number and currency rendering for results.

pub const UNREACHABLE: &str = "unreachable";

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render_fixed(value: f64, decimals: usize, trim_zeros: bool) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (fixed.as_str(), ""),
    };
    let frac_part = if trim_zeros {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };
    let mut out = group_thousands(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn is_negative(rendered: &str, value: f64) -> bool {
    value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0')
}

/// `1234567.891` renders as `1,234,567.891`; at most three fraction digits.
pub fn format_number_with_commas(value: f64) -> String {
    if !value.is_finite() {
        return UNREACHABLE.to_string();
    }
    let body = render_fixed(value, 3, true);
    if is_negative(&body, value) {
        format!("-{body}")
    } else {
        body
    }
}

/// `1234.5` with two decimals renders as `$1,234.50`.
pub fn format_currency(amount: f64, decimals: usize) -> String {
    if !amount.is_finite() {
        return UNREACHABLE.to_string();
    }
    let body = render_fixed(amount, decimals, false);
    if is_negative(&body, amount) {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return UNREACHABLE.to_string();
    }
    format!("{}%", render_fixed(value, 2, true))
}
