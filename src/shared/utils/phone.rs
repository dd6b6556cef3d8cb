use regex::Regex;
use std::sync::OnceLock;

fn digits_of(value: &str) -> String {
    static NON_DIGIT: OnceLock<Regex> = OnceLock::new();
    let re = NON_DIGIT.get_or_init(|| Regex::new(r"\D").expect("static regex"));
    re.replace_all(value, "").into_owned()
}

/// Format a phone number for display as the user types, e.g. `(123) 456-7890`.
/// Input beyond ten digits is truncated.
pub fn format_phone_number(value: &str) -> String {
    let digits = digits_of(value);
    let digits = &digits[..digits.len().min(10)];

    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

/// True for a complete ten-digit North American number whose area code does
/// not start with 0 or 1.
pub fn is_valid_phone_number(value: &str) -> bool {
    let digits = digits_of(value);
    if digits.len() != 10 {
        return false;
    }
    !matches!(digits.as_bytes()[0], b'0' | b'1')
}
