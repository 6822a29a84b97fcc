//! Input filters applied on every keystroke of the lead form.

pub const MIN_QUANTITY: f64 = 0.1;
pub const DEFAULT_QUANTITY: f64 = 1.0;
/// Largest quantity a single line may settle on.
pub const MAX_QUANTITY: f64 = 1000.0;

/// Input with the offending characters removed, and whether any were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    pub value: String,
    pub stripped: bool,
}

fn filter_out(input: &str, reject: impl Fn(char) -> bool) -> Filtered {
    let value: String = input.chars().filter(|c| !reject(*c)).collect();
    let stripped = value.len() != input.len();
    Filtered { value, stripped }
}

/// Names keep letters (diacritics included) and punctuation, never digits.
pub fn strip_digits(input: &str) -> Filtered {
    filter_out(input, |c| c.is_ascii_digit())
}

/// Phone numbers lose every alphabetic character, accented ones too.
pub fn strip_letters(input: &str) -> Filtered {
    filter_out(input, char::is_alphabetic)
}

pub fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')')
}

pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    !phone.is_empty() && phone.chars().all(is_phone_char) && phone.chars().any(|c| c.is_ascii_digit())
}

/// Parses a quantity field. Accepts a decimal comma.
pub fn parse_quantity(text: &str) -> Option<f64> {
    let value: f64 = text.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Value a quantity field settles on when it loses focus.
pub fn normalize_quantity(text: &str) -> f64 {
    match parse_quantity(text) {
        Some(value) if (MIN_QUANTITY..=MAX_QUANTITY).contains(&value) => value,
        _ => DEFAULT_QUANTITY,
    }
}
