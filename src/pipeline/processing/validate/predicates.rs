//! Field-level validity checks.
//!
//! Every predicate is total over `&str`: malformed, empty or non-ASCII input
//! yields `false`, never a panic or an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::NULL_MARKERS;

/// UK phone numbers: `+44`/`0044`/`011 44` or a trunk `0`, then 9-10 digits
/// in one of the usual groupings, then an optional `x`/`ext`/`#` extension.
static UK_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:(?:\(?(?:0(?:0|11)\)?[\s-]?\(?|\+)44\)?[\s-]?(?:\(?0\)?[\s-]?)?)|(?:\(?0))",
        r"(?:(?:[0-9]{5}\)?[\s-]?[0-9]{4,5})",
        r"|(?:[0-9]{4}\)?[\s-]?(?:[0-9]{5}|[0-9]{3}[\s-]?[0-9]{3}))",
        r"|(?:[0-9]{3}\)?[\s-]?[0-9]{3}[\s-]?[0-9]{3,4})",
        r"|(?:[0-9]{2}\)?[\s-]?[0-9]{4}[\s-]?[0-9]{4}))",
        r"(?:[\s-]?(?:x|ext\.?|#)[0-9]{3,4})?$",
    ))
    .expect("UK phone pattern is valid")
});

const UUID_GROUP_LENGTHS: [usize; 5] = [8, 4, 4, 4, 12];

/// Sentinel strings that survive typed-null detection ("NULL", "n/a", ...)
pub fn is_null_marker(value: &str) -> bool {
    let lowered = value.to_lowercase();
    NULL_MARKERS.contains(&lowered.as_str())
}

/// Letters, hyphens and spaces only, after folding accents to base Latin letters
pub fn is_valid_name(name: &str) -> bool {
    deunicode::deunicode(name)
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == '-' || c == ' ')
}

pub fn is_valid_phone(phone: &str) -> bool {
    UK_PHONE.is_match(phone)
}

/// Payment card numbers are positive integers with 8 to 19 digits
pub fn is_valid_card_number(card_number: &str) -> bool {
    is_positive_digit_string(card_number) && (8..=19).contains(&card_number.len())
}

/// European article numbers: exactly 13 digits
pub fn is_valid_ean(ean: &str) -> bool {
    is_positive_digit_string(ean) && ean.len() == 13
}

pub fn is_valid_uuid(uuid: &str) -> bool {
    let groups: Vec<&str> = uuid.split('-').collect();
    if groups.len() != UUID_GROUP_LENGTHS.len() {
        return false;
    }
    groups
        .iter()
        .zip(UUID_GROUP_LENGTHS)
        .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Store codes look like `CH-99475026` (2-3 letters, dash, 8 alphanumerics)
pub fn is_valid_store_code(store_code: &str) -> bool {
    match store_code.split_once('-') {
        Some((prefix, suffix)) => {
            matches!(prefix.len(), 2 | 3)
                && is_alphabetical(prefix)
                && suffix.len() == 8
                && suffix.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

/// Product codes look like `U3-5148457q` (2 alphanumerics, dash, 8 alphanumerics)
pub fn is_valid_product_code(product_code: &str) -> bool {
    match product_code.split_once('-') {
        Some((prefix, suffix)) => {
            prefix.len() == 2
                && prefix.chars().all(|c| c.is_ascii_alphanumeric())
                && suffix.len() == 8
                && suffix.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

pub fn is_valid_latitude(latitude: &str) -> bool {
    parse_float(latitude).is_some_and(|v| (-90.0..=90.0).contains(&v))
}

pub fn is_valid_longitude(longitude: &str) -> bool {
    parse_float(longitude).is_some_and(|v| (-180.0..=180.0).contains(&v))
}

pub fn is_numeric(value: &str) -> bool {
    parse_float(value).is_some()
}

/// Integer literal with an optional sign and no decimal point
pub fn is_integer(value: &str) -> bool {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_alphabetical(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_alphabetic())
}

/// Three-way boolean coercion: `Some(true)` / `Some(false)` for the given
/// tokens (case-insensitive), `None` for anything else.
pub fn parse_flag(value: &str, true_token: &str, false_token: &str) -> Option<bool> {
    let lowered = value.to_lowercase();
    if lowered == true_token.to_lowercase() {
        Some(true)
    } else if lowered == false_token.to_lowercase() {
        Some(false)
    } else {
        None
    }
}

/// Parse a real number, ignoring surrounding whitespace. NaN is rejected.
pub(crate) fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn is_positive_digit_string(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) && value.chars().any(|c| c != '0')
}
