//! Customer phone numbers as lookup keys.
//!
//! Every phone-based write and lookup goes through [`normalize_phone`] so that
//! `0049 151 2345678`, `+49 151 2345678` and `0151 2345678` all resolve to the
//! same key `+491512345678`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// E.164 allows at most 15 digits including the country code.
const MAX_DIGITS: usize = 15;
/// Shortest plausible international number (country code plus subscriber).
const MIN_DIGITS: usize = 8;

/// A phone number in international `+<digits>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes user input to international form.
///
/// - a leading `00` is the international dialing prefix and becomes `+`
/// - a leading `+` is already international
/// - a single leading `0` marks a national number under `home_country_code`
/// - bare digits are taken to include their country code
///
/// Spaces, dashes, dots, slashes and parentheses are ignored. Anything else, or
/// a digit count outside what an international number can have, is invalid.
pub fn normalize_phone(raw: &str, home_country_code: &str) -> BookingResult<PhoneNumber> {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '/' | '(' | ')' | '\t'))
        .collect();

    let digits = if let Some(rest) = compact.strip_prefix('+') {
        rest.to_string()
    } else if let Some(rest) = compact.strip_prefix("00") {
        rest.to_string()
    } else if let Some(rest) = compact.strip_prefix('0') {
        format!("{}{}", home_country_code, rest)
    } else {
        compact.clone()
    };

    let plausible = digits.chars().all(|c| c.is_ascii_digit())
        && (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len())
        && !digits.starts_with('0');

    if !plausible {
        return Err(BookingError::validation(format!(
            "Invalid phone number '{}'",
            raw.trim()
        )));
    }

    Ok(PhoneNumber(format!("+{}", digits)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("+49 151 2345678", "+491512345678")]
    #[case("0049 151 2345678", "+491512345678")]
    #[case("0151 2345678", "+491512345678")]
    #[case("(0151) 234-56-78", "+491512345678")]
    #[case("491512345678", "+491512345678")]
    #[case("+43 660 1234567", "+436601234567")]
    fn equivalent_inputs_share_a_key(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_phone(raw, "49").unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("-")]
    #[case("+49 abc")]
    #[case("12345")]
    #[case("+0049151234567")]
    #[case("+4915123456789012345")]
    fn implausible_inputs_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            normalize_phone(raw, "49"),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let once = normalize_phone("0049 151 2345678", "49").unwrap();
        let twice = normalize_phone(once.as_str(), "49").unwrap();
        assert_eq!(once, twice);
    }
}
