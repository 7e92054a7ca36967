//! Phone number type.
//!
//! The restaurant currently serves a single Indian city, so the login flow
//! uses one phone-format policy: a ten-digit Indian mobile number, displayed
//! with the fixed `+91` country prefix. The backend stores the bare ten
//! digits.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character other than digits and separators.
    #[error("phone number may only contain digits")]
    InvalidCharacter,
    /// The digit count is wrong.
    #[error("phone number must be exactly {expected} digits (got {got})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digit count found in the input.
        got: usize,
    },
}

/// A ten-digit Indian mobile number.
///
/// Parsing normalizes common input shapes: surrounding whitespace, spaces
/// and dashes between digit groups, and an optional leading `+91` country
/// prefix are all accepted and stripped.
///
/// ## Examples
///
/// ```
/// use beyond_flavours_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+91 98765 43210").unwrap();
/// assert_eq!(phone.as_str(), "9876543210");
/// assert_eq!(phone.to_string(), "+91 9876543210");
///
/// assert!(PhoneNumber::parse("12345").is_err());      // too short
/// assert!(PhoneNumber::parse("98765x3210").is_err()); // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Digits in a national mobile number.
    pub const DIGITS: usize = 10;

    /// Country calling code used for display.
    pub const COUNTRY_CODE: &'static str = "+91";

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains non-digit
    /// characters (after separators are stripped), or does not contain
    /// exactly ten digits.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        let trimmed = trimmed
            .strip_prefix(Self::COUNTRY_CODE)
            .unwrap_or(trimmed);

        let mut digits = String::with_capacity(Self::DIGITS);
        for c in trimmed.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if !matches!(c, ' ' | '-') {
                return Err(PhoneNumberError::InvalidCharacter);
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(PhoneNumberError::WrongLength {
                expected: Self::DIGITS,
                got: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the bare ten digits, the shape the backend stores.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", Self::COUNTRY_CODE, self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_parse_with_country_prefix() {
        let phone = PhoneNumber::parse("+919876543210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_parse_with_separators() {
        let phone = PhoneNumber::parse(" +91 98765-43210 ").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(PhoneNumber::parse(""), Err(PhoneNumberError::Empty)));
        assert!(matches!(
            PhoneNumber::parse("   "),
            Err(PhoneNumberError::Empty)
        ));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            PhoneNumber::parse("12345"),
            Err(PhoneNumberError::WrongLength {
                expected: 10,
                got: 5
            })
        ));
        assert!(matches!(
            PhoneNumber::parse("98765432101"),
            Err(PhoneNumberError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            PhoneNumber::parse("98765x3210"),
            Err(PhoneNumberError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_display_includes_country_code() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        assert_eq!(phone.to_string(), "+91 9876543210");
    }
}
