//! Ugandan phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, `+`, spaces,
    /// dashes, or parentheses.
    #[error("phone number contains invalid characters")]
    InvalidCharacters,
    /// The input does not match any accepted Ugandan shape.
    #[error("phone number must look like +256XXXXXXXXX, 256XXXXXXXXX, 0XXXXXXXXX or XXXXXXXXX")]
    InvalidFormat,
}

/// A Ugandan phone number, normalized to E.164 form (`+256XXXXXXXXX`).
///
/// Accepted input shapes (spaces, dashes, and parentheses are stripped
/// before matching):
///
/// - `+256XXXXXXXXX`
/// - `256XXXXXXXXX`
/// - `0XXXXXXXXX`
/// - bare nine digits `XXXXXXXXX`
///
/// Whatever the input shape, the stored value is always `+256` followed
/// by the nine-digit subscriber number, so normalization is idempotent:
/// parsing an already-normalized number yields the same string.
///
/// ## Examples
///
/// ```
/// use kikuubo_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("0700 123 456").unwrap();
/// assert_eq!(phone.as_str(), "+256700123456");
/// assert_eq!(phone.local_prefix(), "070");
///
/// // Idempotent
/// let again = PhoneNumber::parse(phone.as_str()).unwrap();
/// assert_eq!(again, phone);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Uganda country calling code, without the `+`.
    pub const COUNTRY_CODE: &'static str = "256";

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and common separators, or does not match any accepted
    /// Ugandan shape.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let cleaned: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        if cleaned.is_empty() {
            return Err(PhoneError::Empty);
        }

        let (plus, digits) = match cleaned.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacters);
        }

        let subscriber = if let Some(rest) = digits.strip_prefix(Self::COUNTRY_CODE) {
            rest
        } else if plus {
            // A leading + is only valid together with the country code.
            return Err(PhoneError::InvalidFormat);
        } else if let Some(rest) = digits.strip_prefix('0') {
            rest
        } else {
            digits
        };

        if subscriber.len() != 9 {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(format!("+{}{subscriber}", Self::COUNTRY_CODE)))
    }

    /// Returns the normalized number as a string slice (`+256XXXXXXXXX`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the nine-digit subscriber number without the country code.
    #[must_use]
    pub fn subscriber_number(&self) -> &str {
        self.0.get(4..).unwrap_or("")
    }

    /// Returns the three-digit operator prefix in local form, e.g. `077`.
    ///
    /// This is the prefix mobile money providers key their networks on.
    #[must_use]
    pub fn local_prefix(&self) -> String {
        let head: String = self.subscriber_number().chars().take(2).collect();
        format!("0{head}")
    }

    /// Returns the number in local form, e.g. `0700123456`.
    #[must_use]
    pub fn local_format(&self) -> String {
        format!("0{}", self.subscriber_number())
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
