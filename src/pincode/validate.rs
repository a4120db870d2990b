//! Syntactic validation of PIN codes.

use std::fmt;
use thiserror::Error;

use crate::models::PincodeInput;

/// Number of digits in an Indian PIN code
pub const PINCODE_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("pincode is missing")]
    Missing,
    #[error("pincode {0:?} is not six characters long")]
    WrongLength(String),
    #[error("pincode {0:?} contains non-digit characters")]
    NonDigit(String),
    #[error("pincode {0:?} starts with 0")]
    LeadingZero(String),
    #[error("pincode must be a number or a string, got {0}")]
    UnsupportedType(String),
}

/// A PIN code known to be exactly six ASCII digits, the first one non-zero.
///
/// The leading digit is the postal region (1-9), so the text and numeric
/// forms of a validated code always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedPincode {
    code: String,
    number: u32,
}

impl ValidatedPincode {
    /// Validate a raw form value.
    ///
    /// Integers are rendered in decimal first, so negative numbers and numbers
    /// that would need a leading zero are rejected.
    pub fn parse(input: &PincodeInput) -> Result<Self, FormatError> {
        match input {
            PincodeInput::Number(n) => Self::parse_str(&n.to_string()),
            PincodeInput::Text(s) => Self::parse_str(s),
            PincodeInput::Other(v) => Err(FormatError::UnsupportedType(v.to_string())),
        }
    }

    pub fn parse_str(raw: &str) -> Result<Self, FormatError> {
        // chars, not bytes: "११०००१" is six characters but not ASCII digits
        if raw.chars().count() != PINCODE_LENGTH {
            return Err(FormatError::WrongLength(raw.to_string()));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::NonDigit(raw.to_string()));
        }
        if raw.starts_with('0') {
            return Err(FormatError::LeadingZero(raw.to_string()));
        }
        let number = raw
            .parse::<u32>()
            .map_err(|_| FormatError::NonDigit(raw.to_string()))?;

        Ok(Self {
            code: raw.to_string(),
            number,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Numeric form of the code
    pub fn as_number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for ValidatedPincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_integer() {
        let code = ValidatedPincode::parse(&PincodeInput::Number(110001)).unwrap();
        assert_eq!(code.as_str(), "110001");
        assert_eq!(code.as_number(), 110001);
    }

    #[test]
    fn test_valid_string() {
        let code = ValidatedPincode::parse(&"560001".into()).unwrap();
        assert_eq!(code.to_string(), "560001");
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            ValidatedPincode::parse(&"11000".into()),
            Err(FormatError::WrongLength("11000".into()))
        );
        assert!(ValidatedPincode::parse(&PincodeInput::Number(1100010)).is_err());
        assert!(ValidatedPincode::parse(&PincodeInput::Number(0)).is_err());
        assert!(ValidatedPincode::parse(&"".into()).is_err());
    }

    #[test]
    fn test_sign_and_whitespace_rejected() {
        assert!(ValidatedPincode::parse(&PincodeInput::Number(-11000)).is_err());
        assert!(ValidatedPincode::parse(&"-11000".into()).is_err());
        assert!(ValidatedPincode::parse(&"+11000".into()).is_err());
        assert!(ValidatedPincode::parse(&" 11000".into()).is_err());
        assert!(ValidatedPincode::parse(&"110001 ".into()).is_err());
        assert!(ValidatedPincode::parse(&"1100.1".into()).is_err());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(matches!(
            ValidatedPincode::parse(&"११०००१".into()),
            Err(FormatError::NonDigit(_))
        ));
        assert!(matches!(
            ValidatedPincode::parse(&"11000a".into()),
            Err(FormatError::NonDigit(_))
        ));
    }

    #[test]
    fn test_leading_zero_rejected() {
        assert_eq!(
            ValidatedPincode::parse(&"010001".into()),
            Err(FormatError::LeadingZero("010001".into()))
        );
        assert!(matches!(
            ValidatedPincode::parse(&"000000".into()),
            Err(FormatError::LeadingZero(_))
        ));
    }

    #[test]
    fn test_number_matches_text() {
        let code = ValidatedPincode::parse(&"999999".into()).unwrap();
        assert_eq!(code.as_number().to_string(), code.as_str());
    }

    #[test]
    fn test_unsupported_types() {
        assert!(matches!(
            ValidatedPincode::parse(&PincodeInput::Other(json!(110001.0))),
            Err(FormatError::UnsupportedType(_))
        ));
        assert!(matches!(
            ValidatedPincode::parse(&PincodeInput::Other(json!(null))),
            Err(FormatError::UnsupportedType(_))
        ));
    }
}
