//! Inbound payload types for a pincode verification request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A postal code as it arrives from the onboarding form.
///
/// Forms send the code either as a JSON number or as a string. Anything else
/// (floats, booleans, objects) is kept as-is so validation can reject it
/// instead of the payload failing to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PincodeInput {
    Number(i64),
    Text(String),
    Other(Value),
}

impl fmt::Display for PincodeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PincodeInput::Number(n) => write!(f, "{}", n),
            PincodeInput::Text(s) => write!(f, "{}", s),
            PincodeInput::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for PincodeInput {
    fn from(value: i64) -> Self {
        PincodeInput::Number(value)
    }
}

impl From<&str> for PincodeInput {
    fn from(value: &str) -> Self {
        PincodeInput::Text(value.to_string())
    }
}

impl From<String> for PincodeInput {
    fn from(value: String) -> Self {
        PincodeInput::Text(value)
    }
}

/// Free-text address lines that ride along with the pincode.
///
/// A line that is not a string is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLines {
    #[serde(default, deserialize_with = "text_or_absent")]
    pub address_line_1: Option<String>,
    #[serde(default, deserialize_with = "text_or_absent")]
    pub address_line_2: Option<String>,
    #[serde(default, deserialize_with = "text_or_absent")]
    pub address_line_3: Option<String>,
    #[serde(default, deserialize_with = "text_or_absent")]
    pub landmark: Option<String>,
}

fn text_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// The subset of the onboarding payload this verification step reads.
///
/// Unknown form fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub pincode: Option<PincodeInput>,

    #[serde(flatten)]
    pub address: AddressLines,
}

impl VerificationRequest {
    pub fn new(pincode: impl Into<PincodeInput>) -> Self {
        Self {
            pincode: Some(pincode.into()),
            address: AddressLines::default(),
        }
    }

    pub fn with_address(mut self, address: AddressLines) -> Self {
        self.address = address;
        self
    }
}

/// Host-supplied context for one verification call.
///
/// Only used to tag log output; verification never reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationContext {
    #[serde(default)]
    pub request_id: Option<String>,
}
