//! Per-variant settings for the verification handler.
//!
//! Both variants run the same validate, lookup, compose steps. They differ in
//! the user-facing format error, the payload field names, and whether the
//! form's address lines are echoed back.

use serde::{Deserialize, Serialize};

/// Known handler variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Partner center onboarding: integer pincode, address lines echoed back
    CenterInfo,
    /// Plain address block: string pincode, lookup fields only
    Address,
}

impl Variant {
    pub fn all() -> &'static [Variant] {
        &[Variant::CenterInfo, Variant::Address]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::CenterInfo => "center_info",
            Variant::Address => "address",
        }
    }

    pub fn config(&self) -> VariantConfig {
        match self {
            Variant::CenterInfo => VariantConfig {
                variant: *self,
                field_names: FieldNames {
                    payload: "response",
                    division: "city",
                    district: "region",
                    state: "state",
                    pincode: Some("pincode"),
                },
                accepts_address_lines: true,
                pincode_as_number: true,
                format_error_message: "Pincode must be a 6-digit number",
            },
            Variant::Address => VariantConfig {
                variant: *self,
                field_names: FieldNames {
                    payload: "data",
                    division: "cities",
                    district: "district",
                    state: "state",
                    pincode: None,
                },
                accepts_address_lines: false,
                pincode_as_number: false,
                format_error_message: "Invalid pincode format",
            },
        }
    }
}

/// Output key names. These are part of the host-facing contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Outcome field holding the payload object
    pub payload: &'static str,
    pub division: &'static str,
    pub district: &'static str,
    pub state: &'static str,
    /// Key for the validated pincode, if the variant echoes it
    pub pincode: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantConfig {
    pub variant: Variant,
    pub field_names: FieldNames,
    /// Copy address_line_1..3 and landmark into the payload
    pub accepts_address_lines: bool,
    /// Emit the pincode as a JSON number instead of a string
    pub pincode_as_number: bool,
    pub format_error_message: &'static str,
}

impl From<Variant> for VariantConfig {
    fn from(variant: Variant) -> Self {
        variant.config()
    }
}
