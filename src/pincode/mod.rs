//! PIN code validation and remote lookup.

mod client;
mod validate;

pub use client::{LookupError, NotFoundReason, PincodeClient, TransientError};
pub use validate::{FormatError, ValidatedPincode, PINCODE_LENGTH};
