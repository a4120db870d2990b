//! Pincode verification handlers for the onboarding form.

mod handler;
mod variant;

pub use handler::{VerificationHandler, NOT_FOUND_MESSAGE, SUCCESS_MESSAGE};
pub use variant::{FieldNames, Variant, VariantConfig};
