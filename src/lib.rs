//! pinverify - Indian PIN code verification for onboarding forms.
//!
//! Validates a pincode, resolves it against the India Post pincode API and
//! returns the city, district and state as a structured outcome.

pub mod config;
pub mod models;
pub mod pincode;
pub mod verify;

pub use models::{VerificationOutcome, VerificationRequest, VerificationStatus};
pub use verify::{Variant, VerificationHandler};
