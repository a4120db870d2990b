//! Core data models for pincode verification.

pub mod lookup;
pub mod outcome;
pub mod request;

pub use lookup::LookupResult;
pub use outcome::{OutcomePayload, VerificationOutcome, VerificationStatus};
pub use request::{AddressLines, PincodeInput, VerificationContext, VerificationRequest};
