//! Verification handler: validate, look up, compose.

use serde_json::{json, Map, Value};
use tracing::{debug, info, info_span, Instrument, Span};

use super::VariantConfig;
use crate::models::{LookupResult, VerificationContext, VerificationOutcome, VerificationRequest};
use crate::pincode::{FormatError, PincodeClient, ValidatedPincode};

pub const SUCCESS_MESSAGE: &str = "Pincode verification successful";
/// Shared by every lookup failure, whatever the cause
pub const NOT_FOUND_MESSAGE: &str = "Invalid or non-existent pincode";

/// Verifies pincodes for one form variant.
///
/// Holds no per-call state; share it behind an `Arc` and call it from as many
/// tasks as needed.
pub struct VerificationHandler {
    client: PincodeClient,
    config: VariantConfig,
    span: Span,
}

impl VerificationHandler {
    pub fn new(client: PincodeClient, config: impl Into<VariantConfig>) -> Self {
        let config = config.into();
        let span = info_span!("pincode_verification", variant = config.variant.name());
        Self {
            client,
            config,
            span,
        }
    }

    /// Emit this handler's log events under a host-provided span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    /// Host entry point. The context only tags log output.
    pub async fn verify_handler(
        &self,
        context: &VerificationContext,
        payload: &VerificationRequest,
    ) -> VerificationOutcome {
        let span = info_span!(
            parent: &self.span,
            "verify",
            request_id = context.request_id.as_deref().unwrap_or("-")
        );
        self.run(payload).instrument(span).await
    }

    pub async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        self.run(request).instrument(self.span.clone()).await
    }

    async fn run(&self, request: &VerificationRequest) -> VerificationOutcome {
        let validated = match &request.pincode {
            Some(input) => ValidatedPincode::parse(input),
            None => Err(FormatError::Missing),
        };

        let pincode = match validated {
            Ok(pincode) => pincode,
            Err(e) => {
                debug!("Rejected pincode: {}", e);
                return VerificationOutcome::failure(self.config.format_error_message);
            }
        };

        match self.client.lookup(&pincode).await {
            Ok(result) => {
                info!("Pincode {} verified", pincode);
                self.compose(&pincode, result, request)
            }
            Err(e) => {
                // the client already logged transient failures at error level
                if !e.is_transient() {
                    info!("Pincode {} rejected by lookup", pincode);
                }
                VerificationOutcome::failure(NOT_FOUND_MESSAGE)
            }
        }
    }

    fn compose(
        &self,
        pincode: &ValidatedPincode,
        result: LookupResult,
        request: &VerificationRequest,
    ) -> VerificationOutcome {
        let names = &self.config.field_names;
        let mut values = Map::new();

        values.insert(names.division.to_string(), json!(result.division));
        values.insert(names.state.to_string(), json!(result.state));
        values.insert(names.district.to_string(), json!(result.district));

        if let Some(key) = names.pincode {
            let code = if self.config.pincode_as_number {
                Value::from(pincode.as_number())
            } else {
                Value::from(pincode.as_str())
            };
            values.insert(key.to_string(), code);
        }

        if self.config.accepts_address_lines {
            let address = &request.address;
            values.insert("address_line_1".into(), json!(address.address_line_1));
            values.insert("address_line_2".into(), json!(address.address_line_2));
            values.insert("address_line_3".into(), json!(address.address_line_3));
            values.insert("landmark".into(), json!(address.landmark));
        }

        VerificationOutcome::success(SUCCESS_MESSAGE, names.payload, values)
    }
}
