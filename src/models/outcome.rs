//! Verification outcome returned to the host.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Success,
    Failure,
}

/// Enriched address data attached to a successful outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomePayload {
    /// Name of the outcome field the payload is serialized under
    pub field: &'static str,
    pub values: Map<String, Value>,
}

/// Pass/fail verdict for one verification call.
///
/// Serializes as `{"status", "message"}` plus, on success, the payload under
/// its variant-specific field name. Only the verification handler builds
/// successful outcomes, so a payload always comes from a matched post office.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    pub status: VerificationStatus,
    pub message: String,
    payload: Option<OutcomePayload>,
}

impl VerificationOutcome {
    pub(crate) fn success(
        message: impl Into<String>,
        field: &'static str,
        values: Map<String, Value>,
    ) -> Self {
        Self {
            status: VerificationStatus::Success,
            message: message.into(),
            payload: Some(OutcomePayload { field, values }),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Failure,
            message: message.into(),
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == VerificationStatus::Success
    }

    pub fn payload(&self) -> Option<&OutcomePayload> {
        self.payload.as_ref()
    }

    /// Look up a single payload value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.as_ref().and_then(|p| p.values.get(key))
    }
}

impl Serialize for VerificationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.payload.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("status", &self.status)?;
        map.serialize_entry("message", &self.message)?;
        if let Some(payload) = &self.payload {
            map.serialize_entry(payload.field, &payload.values)?;
        }
        map.end()
    }
}
