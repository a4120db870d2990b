use serde::{Deserialize, Serialize};

/// Address fragment taken from the first post office record for a pincode.
///
/// Fields the upstream leaves out stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub state: Option<String>,
    pub district: Option<String>,
    /// City or town name (upstream calls it "Division")
    pub division: Option<String>,
}
