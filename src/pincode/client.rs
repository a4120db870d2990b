//! Pincode lookup against the India Post pincode API.

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use super::ValidatedPincode;
use crate::config::LookupConfig;
use crate::models::LookupResult;

/// Upstream status value for a successful match
const STATUS_SUCCESS: &str = "Success";

/// One entry of the top-level response array
#[derive(Debug, Deserialize)]
struct PincodeEnvelope {
    #[serde(rename = "Status")]
    status: String,
    // null when the upstream finds nothing
    #[serde(rename = "PostOffice", default)]
    post_office: Option<Vec<PostOfficeRecord>>,
}

#[derive(Debug, Deserialize)]
struct PostOfficeRecord {
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "District", default)]
    district: Option<String>,
    #[serde(rename = "Division", default)]
    division: Option<String>,
}

/// Why the upstream had no usable record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Any response status other than 200
    HttpStatus(u16),
    /// The `Status` field was not "Success"
    UpstreamStatus(String),
    /// `PostOffice` was empty or absent
    NoPostOffice,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::HttpStatus(code) => write!(f, "HTTP status {}", code),
            NotFoundReason::UpstreamStatus(status) => write!(f, "upstream status {:?}", status),
            NotFoundReason::NoPostOffice => write!(f, "no post office records"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response array was empty")]
    EmptyEnvelope,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("pincode {pincode} not found: {reason}")]
    NotFound {
        pincode: String,
        reason: NotFoundReason,
    },
    #[error("pincode {pincode} lookup failed: {source}")]
    Transient {
        pincode: String,
        #[source]
        source: TransientError,
    },
}

impl LookupError {
    fn not_found(pincode: &ValidatedPincode, reason: NotFoundReason) -> Self {
        LookupError::NotFound {
            pincode: pincode.to_string(),
            reason,
        }
    }

    fn transient(pincode: &ValidatedPincode, source: impl Into<TransientError>) -> Self {
        LookupError::Transient {
            pincode: pincode.to_string(),
            source: source.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Transient { .. })
    }
}

/// Issues single, unretried lookups to the pincode service
#[derive(Debug, Clone)]
pub struct PincodeClient {
    client: Client,
    base_url: Url,
}

impl PincodeClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid lookup base URL {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Lookup base URL {} cannot carry a path", config.base_url);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// `{base_url}/pincode/{code}`
    pub fn lookup_url(&self, pincode: &ValidatedPincode) -> Url {
        let mut url = self.base_url.clone();
        // new() rejects cannot-be-a-base URLs, so this always applies
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("pincode").push(pincode.as_str());
        }
        url
    }

    /// Fetch the first post office record for a pincode.
    ///
    /// Transient failures are logged here with their full detail; callers only
    /// see that the lookup failed.
    pub async fn lookup(&self, pincode: &ValidatedPincode) -> Result<LookupResult, LookupError> {
        let result = self.fetch(pincode).await;

        match &result {
            Ok(found) => debug!(
                "Pincode {} resolved to {:?}, {:?}, {:?}",
                pincode, found.division, found.district, found.state
            ),
            Err(e @ LookupError::NotFound { .. }) => debug!("{}", e),
            Err(LookupError::Transient { source, .. }) => {
                error!("Exception during pincode lookup for {}: {}", pincode, source)
            }
        }

        result
    }

    async fn fetch(&self, pincode: &ValidatedPincode) -> Result<LookupResult, LookupError> {
        let url = self.lookup_url(pincode);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::transient(pincode, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::not_found(
                pincode,
                NotFoundReason::HttpStatus(status.as_u16()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::transient(pincode, e))?;

        let envelopes: Vec<PincodeEnvelope> =
            serde_json::from_slice(&body).map_err(|e| LookupError::transient(pincode, e))?;

        let envelope = envelopes
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::transient(pincode, TransientError::EmptyEnvelope))?;

        if envelope.status != STATUS_SUCCESS {
            return Err(LookupError::not_found(
                pincode,
                NotFoundReason::UpstreamStatus(envelope.status),
            ));
        }

        // Several post offices can share a pincode; the upstream's first one wins
        let first = envelope
            .post_office
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::not_found(pincode, NotFoundReason::NoPostOffice))?;

        Ok(LookupResult {
            state: first.state,
            district: first.district,
            division: first.division,
        })
    }
}
