//! reCAPTCHA verification types

use serde::Deserialize;

/// Outcome of one siteverify call.
///
/// Deserializes Google's response body directly; the `configured` flag
/// is filled in locally to distinguish "verification not set up" from
/// "checked and failed".
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    /// Confidence score in [0, 1]; 1.0 means confidently human. Absent
    /// on some failure responses.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub challenge_ts: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
    /// Not part of the wire format.
    #[serde(skip)]
    pub configured: bool,
}

impl VerificationResult {
    /// Neutral result used when no secret key is configured; the rest
    /// of the pipeline sees a confidently-human signal.
    pub fn unconfigured() -> Self {
        Self {
            success: true,
            score: Some(0.9),
            action: Some("contact_form".to_string()),
            hostname: None,
            challenge_ts: None,
            error_codes: Vec::new(),
            configured: false,
        }
    }

    /// Cautious result used when the verifier is unreachable or its
    /// response cannot be read. Low confidence, but not a hard failure
    /// of the request.
    pub fn cautious() -> Self {
        Self {
            success: false,
            score: Some(0.1),
            action: Some("contact_form".to_string()),
            hostname: None,
            challenge_ts: None,
            error_codes: vec!["network-error".to_string()],
            configured: true,
        }
    }
}
