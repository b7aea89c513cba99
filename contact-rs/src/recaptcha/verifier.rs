//! reCAPTCHA v3 token verification
//!
//! Consults Google's siteverify endpoint and converts the returned
//! confidence score into a spam-risk contribution. The verifier is
//! deliberately failure-tolerant: an unreachable upstream degrades to a
//! cautious low-confidence signal instead of failing the request, and a
//! missing configuration disables the check entirely.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::RecaptchaConfig;
use crate::error::{ContactError, Result};
use crate::spam::{HeuristicFinding, SpamAnalysis};

use super::types::VerificationResult;

/// Google's verification endpoint.
const VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Upstream timeout; one slow verifier must not stall the handler.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder values shipped in configuration templates count as unset.
const PLACEHOLDER_KEYS: &[&str] = &["your-site-key-here", "your-secret-key-here"];

pub struct RecaptchaVerifier {
    site_key: Option<String>,
    secret_key: Option<String>,
    http: Client,
}

impl RecaptchaVerifier {
    pub fn new(config: &RecaptchaConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(VERIFY_TIMEOUT)
            .build()
            .map_err(|e| ContactError::Verification(e.to_string()))?;

        Ok(Self {
            site_key: config.site_key.clone().filter(|k| is_real_key(k)),
            secret_key: config.secret_key.clone().filter(|k| is_real_key(k)),
            http,
        })
    }

    /// Verification is active only when both keys are present.
    pub fn is_configured(&self) -> bool {
        self.site_key.is_some() && self.secret_key.is_some()
    }

    /// The public site key for the client-side widget, if configured.
    pub fn site_key(&self) -> Option<&str> {
        self.site_key.as_deref()
    }

    /// Verify a client-supplied token against the upstream service.
    ///
    /// Never returns an error: an unconfigured verifier yields a
    /// neutral result, and network or decode failures yield a cautious
    /// low-confidence one.
    pub async fn verify_token(
        &self,
        token: Option<&str>,
        client_ip: Option<&str>,
    ) -> VerificationResult {
        let Some(secret) = self.secret_key.as_deref() else {
            debug!("reCAPTCHA not configured - skipping verification");
            return VerificationResult::unconfigured();
        };

        let mut params = vec![("secret", secret), ("response", token.unwrap_or(""))];
        if let Some(ip) = client_ip {
            params.push(("remoteip", ip));
        }

        let response = match self.http.post(VERIFY_URL).form(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("reCAPTCHA verification failed: {}", e);
                return VerificationResult::cautious();
            }
        };

        match response.json::<VerificationResult>().await {
            Ok(mut result) => {
                result.configured = true;
                info!(
                    success = result.success,
                    score = result.score,
                    errors = ?result.error_codes,
                    "reCAPTCHA verification result"
                );
                result
            }
            Err(e) => {
                warn!("Failed to decode reCAPTCHA response: {}", e);
                VerificationResult::cautious()
            }
        }
    }

    /// Convert a verification result into a spam-risk contribution.
    ///
    /// An unconfigured verifier contributes nothing, regardless of the
    /// token. Verification failures score by failure reason; successes
    /// score by how far the confidence falls below 0.7.
    pub fn score_result(result: &VerificationResult) -> SpamAnalysis {
        if !result.configured {
            return SpamAnalysis::clean();
        }

        let mut findings = Vec::new();

        if !result.success {
            findings.push(HeuristicFinding::new(60, "reCAPTCHA verification failed"));

            if result.error_codes.iter().any(|c| c == "invalid-input-response") {
                findings.push(HeuristicFinding::new(40, "Invalid reCAPTCHA token"));
            }
            if result.error_codes.iter().any(|c| c == "timeout-or-duplicate") {
                findings.push(HeuristicFinding::new(30, "reCAPTCHA token expired or reused"));
            }
        } else {
            let score = result.score.unwrap_or(0.0);

            if score < 0.3 {
                findings.push(HeuristicFinding::new(
                    80,
                    format!("Very low reCAPTCHA score ({score}) - likely bot"),
                ));
            } else if score < 0.5 {
                findings.push(HeuristicFinding::new(
                    50,
                    format!("Low reCAPTCHA score ({score}) - suspicious activity"),
                ));
            } else if score < 0.7 {
                findings.push(HeuristicFinding::new(
                    25,
                    format!("Moderate reCAPTCHA score ({score}) - borderline suspicious"),
                ));
            }
            // Scores of 0.7 and above are considered legitimate.
        }

        SpamAnalysis::from_findings(findings)
    }
}

fn is_real_key(key: &str) -> bool {
    !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key)
}
