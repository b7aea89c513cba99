//! reCAPTCHA v3 verification
//!
//! Optional external bot signal: verifies client attestation tokens and
//! converts the upstream confidence score into a spam-risk contribution.

pub mod types;
pub mod verifier;

pub use types::VerificationResult;
pub use verifier::RecaptchaVerifier;
