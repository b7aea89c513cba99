//! API request handlers

use axum::{
    extract::{ConnectInfo, Form, FromRequest, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::server::RateLimiter;
use crate::error::Result;
use crate::notify::ContactNotifier;
use crate::recaptcha::RecaptchaVerifier;
use crate::spam::{SpamAnalysis, SpamAnalyzer, Submission};

/// Shared application state
pub struct AppState {
    pub analyzer: SpamAnalyzer,
    pub recaptcha: RecaptchaVerifier,
    pub notifier: ContactNotifier,
    pub rate_limiter: RateLimiter,
}

/// Genuine acceptance message.
const ACCEPTED_MESSAGE: &str =
    "Thank you for your message! I'll get back to you within 24 hours.";

/// Decoy message for blocked submissions; success-shaped so callers
/// cannot tell they were filtered.
const DECOY_MESSAGE: &str = "Thank you for your message. We'll get back to you soon!";

const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

const RATE_LIMITED_MESSAGE: &str =
    "Too many contact form submissions. Please wait 15 minutes before trying again.";

const INTERNAL_ERROR_MESSAGE: &str =
    "Sorry, there was a problem sending your message. Please try again later.";

/// Contact form request body
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Honeypot field; absent from the real form UI.
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, rename = "formTime", deserialize_with = "string_or_number")]
    pub form_time: Option<String>,
    #[serde(default, rename = "g-recaptcha-response")]
    pub recaptcha_token: Option<String>,
}

/// Contact form response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// GET /recaptcha-config response
#[derive(Debug, Serialize)]
pub struct RecaptchaConfigResponse {
    #[serde(rename = "siteKey")]
    pub site_key: Option<String>,
    pub enabled: bool,
}

/// Accepts `formTime` as either a string or a JSON number; form posts
/// send strings, scripted clients often send raw epoch numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => (f as i64).to_string(),
    }))
}

/// Extractor accepting either a JSON or a form-encoded request body.
pub struct JsonOrForm<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}

/// GET /health - liveness probe
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /recaptcha-config - tells the front-end whether to request a token
pub async fn recaptcha_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RecaptchaConfigResponse {
        site_key: state.recaptcha.site_key().map(str::to_string),
        enabled: state.recaptcha.is_configured(),
    })
}

/// POST /contact - contact form submission
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    JsonOrForm(request): JsonOrForm<ContactRequest>,
) -> Response {
    let client_ip = addr.ip().to_string();

    if !state.rate_limiter.check_rate_limit(&client_ip).await {
        warn!("Rate limit exceeded for {}", mask_ip(&client_ip));
        return contact_response(StatusCode::TOO_MANY_REQUESTS, false, RATE_LIMITED_MESSAGE);
    }

    match handle_submission(&state, request, &client_ip).await {
        Ok(response) => response,
        Err(e) => {
            error!("Contact form error: {}", e);
            contact_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                false,
                INTERNAL_ERROR_MESSAGE,
            )
        }
    }
}

async fn handle_submission(
    state: &AppState,
    request: ContactRequest,
    client_ip: &str,
) -> Result<Response> {
    let submission_id = Uuid::new_v4();
    let submission = Submission {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        subject: request.subject.trim().to_string(),
        message: request.message.trim().to_string(),
        honeypot: request.website,
        form_time: request.form_time,
        recaptcha_token: request.recaptcha_token,
    };

    // External verification first; internally a no-op when unconfigured.
    let verification = state
        .recaptcha
        .verify_token(submission.recaptcha_token.as_deref(), Some(client_ip))
        .await;
    let external = RecaptchaVerifier::score_result(&verification);

    let local = state.analyzer.analyze(&submission);
    let analysis = local.merge(&external);

    if analysis.is_spam {
        log_spam_attempt(submission_id, &submission, &analysis, client_ip);
        // Suspected bots get the same status and shape as a genuine
        // acceptance; revealing detection would let them tune around it.
        return Ok(contact_response(StatusCode::OK, true, DECOY_MESSAGE));
    }

    if submission.name.is_empty() || submission.email.is_empty() || submission.message.is_empty() {
        return Ok(contact_response(
            StatusCode::BAD_REQUEST,
            false,
            MISSING_FIELDS_MESSAGE,
        ));
    }

    state.notifier.dispatch(&submission, client_ip).await;

    info!(
        submission_id = %submission_id,
        name = %submission.name,
        email = %submission.email,
        subject = %submission.subject,
        "Contact form submission accepted"
    );

    Ok(contact_response(StatusCode::OK, true, ACCEPTED_MESSAGE))
}

fn contact_response(status: StatusCode, success: bool, message: &str) -> Response {
    (
        status,
        Json(ContactResponse {
            success,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Server-side diagnostic record of a blocked submission. The caller
/// address is partially masked; no field content is logged.
fn log_spam_attempt(
    submission_id: Uuid,
    submission: &Submission,
    analysis: &SpamAnalysis,
    client_ip: &str,
) {
    warn!(
        submission_id = %submission_id,
        ip = %mask_ip(client_ip),
        score = analysis.score,
        severity = %analysis.severity,
        reasons = ?analysis.reasons,
        has_name = !submission.name.is_empty(),
        has_subject = !submission.subject.is_empty(),
        message_length = submission.message.len(),
        honeypot_filled = submission.honeypot_filled(),
        "Spam submission blocked"
    );
}

/// Show a short fixed prefix of the caller address, mask the remainder.
fn mask_ip(ip: &str) -> String {
    let prefix: String = ip.chars().take(8).collect();
    format!("{prefix}***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_ip() {
        assert_eq!(mask_ip("192.0.2.123"), "192.0.2.***");
        assert_eq!(mask_ip("::1"), "::1***");
        assert_eq!(mask_ip("2001:db8::7334"), "2001:db8***");
    }

    #[test]
    fn test_contact_request_form_time_as_string() {
        let request: ContactRequest =
            serde_json::from_str(r#"{"name":"a","formTime":"1700000000000"}"#).unwrap();
        assert_eq!(request.form_time.as_deref(), Some("1700000000000"));
    }

    #[test]
    fn test_contact_request_form_time_as_number() {
        let request: ContactRequest =
            serde_json::from_str(r#"{"name":"a","formTime":1700000000000}"#).unwrap();
        assert_eq!(request.form_time.as_deref(), Some("1700000000000"));
    }

    #[test]
    fn test_contact_request_defaults() {
        let request: ContactRequest = serde_json::from_str("{}").unwrap();
        assert!(request.name.is_empty());
        assert!(request.website.is_none());
        assert!(request.form_time.is_none());
        assert!(request.recaptcha_token.is_none());
    }

    #[test]
    fn test_contact_request_recaptcha_field_name() {
        let request: ContactRequest =
            serde_json::from_str(r#"{"g-recaptcha-response":"tok"}"#).unwrap();
        assert_eq!(request.recaptcha_token.as_deref(), Some("tok"));
    }
}
