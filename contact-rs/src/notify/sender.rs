//! Contact notification sender
//!
//! Dispatches two independent emails per accepted submission: an
//! operator notification and an auto-reply to the sender. The sends run
//! concurrently and a failure in one never blocks or rolls back the
//! other; failures are logged and swallowed so email trouble can't
//! change an already-decided response.

use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};

use crate::config::EmailConfig;
use crate::error::{ContactError, Result};
use crate::spam::Submission;

pub struct ContactNotifier {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: Option<String>,
    recipient: Option<String>,
}

impl ContactNotifier {
    pub fn new(config: &EmailConfig) -> Self {
        let from_address = config
            .from_address
            .clone()
            .or_else(|| config.username.clone());
        let recipient = config.recipient.clone().or_else(|| from_address.clone());

        let transport = config.smtp_host.as_deref().map(|host| {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                    .port(config.smtp_port);
            if let (Some(user), Some(pass)) = (&config.username, &config.password) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }
            builder.build()
        });

        Self {
            transport,
            from_address,
            recipient,
        }
    }

    /// Dispatch is active only with a transport, a sender address, and
    /// a notification recipient.
    pub fn is_configured(&self) -> bool {
        self.transport.is_some() && self.from_address.is_some() && self.recipient.is_some()
    }

    /// Send the operator notification and the sender auto-reply for an
    /// accepted submission. Both messages are independent; each failure
    /// is logged and swallowed on its own.
    pub async fn dispatch(&self, submission: &Submission, client_ip: &str) {
        if !self.is_configured() {
            debug!("Email dispatch not configured - skipping notification");
            return;
        }

        let (notification, auto_reply) = tokio::join!(
            self.send_notification(submission, client_ip),
            self.send_auto_reply(submission),
        );

        match notification {
            Ok(()) => info!("Sent contact notification for {}", submission.email),
            Err(e) => error!("Failed to send contact notification: {}", e),
        }
        match auto_reply {
            Ok(()) => info!("Sent auto-reply to {}", submission.email),
            Err(e) => error!("Failed to send auto-reply: {}", e),
        }
    }

    async fn send_notification(&self, submission: &Submission, client_ip: &str) -> Result<()> {
        let recipient = self
            .recipient
            .as_deref()
            .ok_or_else(|| ContactError::Smtp("No notification recipient".to_string()))?;

        let subject = format!("Portfolio Contact: {}", submission.subject);
        let body = notification_body(submission, client_ip);

        self.send(recipient, &subject, body).await
    }

    async fn send_auto_reply(&self, submission: &Submission) -> Result<()> {
        let body = auto_reply_body(submission);

        self.send(&submission.email, "Thank you for contacting me!", body)
            .await
    }

    async fn send(&self, to: &str, subject: &str, html_body: String) -> Result<()> {
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| ContactError::Smtp("SMTP transport not configured".to_string()))?;
        let from = self
            .from_address
            .as_deref()
            .ok_or_else(|| ContactError::Smtp("No sender address".to_string()))?;

        let from: Mailbox = from
            .parse()
            .map_err(|e| ContactError::Smtp(format!("Invalid sender address: {e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| ContactError::Smtp(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| ContactError::Smtp(format!("Failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| ContactError::Smtp(e.to_string()))?;

        Ok(())
    }
}

/// Operator notification body. User-supplied fields are HTML-escaped;
/// message newlines become `<br>`.
fn notification_body(submission: &Submission, client_ip: &str) -> String {
    let timestamp = Utc::now().to_rfc3339();
    format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Subject:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>\
         <hr>\
         <p><small>IP: {} | Time: {}</small></p>",
        escape_html(&submission.name),
        escape_html(&submission.email),
        escape_html(&submission.subject),
        escape_html(&submission.message).replace('\n', "<br>"),
        escape_html(client_ip),
        timestamp,
    )
}

/// Auto-reply body sent back to the submitter.
fn auto_reply_body(submission: &Submission) -> String {
    format!(
        "<h2>Hi {},</h2>\
         <p>Thanks for reaching out! I've received your message about \
         \"{}\" and I'll get back to you within 24 hours.</p>\
         <p>Best regards,<br>Gabriela Prado</p>\
         <hr>\
         <p><small>This is an automated response. Please don't reply to this email.</small></p>",
        escape_html(&submission.name),
        escape_html(&submission.subject),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailConfig;

    fn full_config() -> EmailConfig {
        EmailConfig {
            smtp_host: Some("127.0.0.1".to_string()),
            smtp_port: 2525,
            username: Some("mailer@example.com".to_string()),
            password: Some("secret".to_string()),
            from_address: None,
            recipient: Some("owner@example.com".to_string()),
        }
    }

    fn submission() -> Submission {
        Submission {
            name: "Jane Smith".to_string(),
            email: "jane@gmail.com".to_string(),
            subject: "Business Inquiry".to_string(),
            message: "First line.\nSecond line.".to_string(),
            ..Submission::default()
        }
    }

    #[tokio::test]
    async fn test_configured_with_host_and_addresses() {
        assert!(ContactNotifier::new(&full_config()).is_configured());
    }

    #[test]
    fn test_not_configured_without_host() {
        let mut config = full_config();
        config.smtp_host = None;
        assert!(!ContactNotifier::new(&config).is_configured());
    }

    #[tokio::test]
    async fn test_not_configured_without_any_address() {
        let mut config = full_config();
        config.username = None;
        config.recipient = None;
        assert!(!ContactNotifier::new(&config).is_configured());
    }

    #[tokio::test]
    async fn test_recipient_falls_back_to_sender() {
        let mut config = full_config();
        config.recipient = None;
        let notifier = ContactNotifier::new(&config);
        assert_eq!(notifier.recipient.as_deref(), Some("mailer@example.com"));
    }

    #[test]
    fn test_notification_body_contains_fields() {
        let body = notification_body(&submission(), "192.0.2.1");
        assert!(body.contains("Jane Smith"));
        assert!(body.contains("jane@gmail.com"));
        assert!(body.contains("Business Inquiry"));
        assert!(body.contains("First line.<br>Second line."));
        assert!(body.contains("192.0.2.1"));
    }

    #[test]
    fn test_bodies_escape_html() {
        let mut sub = submission();
        sub.name = "<script>alert(1)</script>".to_string();
        sub.subject = "a & b".to_string();

        let notification = notification_body(&sub, "192.0.2.1");
        assert!(!notification.contains("<script>"));
        assert!(notification.contains("&lt;script&gt;"));

        let reply = auto_reply_body(&sub);
        assert!(!reply.contains("<script>"));
        assert!(reply.contains("a &amp; b"));
    }

    #[test]
    fn test_auto_reply_greets_sender() {
        let body = auto_reply_body(&submission());
        assert!(body.contains("Hi Jane Smith,"));
        assert!(body.contains("Business Inquiry"));
        assert!(body.contains("automated response"));
    }

    #[tokio::test]
    async fn test_dispatch_unconfigured_is_noop() {
        let notifier = ContactNotifier::new(&EmailConfig {
            smtp_host: None,
            smtp_port: 587,
            username: None,
            password: None,
            from_address: None,
            recipient: None,
        });
        // Must return without attempting any connection.
        notifier.dispatch(&submission(), "192.0.2.1").await;
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_swallowed() {
        // No SMTP server listens here; both sends fail and are logged,
        // and dispatch still completes normally.
        let notifier = ContactNotifier::new(&full_config());
        notifier.dispatch(&submission(), "192.0.2.1").await;
    }
}
