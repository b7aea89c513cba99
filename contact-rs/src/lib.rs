//! contact-rs: Portfolio contact-form backend
//!
//! A small async HTTP service that serves a static portfolio site and
//! handles contact-form submissions: spam scoring, optional reCAPTCHA
//! verification, rate limiting, and email notification.
//!
//! # Features
//!
//! - **Spam scoring**: Layered heuristics (content, email, patterns,
//!   timing/honeypot) merged into a single scored verdict
//! - **Bot verification**: Optional reCAPTCHA v3 token check, degrading
//!   gracefully when unconfigured or unreachable
//! - **Deceptive rejection**: Suspected bots receive a response
//!   indistinguishable from genuine success
//! - **Email dispatch**: Concurrent operator notification and sender
//!   auto-reply over SMTP
//!
//! # Example
//!
//! ```no_run
//! use contact_rs::api::ApiServer;
//! use contact_rs::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let server = ApiServer::new(config)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`spam`]: Spam scoring pipeline
//! - [`recaptcha`]: reCAPTCHA v3 verification
//! - [`notify`]: Email notification dispatch
//! - [`api`]: HTTP server and request handlers
//! - [`utils`]: Utility functions (validation, etc.)

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod recaptcha;
pub mod spam;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ContactError, Result};
