//! Email notification dispatch
//!
//! Sends the operator notification and sender auto-reply for accepted
//! contact submissions over SMTP.

pub mod sender;

pub use sender::ContactNotifier;
