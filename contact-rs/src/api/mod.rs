//! HTTP API
//!
//! Router assembly, request handlers, and per-IP rate limiting for the
//! contact endpoint.

pub mod handlers;
pub mod server;

pub use server::{ApiServer, RateLimiter};
