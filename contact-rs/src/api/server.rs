//! API Server - HTTP server for the portfolio site and contact endpoint

use axum::{
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::config::Config;
use crate::error::Result;
use crate::notify::ContactNotifier;
use crate::recaptcha::RecaptchaVerifier;
use crate::spam::SpamAnalyzer;

/// Rate limiter state for tracking requests per IP
pub struct RateLimiter {
    /// Map of IP -> (request count, window start time)
    requests: RwLock<HashMap<String, (u32, Instant)>>,
    /// Maximum requests per window
    max_requests: u32,
    /// Window duration
    window_duration: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            max_requests,
            window_duration: Duration::from_secs(window_seconds),
        }
    }

    /// Check if a request should be allowed for the given IP
    pub async fn check_rate_limit(&self, ip: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        let entry = requests.entry(ip.to_string()).or_insert((0, now));

        // Reset if window has passed
        if now.duration_since(entry.1) > self.window_duration {
            entry.0 = 0;
            entry.1 = now;
        }

        // Check limit
        if entry.0 >= self.max_requests {
            return false;
        }

        // Increment counter
        entry.0 += 1;
        true
    }

    /// Clean up old entries (call periodically)
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut requests = self.requests.write().await;
        requests.retain(|_, (_, start)| now.duration_since(*start) <= self.window_duration * 2);
    }
}

/// API Server
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
    public_dir: String,
}

impl ApiServer {
    /// Create a new API server from configuration
    pub fn new(config: Config) -> Result<Self> {
        let state = Arc::new(AppState {
            analyzer: SpamAnalyzer::new(),
            recaptcha: RecaptchaVerifier::new(&config.recaptcha)?,
            notifier: ContactNotifier::new(&config.email),
            rate_limiter: RateLimiter::new(
                config.rate_limit.max_requests,
                config.rate_limit.window_secs,
            ),
        });

        Ok(Self {
            state,
            addr: config.server.listen_addr,
            public_dir: config.server.public_dir,
        })
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/contact", post(handlers::submit_contact))
            .route("/recaptcha-config", get(handlers::recaptcha_config))
            .fallback_service(ServeDir::new(&self.public_dir))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting server on {}", self.addr);
        info!("  Serving static assets from {}", self.public_dir);
        info!(
            "  reCAPTCHA verification: {}",
            if self.state.recaptcha.is_configured() {
                "enabled"
            } else {
                "disabled"
            }
        );
        info!(
            "  Email dispatch: {}",
            if self.state.notifier.is_configured() {
                "enabled"
            } else {
                "disabled"
            }
        );

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, 60);

        for _ in 0..3 {
            assert!(limiter.check_rate_limit("192.0.2.1").await);
        }
        assert!(!limiter.check_rate_limit("192.0.2.1").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_is_per_ip() {
        let limiter = RateLimiter::new(1, 60);

        assert!(limiter.check_rate_limit("192.0.2.1").await);
        assert!(!limiter.check_rate_limit("192.0.2.1").await);
        assert!(limiter.check_rate_limit("192.0.2.2").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_window_reset() {
        // Zero-length window: every check starts a fresh window.
        let limiter = RateLimiter::new(1, 0);

        assert!(limiter.check_rate_limit("192.0.2.1").await);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(limiter.check_rate_limit("192.0.2.1").await);
    }

    #[tokio::test]
    async fn test_rate_limiter_cleanup() {
        let limiter = RateLimiter::new(3, 0);
        limiter.check_rate_limit("192.0.2.1").await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        limiter.cleanup().await;

        let requests = limiter.requests.read().await;
        assert!(requests.is_empty());
    }
}
