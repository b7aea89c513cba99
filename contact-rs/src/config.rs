use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub recaptcha: RecaptchaConfig,
    pub email: EmailConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Directory the static portfolio assets are served from.
    pub public_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecaptchaConfig {
    pub site_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address for outgoing mail; falls back to `username`.
    pub from_address: Option<String>,
    /// Where contact notifications are delivered; falls back to the
    /// sender address.
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::ContactError::Config(e.to_string()))?;

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| crate::error::ContactError::Config(e.to_string()))?;
        config.apply_env();
        Ok(config)
    }

    /// Overlay deployment secrets from the environment onto the file
    /// configuration. File values lose to the environment.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("RECAPTCHA_SITE_KEY") {
            self.recaptcha.site_key = Some(key);
        }
        if let Ok(key) = std::env::var("RECAPTCHA_SECRET_KEY") {
            self.recaptcha.secret_key = Some(key);
        }
        if let Ok(host) = std::env::var("EMAIL_HOST") {
            self.email.smtp_host = Some(host);
        }
        if let Ok(port) = std::env::var("EMAIL_PORT") {
            if let Ok(port) = port.parse() {
                self.email.smtp_port = port;
            }
        }
        if let Ok(user) = std::env::var("EMAIL_USER") {
            self.email.username = Some(user);
        }
        if let Ok(pass) = std::env::var("EMAIL_PASS") {
            self.email.password = Some(pass);
        }
        if let Ok(recipient) = std::env::var("RECIPIENT_EMAIL") {
            self.email.recipient = Some(recipient);
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:3000".to_string(),
                public_dir: "public".to_string(),
            },
            rate_limit: RateLimitConfig {
                max_requests: 3,
                window_secs: 15 * 60, // 15 minutes
            },
            recaptcha: RecaptchaConfig {
                site_key: None,
                secret_key: None,
            },
            email: EmailConfig {
                smtp_host: None,
                smtp_port: 587,
                username: None,
                password: None,
                from_address: None,
                recipient: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
