use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("SMTP dispatch error: {0}")]
    Smtp(String),

    #[error("Verification error: {0}")]
    Verification(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ContactError>;
