use crate::error::{ContactError, Result};

/// Basic email validation: `local@domain.tld` shape.
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(ContactError::InvalidEmail("Email is empty".to_string()));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(ContactError::InvalidEmail(
            "Email contains whitespace".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ContactError::InvalidEmail(
            "Email must contain exactly one @".to_string(),
        ));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ContactError::InvalidEmail(
            "Email parts cannot be empty".to_string(),
        ));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ContactError::InvalidEmail(
            "Domain must contain a dot-separated TLD".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@example.co.uk").is_ok());
        assert!(validate_email("user+tag@example.org").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(validate_email("").is_err());
        assert!(validate_email("test").is_err());
        assert!(validate_email("test@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("test@domain").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("has space@example.com").is_err());
        assert!(validate_email("test@.com").is_err());
        assert!(validate_email("test@domain.").is_err());
    }
}
