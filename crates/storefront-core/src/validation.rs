//! # Validation Module
//!
//! Login form checks, run by the consumer before it dispatches `authenticate`.
//! The session transitions never call into this module.
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::validate_credentials;
//!
//! assert!(validate_credentials("emilys", "emilyspass").is_ok());
//!
//! let errors = validate_credentials("   ", "123").unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

use crate::error::ValidationError;
use crate::MIN_PASSWORD_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Form label used in username errors.
pub const USERNAME_FIELD: &str = "Username";

/// Form label used in password errors.
pub const PASSWORD_FIELD: &str = "Password";

/// Validates the username field.
///
/// ## Rules
/// - Must not be empty after trimming
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::Required {
            field: USERNAME_FIELD.to_string(),
        });
    }
    Ok(())
}

/// Validates the password field.
///
/// ## Rules
/// - Must not be empty
/// - Must be at least [`MIN_PASSWORD_LEN`] characters (not trimmed)
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: PASSWORD_FIELD.to_string(),
        });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: PASSWORD_FIELD.to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Validates both login fields, collecting one error per failing field.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = [validate_username(username), validate_password(password)]
        .into_iter()
        .filter_map(Result::err)
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("emilys").is_ok());
        assert!(validate_username("  emilys ").is_ok());

        let err = validate_username("   ").unwrap_err();
        assert_eq!(err.to_string(), "Username is required");
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("emilyspass").is_ok());
        assert!(validate_password("123456").is_ok());

        assert!(matches!(
            validate_password(""),
            Err(ValidationError::Required { .. })
        ));
        let err = validate_password("12345").unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn test_validate_credentials_collects_per_field() {
        assert!(validate_credentials("emilys", "emilyspass").is_ok());

        let errors = validate_credentials("", "abc").unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec![USERNAME_FIELD, PASSWORD_FIELD]);

        let errors = validate_credentials("emilys", "abc").unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
