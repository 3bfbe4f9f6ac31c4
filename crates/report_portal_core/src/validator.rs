//! crates/report_portal_core/src/validator.rs
//!
//! Email/password checks and login/signup form validation.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A form rejected before any state change. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error(
        "Password must be at least 8 characters long and contain at least one uppercase letter, one lowercase letter, and one number"
    )]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// `local@domain.tld` with no whitespace and at least one dot after the `@`.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_REGEX.is_match(s)
}

/// At least eight characters, one lowercase, one uppercase and one digit.
pub fn is_valid_password(s: &str) -> bool {
    s.chars().count() >= MIN_PASSWORD_LENGTH
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_digit())
}

/// Which checks a portal applies to its forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    pub validate_email: bool,
    pub enforce_password_strength: bool,
    pub require_password_match: bool,
}

impl AuthPolicy {
    pub fn strict() -> Self {
        Self {
            validate_email: true,
            enforce_password_strength: true,
            require_password_match: true,
        }
    }

    /// Presence checks only.
    pub fn lenient() -> Self {
        Self {
            validate_email: false,
            enforce_password_strength: false,
            require_password_match: false,
        }
    }
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Institutions register with an official id; patients leave it empty.
    pub registration_id: Option<String>,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn validate_login(form: &LoginForm, policy: &AuthPolicy) -> Result<(), ValidationError> {
    if blank(&form.email) || form.password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if policy.validate_email && !is_valid_email(form.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Checks run in order and the first failure wins: presence, email, strength, confirmation.
pub fn validate_signup(form: &SignupForm, policy: &AuthPolicy) -> Result<(), ValidationError> {
    let registration_missing = form.registration_id.as_deref().is_some_and(blank);
    if blank(&form.name)
        || blank(&form.email)
        || form.password.is_empty()
        || form.confirm_password.is_empty()
        || registration_missing
    {
        return Err(ValidationError::MissingFields);
    }
    if policy.validate_email && !is_valid_email(form.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    if policy.enforce_password_strength && !is_valid_password(&form.password) {
        return Err(ValidationError::WeakPassword);
    }
    if policy.require_password_match && form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            registration_id: None,
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("john.doe@example.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("john.doe@example"));
        assert!(!is_valid_email("john doe@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_valid_password("Abcdefg1"));
        assert!(is_valid_password("Str0ng!Password"));
        assert!(!is_valid_password("abcdefgh"));
        assert!(!is_valid_password("Abc123"));
        assert!(!is_valid_password("ABCDEFG1"));
        assert!(!is_valid_password("abcdefg1"));
        assert!(!is_valid_password("Abcdefgh"));
    }

    #[test]
    fn test_login_requires_fields_and_email() {
        let policy = AuthPolicy::strict();
        let empty = LoginForm::default();
        assert_eq!(validate_login(&empty, &policy), Err(ValidationError::MissingFields));

        let bad_email = LoginForm {
            email: "not-an-email".to_string(),
            password: "whatever".to_string(),
        };
        assert_eq!(validate_login(&bad_email, &policy), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_login(&bad_email, &AuthPolicy::lenient()), Ok(()));

        let ok = LoginForm {
            email: "jane@example.com".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(validate_login(&ok, &policy), Ok(()));
    }

    #[test]
    fn test_signup_check_order() {
        let policy = AuthPolicy::strict();
        assert_eq!(
            validate_signup(&signup("weak", "different"), &policy),
            Err(ValidationError::WeakPassword)
        );
        assert_eq!(
            validate_signup(&signup("Abcdefg1", "Abcdefg2"), &policy),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(validate_signup(&signup("Abcdefg1", "Abcdefg1"), &policy), Ok(()));

        let mut form = signup("Abcdefg1", "Abcdefg1");
        form.email = "jane@".to_string();
        assert_eq!(validate_signup(&form, &policy), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_lenient_policy_skips_strength_and_match() {
        let policy = AuthPolicy::lenient();
        assert_eq!(validate_signup(&signup("weak", "other"), &policy), Ok(()));
        assert_eq!(
            validate_signup(&signup("", "other"), &policy),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_registration_id_required_when_present() {
        let mut form = signup("Abcdefg1", "Abcdefg1");
        form.registration_id = Some("   ".to_string());
        assert_eq!(
            validate_signup(&form, &AuthPolicy::strict()),
            Err(ValidationError::MissingFields)
        );
        form.registration_id = Some("REG-001".to_string());
        assert_eq!(validate_signup(&form, &AuthPolicy::strict()), Ok(()));
    }
}
