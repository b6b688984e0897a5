use std::sync::LazyLock;

use regex::Regex;

static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_USERNAME_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Password must contain at least one number")]
    PasswordMissingNumber,

    #[error("Password must contain at least one letter")]
    PasswordMissingLetter,

    #[error("Password must contain at least one capital letter")]
    PasswordMissingCapital,

    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,

    #[error("Username can only contain letters, numbers, and underscores")]
    UsernameInvalidChars,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Display name is required.")]
    DisplayNameRequired,

    #[error("Username is required.")]
    UsernameRequired,
}

/// Sign-up form as submitted
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// First failing rule wins, in the order the form reports them
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        validate_password(&self.password)?;
        validate_username(&self.username)?;
        validate_email(&self.email)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingNumber);
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::PasswordMissingLetter);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordMissingCapital);
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if !USERNAME.is_match(username) {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Login only accepts email identifiers
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Account settings form: both fields must be non-blank
pub fn validate_account_update(display_name: &str, username: &str) -> Result<(), ValidationError> {
    if display_name.trim().is_empty() {
        return Err(ValidationError::DisplayNameRequired);
    }
    if username.trim().is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0-4, one point per satisfied rule
    pub score: u8,
    pub label: &'static str,
}

pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            label: "Enter password",
        };
    }

    let checks = [
        password.chars().count() >= MIN_PASSWORD_LEN,
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| c.is_ascii_alphabetic()),
        password.chars().any(|c| c.is_ascii_uppercase()),
    ];
    let score = checks.iter().filter(|ok| **ok).count() as u8;

    let label = match score {
        0 => "Very Weak",
        1 => "Weak",
        2 => "Fair",
        3 => "Good",
        _ => "Strong",
    };

    PasswordStrength { score, label }
}
