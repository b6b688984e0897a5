use uyghurly_core::validation::ValidationError;

/// Raw failure reported by an auth backend, e.g. `auth/wrong-password`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct BackendError {
    pub code: String,
    pub message: String,
}

impl BackendError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    InvalidCredential,
    TooManyRequests,
    NetworkRequestFailed,
    EmailAlreadyInUse,
    WeakPassword,
    PopupClosedByUser,
    AccountExistsWithDifferentCredential,
    Other(String),
}

impl AuthErrorCode {
    /// Accepts codes with or without the `auth/` prefix
    pub fn parse(code: &str) -> Self {
        match code.strip_prefix("auth/").unwrap_or(code) {
            "user-not-found" => AuthErrorCode::UserNotFound,
            "wrong-password" => AuthErrorCode::WrongPassword,
            "invalid-email" => AuthErrorCode::InvalidEmail,
            "invalid-credential" => AuthErrorCode::InvalidCredential,
            "too-many-requests" => AuthErrorCode::TooManyRequests,
            "network-request-failed" => AuthErrorCode::NetworkRequestFailed,
            "email-already-in-use" => AuthErrorCode::EmailAlreadyInUse,
            "weak-password" => AuthErrorCode::WeakPassword,
            "popup-closed-by-user" => AuthErrorCode::PopupClosedByUser,
            "account-exists-with-different-credential" => {
                AuthErrorCode::AccountExistsWithDifferentCredential
            }
            other => AuthErrorCode::Other(other.to_string()),
        }
    }
}

/// Which operation a backend failure came from; the message table differs per flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    SignUp,
    Google,
}

/// Backend-dependent features that can be switched off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authentication,
    GoogleAuthentication,
    AccountUpdates,
    AccountDeletion,
    CloudSync,
}

impl Capability {
    pub fn unavailable_message(&self) -> &'static str {
        match self {
            Capability::Authentication => {
                "Authentication is not available in this version. Please use the web version for full functionality."
            }
            Capability::GoogleAuthentication => {
                "Google authentication is not available in this version. Please use the web version for full functionality."
            }
            Capability::AccountUpdates => {
                "Account updates are not available in this version. Please use the web version for full functionality."
            }
            Capability::AccountDeletion => {
                "Account deletion is not available in this version. Please use the web version for full functionality."
            }
            Capability::CloudSync => {
                "Cloud sync is not available. This feature requires the web version."
            }
        }
    }
}

/// Account failure with the message shown to the learner
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{}", .0.unavailable_message())]
    Unavailable(Capability),

    #[error("{message}")]
    Backend { code: AuthErrorCode, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("This username is already taken. Please choose a different username.")]
    UsernameTaken,

    #[error("An account with this email already exists. Please sign in instead.")]
    EmailTaken,

    #[error("Guest users cannot update account settings.")]
    GuestUpdate,

    #[error("Guest users cannot delete accounts.")]
    GuestDelete,

    #[error("Account deletion is not yet implemented. Please contact support.")]
    DeletionUnsupported,

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Translate a backend failure into the fixed message for `flow`
    pub fn from_backend(flow: AuthFlow, err: BackendError) -> Self {
        let code = AuthErrorCode::parse(&err.code);
        let message = backend_message(flow, &code, &err.message);
        AuthError::Backend { code, message }
    }
}

fn backend_message(flow: AuthFlow, code: &AuthErrorCode, raw: &str) -> String {
    use AuthErrorCode::*;

    let detail = if raw.trim().is_empty() {
        "Please try again."
    } else {
        raw
    };

    let fixed = match (flow, code) {
        (AuthFlow::Login, UserNotFound) => "No account found with this email. Please sign up first.",
        (AuthFlow::Login, WrongPassword) => "Incorrect password. Please try again.",
        (AuthFlow::Login, InvalidCredential) => {
            "Invalid credentials. Please check your email and password."
        }
        (AuthFlow::Login, TooManyRequests) => "Too many failed attempts. Please try again later.",
        (AuthFlow::SignUp, EmailAlreadyInUse) => {
            "An account with this email already exists. Please sign in instead."
        }
        (AuthFlow::SignUp, WeakPassword) => {
            "Password should be at least 8 characters long and contain numbers, letters, and capital letters."
        }
        (AuthFlow::SignUp, InvalidCredential) => "Invalid credentials provided.",
        (AuthFlow::Login | AuthFlow::SignUp, InvalidEmail) => "Invalid email address.",
        (AuthFlow::Login | AuthFlow::SignUp, NetworkRequestFailed) => {
            "Network error. Please check your internet connection."
        }
        (AuthFlow::Google, PopupClosedByUser) => "Sign in was cancelled.",
        (AuthFlow::Google, AccountExistsWithDifferentCredential) => {
            "An account with this email already exists with a different sign-in method."
        }
        (AuthFlow::Google, _) => "Google sign in failed. Please try again.",
        (AuthFlow::Login, _) => return format!("Login failed: {detail}"),
        (AuthFlow::SignUp, _) => return format!("Account creation failed: {detail}"),
    };

    fixed.to_string()
}

/// Failure of a users collection
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("User not found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn message(flow: AuthFlow, code: &str, raw: &str) -> String {
        AuthError::from_backend(flow, BackendError::new(code, raw)).to_string()
    }

    #[test]
    fn login_codes_map_to_fixed_messages() {
        assert_eq!(
            message(AuthFlow::Login, "auth/user-not-found", "x"),
            "No account found with this email. Please sign up first."
        );
        assert_eq!(
            message(AuthFlow::Login, "auth/wrong-password", "x"),
            "Incorrect password. Please try again."
        );
        assert_eq!(
            message(AuthFlow::Login, "auth/invalid-email", "x"),
            "Invalid email address."
        );
        assert_eq!(
            message(AuthFlow::Login, "auth/too-many-requests", "x"),
            "Too many failed attempts. Please try again later."
        );
        assert_eq!(
            message(AuthFlow::Login, "auth/network-request-failed", "x"),
            "Network error. Please check your internet connection."
        );
    }

    #[test]
    fn unmapped_codes_fall_back() {
        assert_eq!(
            message(AuthFlow::Login, "auth/internal-error", "boom"),
            "Login failed: boom"
        );
        assert_eq!(
            message(AuthFlow::Login, "auth/internal-error", ""),
            "Login failed: Please try again."
        );
        assert_eq!(
            message(AuthFlow::SignUp, "auth/quota-exceeded", ""),
            "Account creation failed: Please try again."
        );
        assert_eq!(
            message(AuthFlow::Google, "auth/wrong-password", "x"),
            "Google sign in failed. Please try again."
        );
    }

    #[test]
    fn same_code_differs_per_flow() {
        assert_eq!(
            message(AuthFlow::Login, "invalid-credential", ""),
            "Invalid credentials. Please check your email and password."
        );
        assert_eq!(
            message(AuthFlow::SignUp, "invalid-credential", ""),
            "Invalid credentials provided."
        );
        assert_eq!(
            message(AuthFlow::SignUp, "auth/weak-password", ""),
            "Password should be at least 8 characters long and contain numbers, letters, and capital letters."
        );
        assert_eq!(
            message(AuthFlow::Google, "auth/popup-closed-by-user", ""),
            "Sign in was cancelled."
        );
    }

    #[test]
    fn unavailable_messages() {
        assert_eq!(
            AuthError::Unavailable(Capability::Authentication).to_string(),
            "Authentication is not available in this version. Please use the web version for full functionality."
        );
        assert_eq!(
            AuthError::Unavailable(Capability::AccountDeletion).to_string(),
            "Account deletion is not available in this version. Please use the web version for full functionality."
        );
    }
}
