pub mod backend;
pub mod error;
pub mod local;
pub mod service;

pub use backend::{AuthBackend, AuthUser, GoogleCredential, UserRepository};
pub use error::{AuthError, AuthErrorCode, AuthFlow, BackendError, Capability, RepositoryError};
pub use local::{LocalAuthBackend, LocalUserRepository};
pub use service::{AccountService, GUEST_USER_KEY};

#[cfg(test)]
mod tests;
