use serde::{Deserialize, Serialize};
use uyghurly_types::{NewUser, UnitProgress, UserData};

use crate::error::{BackendError, RepositoryError};

/// Identity returned by an auth backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl AuthUser {
    /// Display name, or the local part of the email
    pub fn preferred_name(&self) -> String {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Result of the provider's consent flow, handed to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleCredential {
    pub email: String,
    pub display_name: Option<String>,
}

/// Identity provider interface
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    async fn sign_in_with_google(
        &self,
        credential: &GoogleCredential,
    ) -> Result<AuthUser, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Identity persisted from an earlier sign-in
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError>;

    fn name(&self) -> &str;
}

/// The `users` collection
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new document with a generated id and default profile
    async fn create_user(&self, user: NewUser) -> Result<UserData, RepositoryError>;

    async fn get_user_by_id(&self, id: &str) -> Result<Option<UserData>, RepositoryError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserData>, RepositoryError>;

    async fn get_user_by_username(&self, username: &str)
    -> Result<Option<UserData>, RepositoryError>;

    async fn update_last_login(&self, id: &str) -> Result<(), RepositoryError>;

    /// Change display name and username
    async fn update_account(
        &self,
        id: &str,
        name: &str,
        username: &str,
    ) -> Result<UserData, RepositoryError>;

    /// Merge `progress` into the unit's entry; bumps the lessons counter when a
    /// lesson becomes completed for the first time
    async fn update_user_progress(
        &self,
        id: &str,
        unit_id: &str,
        progress: &UnitProgress,
    ) -> Result<UserData, RepositoryError>;

    async fn get_user_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<UserData>, RepositoryError> {
        if let Some(user) = self.get_user_by_email(identifier).await? {
            return Ok(Some(user));
        }
        self.get_user_by_username(identifier).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.get_user_by_email(email).await?.is_some())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        Ok(self.get_user_by_username(username).await?.is_some())
    }
}
