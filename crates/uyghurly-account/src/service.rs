use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uyghurly_config::account::AccountConfig;
use uyghurly_core::storage::{KeyValueStore, read_json, write_json};
use uyghurly_core::validation::{SignUpForm, validate_account_update, validate_email};
use uyghurly_types::{NewUser, SessionUser, UnitProgress, UserData};

use crate::backend::{AuthBackend, AuthUser, GoogleCredential, UserRepository};
use crate::error::{AuthError, AuthFlow, Capability};

/// Local storage key of the guest session
pub const GUEST_USER_KEY: &str = "uyghurly_guest_user";

/// Sign-in state and account operations over pluggable backends.
///
/// Built without backends for static-export builds; every backend-dependent
/// operation then reports itself unavailable.
pub struct AccountService {
    auth: Option<Arc<dyn AuthBackend>>,
    users: Option<Arc<dyn UserRepository>>,
    store: Arc<dyn KeyValueStore>,
    config: AccountConfig,
    current: RwLock<Option<SessionUser>>,
}

impl AccountService {
    pub fn new(
        auth: Option<Arc<dyn AuthBackend>>,
        users: Option<Arc<dyn UserRepository>>,
        store: Arc<dyn KeyValueStore>,
        config: AccountConfig,
    ) -> Self {
        Self {
            auth,
            users,
            store,
            config,
            current: RwLock::new(None),
        }
    }

    /// No account backends, guest mode only
    pub fn offline(store: Arc<dyn KeyValueStore>, config: AccountConfig) -> Self {
        Self::new(None, None, store, config)
    }

    pub fn is_available(&self) -> bool {
        self.auth.is_some()
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Signed-in, non-guest user whose email is on the admin list
    pub async fn is_admin(&self) -> bool {
        match self.current.read().await.as_ref() {
            Some(user) if !user.is_guest => self.config.is_admin(&user.email),
            _ => false,
        }
    }

    async fn set_current(&self, user: Option<SessionUser>) {
        *self.current.write().await = user;
    }

    /// Pick up where the last run left off: the backend's persisted identity
    /// first, then a stored guest session
    pub async fn restore_session(&self) -> Option<SessionUser> {
        if let Some(auth) = &self.auth {
            match auth.current_user().await {
                Ok(Some(auth_user)) => {
                    let user = self.resolve_user_document(&auth_user).await;
                    self.set_current(Some(user.clone())).await;
                    return Some(user);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Could not restore {} session: {e}", auth.name()),
            }
        }

        let guest = match read_json::<SessionUser>(self.store.as_ref(), GUEST_USER_KEY) {
            Ok(guest) => guest,
            Err(e) => {
                tracing::warn!("Ignoring stored guest session: {e}");
                None
            }
        };
        self.set_current(guest.clone()).await;
        guest
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let auth = self
            .auth
            .as_ref()
            .ok_or(AuthError::Unavailable(Capability::Authentication))?;

        validate_email(email)?;

        let auth_user = auth
            .sign_in(email, password)
            .await
            .map_err(|e| AuthError::from_backend(AuthFlow::Login, e))?;

        let user = self.resolve_user_document(&auth_user).await;
        self.set_current(Some(user.clone())).await;
        Ok(user)
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SessionUser, AuthError> {
        let auth = self
            .auth
            .as_ref()
            .ok_or(AuthError::Unavailable(Capability::Authentication))?;

        form.validate()?;

        if let Some(users) = &self.users {
            if users.email_exists(&form.email).await? {
                return Err(AuthError::EmailTaken);
            }
            if users.username_exists(&form.username).await? {
                return Err(AuthError::UsernameTaken);
            }
        }

        let auth_user = auth
            .create_account(&form.email, &form.password)
            .await
            .map_err(|e| AuthError::from_backend(AuthFlow::SignUp, e))?;

        let new_user = NewUser {
            name: form.name.clone(),
            username: form.username.clone(),
            email: form.email.clone(),
            is_guest: false,
        };
        let user = match &self.users {
            Some(users) => match users.create_user(new_user).await {
                Ok(data) => SessionUser::from(&data),
                Err(e) => {
                    tracing::warn!("Creating user document failed, using auth identity: {e}");
                    SessionUser {
                        id: auth_user.uid.clone(),
                        name: form.name.clone(),
                        username: form.username.clone(),
                        email: form.email.clone(),
                        is_guest: false,
                    }
                }
            },
            None => session_from_auth(&auth_user),
        };

        self.clear_guest();
        self.set_current(Some(user.clone())).await;
        Ok(user)
    }

    pub async fn sign_in_with_google(
        &self,
        credential: &GoogleCredential,
    ) -> Result<SessionUser, AuthError> {
        let auth = self
            .auth
            .as_ref()
            .ok_or(AuthError::Unavailable(Capability::GoogleAuthentication))?;

        let auth_user = auth
            .sign_in_with_google(credential)
            .await
            .map_err(|e| AuthError::from_backend(AuthFlow::Google, e))?;

        let user = self.resolve_user_document(&auth_user).await;
        self.set_current(Some(user.clone())).await;
        Ok(user)
    }

    /// Start a guest session; it is kept in local storage across restarts
    pub async fn login_as_guest(&self) -> SessionUser {
        let guest = SessionUser {
            id: format!("guest_{}", Utc::now().timestamp_millis()),
            name: "Guest User".to_string(),
            username: "guest".to_string(),
            email: "guest@uyghurly.com".to_string(),
            is_guest: true,
        };

        if let Err(e) = write_json(self.store.as_ref(), GUEST_USER_KEY, &guest) {
            tracing::error!("Error saving guest user: {e}");
        }

        self.set_current(Some(guest.clone())).await;
        guest
    }

    pub async fn logout(&self) {
        let current = self.current.read().await.clone();

        if let (Some(user), Some(auth)) = (current, &self.auth) {
            if !user.is_guest {
                if let Err(e) = auth.sign_out().await {
                    tracing::error!("Logout failed: {e}");
                }
            }
        }

        self.clear_guest();
        self.set_current(None).await;
    }

    pub async fn update_account(
        &self,
        display_name: &str,
        username: &str,
    ) -> Result<SessionUser, AuthError> {
        let user = match self.current_user().await {
            Some(user) if !user.is_guest => user,
            _ => return Err(AuthError::GuestUpdate),
        };
        let users = self
            .users
            .as_ref()
            .ok_or(AuthError::Unavailable(Capability::AccountUpdates))?;

        validate_account_update(display_name, username)?;

        if username != user.username && users.username_exists(username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let data = users.update_account(&user.id, display_name, username).await?;
        let updated = SessionUser::from(&data);
        self.set_current(Some(updated.clone())).await;
        Ok(updated)
    }

    pub async fn delete_account(&self) -> Result<(), AuthError> {
        match self.current_user().await {
            Some(user) if !user.is_guest => {}
            _ => return Err(AuthError::GuestDelete),
        }
        if self.users.is_none() {
            return Err(AuthError::Unavailable(Capability::AccountDeletion));
        }
        Err(AuthError::DeletionUnsupported)
    }

    /// Merge `progress` into the signed-in user's document
    pub async fn update_user_progress(
        &self,
        unit_id: &str,
        progress: &UnitProgress,
    ) -> Result<UserData, AuthError> {
        let user = self
            .current_user()
            .await
            .ok_or(AuthError::NotAuthenticated)?;
        let users = self
            .users
            .as_ref()
            .ok_or(AuthError::Unavailable(Capability::CloudSync))?;

        Ok(users.update_user_progress(&user.id, unit_id, progress).await?)
    }

    /// Document of the signed-in user, when there is a backend and a real account
    pub async fn user_document(&self) -> Result<Option<UserData>, AuthError> {
        let Some(user) = self.current_user().await else {
            return Ok(None);
        };
        let Some(users) = &self.users else {
            return Ok(None);
        };
        if user.is_guest {
            return Ok(None);
        }
        Ok(users.get_user_by_id(&user.id).await?)
    }

    /// Find or create the user document for an authenticated identity.
    ///
    /// Falls back to a record built from the identity when the collection fails.
    async fn resolve_user_document(&self, auth_user: &AuthUser) -> SessionUser {
        let Some(users) = &self.users else {
            return session_from_auth(auth_user);
        };

        match users.get_user_by_email(&auth_user.email).await {
            Ok(Some(data)) => {
                if let Err(e) = users.update_last_login(&data.id).await {
                    tracing::warn!("Failed to update last login: {e}");
                }
                SessionUser::from(&data)
            }
            Ok(None) => {
                tracing::info!("No user document for {}, creating one", auth_user.email);
                let name = auth_user.preferred_name();
                let new_user = NewUser {
                    name: name.clone(),
                    username: name,
                    email: auth_user.email.clone(),
                    is_guest: false,
                };
                match users.create_user(new_user).await {
                    Ok(data) => SessionUser::from(&data),
                    Err(e) => {
                        tracing::warn!("Failed to create user document: {e}");
                        session_from_auth(auth_user)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("User lookup failed after sign-in: {e}");
                session_from_auth(auth_user)
            }
        }
    }

    fn clear_guest(&self) {
        if let Err(e) = self.store.remove(GUEST_USER_KEY) {
            tracing::warn!("Could not clear guest session: {e}");
        }
    }
}

fn session_from_auth(auth_user: &AuthUser) -> SessionUser {
    let name = auth_user.preferred_name();
    SessionUser {
        id: auth_user.uid.clone(),
        name: name.clone(),
        username: name,
        email: auth_user.email.clone(),
        is_guest: false,
    }
}
