use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uyghurly_core::validation::{validate_email, validate_password};
use uyghurly_types::{NewUser, UnitProgress, UserData, UserProfile};

use crate::backend::{AuthBackend, AuthUser, GoogleCredential, UserRepository};
use crate::error::{BackendError, RepositoryError};

/// Consecutive wrong passwords before sign-in is refused
const MAX_FAILED_ATTEMPTS: u32 = 5;

async fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, RepositoryError> {
    match tokio::fs::read_to_string(path).await {
        Ok(data) if data.trim().is_empty() => Ok(T::default()),
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_string_pretty(value)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn internal(err: impl std::fmt::Display) -> BackendError {
    BackendError::new("auth/internal-error", err.to_string())
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Provider {
    Password,
    Google,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    uid: String,
    email: String,
    display_name: Option<String>,
    provider: Provider,
    /// Argon2 PHC string; absent for federated accounts
    password_hash: Option<String>,
}

impl StoredAccount {
    fn auth_user(&self) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: BTreeMap<String, StoredAccount>,
    /// Uid of the signed-in account
    #[serde(default)]
    current: Option<String>,
}

struct AccountsState {
    file: AccountsFile,
    failed_attempts: HashMap<String, u32>,
}

/// Email/password and Google identities kept in a local JSON file
pub struct LocalAuthBackend {
    path: PathBuf,
    hasher: Argon2<'static>,
    state: RwLock<AccountsState>,
}

impl LocalAuthBackend {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        Self::open_with_params(path, Params::default()).await
    }

    /// Open with explicit Argon2id cost parameters
    pub async fn open_with_params(
        path: impl AsRef<Path>,
        params: Params,
    ) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let file: AccountsFile = load_json(&path).await?;
        tracing::debug!(
            "Opened local accounts {} ({} accounts)",
            path.display(),
            file.accounts.len()
        );

        Ok(Self {
            path,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            state: RwLock::new(AccountsState {
                file,
                failed_attempts: HashMap::new(),
            }),
        })
    }

    fn hash_password(&self, password: &str) -> Result<String, BackendError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(internal)
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                self.hasher
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Write `next` to disk, then make it the in-memory state
    async fn commit(
        &self,
        state: &mut AccountsState,
        next: AccountsFile,
    ) -> Result<(), BackendError> {
        save_json(&self.path, &next).await.map_err(internal)?;
        state.file = next;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthBackend for LocalAuthBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        if validate_email(email).is_err() {
            return Err(BackendError::new("auth/invalid-email", "Malformed email"));
        }
        let key = email_key(email);

        let mut state = self.state.write().await;
        if state.failed_attempts.get(&key).copied().unwrap_or(0) >= MAX_FAILED_ATTEMPTS {
            return Err(BackendError::new(
                "auth/too-many-requests",
                "Account temporarily locked",
            ));
        }

        let Some(account) = state.file.accounts.get(&key).cloned() else {
            return Err(BackendError::new("auth/user-not-found", "No such account"));
        };

        let Some(hash) = account.password_hash.as_deref() else {
            return Err(BackendError::new(
                "auth/invalid-credential",
                "Account uses a different sign-in method",
            ));
        };

        if !self.verify_password(password, hash) {
            *state.failed_attempts.entry(key).or_insert(0) += 1;
            return Err(BackendError::new("auth/wrong-password", "Password mismatch"));
        }

        state.failed_attempts.remove(&key);
        let mut next = state.file.clone();
        next.current = Some(account.uid.clone());
        self.commit(&mut state, next).await?;

        tracing::info!("Signed in {}", account.email);
        Ok(account.auth_user())
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        if validate_email(email).is_err() {
            return Err(BackendError::new("auth/invalid-email", "Malformed email"));
        }
        if validate_password(password).is_err() {
            return Err(BackendError::new("auth/weak-password", "Password too weak"));
        }
        let key = email_key(email);

        let mut state = self.state.write().await;
        if state.file.accounts.contains_key(&key) {
            return Err(BackendError::new(
                "auth/email-already-in-use",
                "Email already registered",
            ));
        }

        let account = StoredAccount {
            uid: uuid::Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            display_name: None,
            provider: Provider::Password,
            password_hash: Some(self.hash_password(password)?),
        };
        let user = account.auth_user();

        let mut next = state.file.clone();
        next.accounts.insert(key, account);
        next.current = Some(user.uid.clone());
        self.commit(&mut state, next).await?;

        tracing::info!("Created account for {}", user.email);
        Ok(user)
    }

    async fn sign_in_with_google(
        &self,
        credential: &GoogleCredential,
    ) -> Result<AuthUser, BackendError> {
        if validate_email(&credential.email).is_err() {
            return Err(BackendError::new("auth/invalid-email", "Malformed email"));
        }
        let key = email_key(&credential.email);

        let mut state = self.state.write().await;
        let mut next = state.file.clone();
        let existing = next.accounts.get(&key).cloned();
        let account = match existing {
            Some(existing) if existing.provider != Provider::Google => {
                return Err(BackendError::new(
                    "auth/account-exists-with-different-credential",
                    "Email registered with a password",
                ));
            }
            Some(existing) => existing,
            None => {
                let account = StoredAccount {
                    uid: uuid::Uuid::new_v4().to_string(),
                    email: credential.email.trim().to_string(),
                    display_name: credential.display_name.clone(),
                    provider: Provider::Google,
                    password_hash: None,
                };
                next.accounts.insert(key, account.clone());
                account
            }
        };

        next.current = Some(account.uid.clone());
        self.commit(&mut state, next).await?;
        Ok(account.auth_user())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        if state.file.current.is_none() {
            return Ok(());
        }
        let mut next = state.file.clone();
        next.current = None;
        self.commit(&mut state, next).await
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        let state = self.state.read().await;
        let Some(uid) = state.file.current.as_deref() else {
            return Ok(None);
        };
        Ok(state
            .file
            .accounts
            .values()
            .find(|a| a.uid == uid)
            .map(StoredAccount::auth_user))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// `users` collection persisted as a JSON map of id to document
pub struct LocalUserRepository {
    path: PathBuf,
    users: RwLock<BTreeMap<String, UserData>>,
}

impl LocalUserRepository {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let users: BTreeMap<String, UserData> = load_json(&path).await?;
        tracing::debug!("Opened users collection {} ({} users)", path.display(), users.len());

        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    async fn modify<F>(&self, id: &str, change: F) -> Result<UserData, RepositoryError>
    where
        F: FnOnce(&mut UserData) + Send,
    {
        let mut users = self.users.write().await;
        let mut updated = users.get(id).cloned().ok_or(RepositoryError::NotFound)?;
        change(&mut updated);

        let mut next = users.clone();
        next.insert(id.to_string(), updated.clone());
        save_json(&self.path, &next).await?;
        *users = next;
        Ok(updated)
    }
}

#[async_trait::async_trait]
impl UserRepository for LocalUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<UserData, RepositoryError> {
        let now = Utc::now();
        let data = UserData {
            id: uuid::Uuid::new_v4().to_string(),
            name: user.name,
            username: user.username,
            email: user.email,
            is_guest: user.is_guest,
            created_at: now,
            last_login_at: now,
            profile: UserProfile::default(),
            progress: BTreeMap::new(),
        };

        let mut users = self.users.write().await;
        let mut next = users.clone();
        next.insert(data.id.clone(), data.clone());
        save_json(&self.path, &next).await?;
        *users = next;

        tracing::info!("Created user document {} for {}", data.id, data.email);
        Ok(data)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<UserData>, RepositoryError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserData>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserData>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update_last_login(&self, id: &str) -> Result<(), RepositoryError> {
        self.modify(id, |user| user.last_login_at = Utc::now())
            .await
            .map(|_| ())
    }

    async fn update_account(
        &self,
        id: &str,
        name: &str,
        username: &str,
    ) -> Result<UserData, RepositoryError> {
        self.modify(id, |user| {
            user.name = name.to_string();
            user.username = username.to_string();
        })
        .await
    }

    async fn update_user_progress(
        &self,
        id: &str,
        unit_id: &str,
        progress: &UnitProgress,
    ) -> Result<UserData, RepositoryError> {
        self.modify(id, |user| {
            let entry = user.progress.entry(unit_id.to_string()).or_default();
            let newly_completed =
                progress.lesson_completed == Some(true) && entry.lesson_completed != Some(true);
            entry.merge(progress);
            if newly_completed {
                user.profile.lessons_completed += 1;
            }
        })
        .await
    }
}
