mod service_tests;

use std::path::Path;
use std::sync::{Arc, Mutex};

use uyghurly_account::{
    AccountService, AuthBackend, AuthUser, BackendError, GoogleCredential, LocalUserRepository,
};
use uyghurly_config::account::AccountConfig;
use uyghurly_core::storage::MemoryStore;
use uyghurly_lang_uyghur::LessonCatalog;

use crate::ProgressService;

/// Accepts any password and keeps one signed-in identity in memory
#[derive(Default)]
struct FakeAuth {
    current: Mutex<Option<AuthUser>>,
}

impl FakeAuth {
    fn identity(email: &str) -> AuthUser {
        AuthUser {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            display_name: None,
        }
    }

    fn set(&self, user: Option<AuthUser>) {
        *self.current.lock().unwrap() = user;
    }
}

#[async_trait::async_trait]
impl AuthBackend for FakeAuth {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthUser, BackendError> {
        let user = Self::identity(email);
        self.set(Some(user.clone()));
        Ok(user)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        self.sign_in(email, password).await
    }

    async fn sign_in_with_google(
        &self,
        credential: &GoogleCredential,
    ) -> Result<AuthUser, BackendError> {
        self.sign_in(&credential.email, "").await
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.set(None);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        Ok(self.current.lock().unwrap().clone())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct Harness {
    progress: ProgressService,
    accounts: Arc<AccountService>,
    users: Arc<LocalUserRepository>,
    catalog: Arc<LessonCatalog>,
}

async fn harness(dir: &Path, admin_emails: &[&str]) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let users = Arc::new(LocalUserRepository::open(dir.join("users.json")).await.unwrap());
    let config = AccountConfig {
        enabled: true,
        admin_emails: admin_emails.iter().map(|e| e.to_string()).collect(),
    };
    let accounts = Arc::new(AccountService::new(
        Some(Arc::new(FakeAuth::default())),
        Some(users.clone()),
        store.clone(),
        config,
    ));
    let catalog = Arc::new(LessonCatalog::embedded(None).unwrap());

    Harness {
        progress: ProgressService::new(store, accounts.clone(), catalog.clone()),
        accounts,
        users,
        catalog,
    }
}
