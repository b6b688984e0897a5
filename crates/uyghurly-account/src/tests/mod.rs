mod local_backend_tests;

use std::path::Path;
use std::sync::Arc;

use argon2::Params;
use uyghurly_config::account::AccountConfig;
use uyghurly_core::storage::MemoryStore;

use crate::{AccountService, LocalAuthBackend, LocalUserRepository};

/// Cheap hashing so tests stay fast
fn test_params() -> Params {
    Params::new(1024, 1, 1, None).unwrap()
}

async fn local_backend(dir: &Path) -> LocalAuthBackend {
    LocalAuthBackend::open_with_params(dir.join("accounts.json"), test_params())
        .await
        .unwrap()
}

struct Harness {
    service: AccountService,
    store: Arc<MemoryStore>,
    users: Arc<LocalUserRepository>,
}

async fn harness(dir: &Path, admin_emails: &[&str]) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let users = Arc::new(LocalUserRepository::open(dir.join("users.json")).await.unwrap());
    let auth = Arc::new(local_backend(dir).await);
    let config = AccountConfig {
        enabled: true,
        admin_emails: admin_emails.iter().map(|e| e.to_string()).collect(),
    };

    let service = AccountService::new(Some(auth), Some(users.clone()), store.clone(), config);
    Harness {
        service,
        store,
        users,
    }
}
