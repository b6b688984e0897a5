use pretty_assertions::assert_eq;
use uyghurly_types::{NewUser, UnitProgress};

use super::local_backend;
use crate::{AuthBackend, GoogleCredential, LocalUserRepository, UserRepository};

#[tokio::test]
async fn sign_in_checks_the_password_hash() {
    let dir = tempfile::tempdir().unwrap();
    let backend = local_backend(dir.path()).await;

    let created = backend.create_account("aynur@example.com", "Passw0rd").await.unwrap();
    let signed_in = backend.sign_in("AYNUR@example.com", "Passw0rd").await.unwrap();
    assert_eq!(created.uid, signed_in.uid);

    let err = backend.sign_in("aynur@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.code, "auth/wrong-password");

    let err = backend.sign_in("nobody@example.com", "Passw0rd").await.unwrap_err();
    assert_eq!(err.code, "auth/user-not-found");

    let raw = std::fs::read_to_string(dir.path().join("accounts.json")).unwrap();
    assert!(!raw.contains("Passw0rd"));
    assert!(raw.contains("$argon2id$"));
}

#[tokio::test]
async fn create_account_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let backend = local_backend(dir.path()).await;

    assert_eq!(
        backend.create_account("not-an-email", "Passw0rd").await.unwrap_err().code,
        "auth/invalid-email"
    );
    assert_eq!(
        backend.create_account("a@example.com", "abc").await.unwrap_err().code,
        "auth/weak-password"
    );

    backend.create_account("a@example.com", "Passw0rd").await.unwrap();
    assert_eq!(
        backend.create_account("a@example.com", "Passw0rd").await.unwrap_err().code,
        "auth/email-already-in-use"
    );
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let dir = tempfile::tempdir().unwrap();
    let backend = local_backend(dir.path()).await;
    backend.create_account("a@example.com", "Passw0rd").await.unwrap();

    for _ in 0..5 {
        let err = backend.sign_in("a@example.com", "nope").await.unwrap_err();
        assert_eq!(err.code, "auth/wrong-password");
    }
    let err = backend.sign_in("a@example.com", "Passw0rd").await.unwrap_err();
    assert_eq!(err.code, "auth/too-many-requests");
}

#[tokio::test]
async fn google_accounts_do_not_mix_with_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let backend = local_backend(dir.path()).await;
    backend.create_account("a@example.com", "Passw0rd").await.unwrap();

    let err = backend
        .sign_in_with_google(&GoogleCredential {
            email: "a@example.com".to_string(),
            display_name: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, "auth/account-exists-with-different-credential");

    let credential = GoogleCredential {
        email: "g@example.com".to_string(),
        display_name: Some("Gulnar".to_string()),
    };
    let first = backend.sign_in_with_google(&credential).await.unwrap();
    let second = backend.sign_in_with_google(&credential).await.unwrap();
    assert_eq!(first, second);

    let err = backend.sign_in("g@example.com", "anything").await.unwrap_err();
    assert_eq!(err.code, "auth/invalid-credential");
}

#[tokio::test]
async fn session_survives_reopen_until_sign_out() {
    let dir = tempfile::tempdir().unwrap();
    {
        let backend = local_backend(dir.path()).await;
        backend.create_account("a@example.com", "Passw0rd").await.unwrap();
    }

    let backend = local_backend(dir.path()).await;
    let current = backend.current_user().await.unwrap().unwrap();
    assert_eq!(current.email, "a@example.com");

    backend.sign_out().await.unwrap();
    let backend = local_backend(dir.path()).await;
    assert_eq!(backend.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn progress_counts_each_completed_lesson_once() {
    let dir = tempfile::tempdir().unwrap();
    let repo = LocalUserRepository::open(dir.path().join("users.json")).await.unwrap();
    let user = repo
        .create_user(NewUser {
            name: "Aynur".to_string(),
            username: "aynur".to_string(),
            email: "aynur@example.com".to_string(),
            is_guest: false,
        })
        .await
        .unwrap();
    assert_eq!(user.profile.level, "Beginner");
    assert_eq!(user.profile.lessons_completed, 0);

    let done = UnitProgress {
        lesson_completed: Some(true),
        ..UnitProgress::default()
    };
    repo.update_user_progress(&user.id, "basics", &done).await.unwrap();
    let after = repo.update_user_progress(&user.id, "basics", &done).await.unwrap();
    assert_eq!(after.profile.lessons_completed, 1);

    let quiz = UnitProgress {
        quiz_completed: Some(true),
        quiz_score: Some(85),
        ..UnitProgress::default()
    };
    let after = repo.update_user_progress(&user.id, "basics", &quiz).await.unwrap();
    let basics = &after.progress["basics"];
    assert_eq!(basics.lesson_completed, Some(true));
    assert_eq!(basics.quiz_score, Some(85));

    let missing = repo.update_user_progress("ghost", "basics", &done).await;
    assert!(matches!(missing, Err(crate::RepositoryError::NotFound)));
}

#[tokio::test]
async fn users_are_found_by_email_or_username() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    {
        let repo = LocalUserRepository::open(&path).await.unwrap();
        repo.create_user(NewUser {
            name: "Aynur".to_string(),
            username: "aynur".to_string(),
            email: "aynur@example.com".to_string(),
            is_guest: false,
        })
        .await
        .unwrap();
    }

    let repo = LocalUserRepository::open(&path).await.unwrap();
    assert!(repo.email_exists("Aynur@Example.com").await.unwrap());
    assert!(repo.username_exists("aynur").await.unwrap());
    assert!(!repo.username_exists("someone").await.unwrap());
    let found = repo.get_user_by_email_or_username("aynur").await.unwrap().unwrap();
    assert_eq!(found.email, "aynur@example.com");
}

fn block_writes(path: &std::path::Path) {
    std::fs::remove_file(path).unwrap();
    std::fs::create_dir_all(path).unwrap();
}

#[tokio::test]
async fn failed_sign_in_write_keeps_the_old_identity() {
    let dir = tempfile::tempdir().unwrap();
    let backend = local_backend(dir.path()).await;
    backend.create_account("a@example.com", "Passw0rd").await.unwrap();
    backend.sign_out().await.unwrap();

    block_writes(&dir.path().join("accounts.json"));

    assert!(backend.sign_in("a@example.com", "Passw0rd").await.is_err());
    assert_eq!(backend.current_user().await.unwrap(), None);

    assert!(backend.create_account("b@example.com", "Passw0rd").await.is_err());
    assert_eq!(
        backend.sign_in("b@example.com", "Passw0rd").await.unwrap_err().code,
        "auth/user-not-found"
    );
}

#[tokio::test]
async fn failed_document_write_is_not_visible() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let users = LocalUserRepository::open(&path).await.unwrap();
    let user = users
        .create_user(NewUser {
            name: "Aynur".to_string(),
            username: "aynur".to_string(),
            email: "aynur@example.com".to_string(),
            is_guest: false,
        })
        .await
        .unwrap();

    block_writes(&path);

    assert!(users.update_account(&user.id, "Ayn", "ayn").await.is_err());
    let stored = users.get_user_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "aynur");

    let created = users
        .create_user(NewUser {
            name: "Gulnar".to_string(),
            username: "gulnar".to_string(),
            email: "gulnar@example.com".to_string(),
            is_guest: false,
        })
        .await;
    assert!(created.is_err());
    assert_eq!(users.get_user_by_username("gulnar").await.unwrap(), None);
}
