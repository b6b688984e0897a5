use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use uyghurly_account::{AccountService, LocalAuthBackend, LocalUserRepository};
use uyghurly_config::Config;
use uyghurly_core::storage::{FileStore, KeyValueStore};
use uyghurly_lang_uyghur::LessonCatalog;
use uyghurly_progress::ProgressService;
use uyghurly_quiz::{QuizCache, QuizGenerator};

/// Everything a command needs, wired from the loaded configuration
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub catalog: Arc<LessonCatalog>,
    pub quizzes: QuizCache,
    pub accounts: Arc<AccountService>,
    pub progress: ProgressService,
}

impl AppState {
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        let catalog = match &config.content.bundle_dir {
            Some(dir) => LessonCatalog::from_dir(Path::new(dir), config.content.seed)
                .with_context(|| format!("loading content from {dir}"))?,
            None => LessonCatalog::embedded(config.content.seed)
                .context("loading embedded content")?,
        };
        let catalog = Arc::new(catalog);
        tracing::info!(
            "Loaded {} lessons in {} units",
            catalog.get_all_lessons().len(),
            catalog.units().len()
        );

        let store_path = config.storage.local_store_path();
        let store: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::open(&store_path)
                .with_context(|| format!("opening local store {}", store_path.display()))?,
        );

        let accounts = if config.accounts_available() {
            let auth = LocalAuthBackend::open(config.storage.accounts_path())
                .await
                .context("opening accounts")?;
            let users = LocalUserRepository::open(config.storage.users_path())
                .await
                .context("opening users collection")?;
            AccountService::new(
                Some(Arc::new(auth)),
                Some(Arc::new(users)),
                store.clone(),
                config.account.clone(),
            )
        } else {
            tracing::info!("Accounts unavailable for {:?} build", config.build_target);
            AccountService::offline(store.clone(), config.account.clone())
        };
        let accounts = Arc::new(accounts);

        if let Some(user) = accounts.restore_session().await {
            tracing::debug!("Restored session for {}", user.username);
        }

        let generator = QuizGenerator::new(catalog.clone(), config.quiz.clone());
        let quizzes = QuizCache::new(generator, config.quiz.cache_capacity);
        let progress = ProgressService::new(store.clone(), accounts.clone(), catalog.clone());

        Ok(Self {
            config,
            store,
            catalog,
            quizzes,
            accounts,
            progress,
        })
    }
}
