use std::env;

use serde::{Deserialize, Serialize};

use self::account::AccountConfig;
use self::content::ContentConfig;
use self::log::{LogConfig, LogFormat};
use self::quiz::QuizConfig;
use self::storage::StorageConfig;

pub mod account;
pub mod content;
pub mod log;
pub mod quiz;
pub mod storage;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    #[default]
    Web,
    /// Static export for the mobile shell, no account backend
    Ios,
}

impl BuildTarget {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ios" => BuildTarget::Ios,
            _ => BuildTarget::Web,
        }
    }

    pub fn is_static_export(&self) -> bool {
        matches!(self, BuildTarget::Ios)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub build_target: BuildTarget,
    pub content: ContentConfig,
    pub storage: StorageConfig,
    pub quiz: QuizConfig,
    pub account: AccountConfig,
    pub log: LogConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables win over file and default values
    pub fn apply_env(&mut self) {
        if let Ok(target) = env::var("BUILD_TARGET") {
            self.build_target = BuildTarget::from_str(&target);
        }

        if let Ok(dir) = env::var("UYGHURLY_DATA_DIR") {
            self.storage.data_dir = dir;
        }

        if let Ok(dir) = env::var("UYGHURLY_CONTENT_DIR") {
            self.content.bundle_dir = Some(dir);
        }

        if let Some(seed) = env::var("QUIZ_SEED").ok().and_then(|v| v.parse().ok()) {
            self.quiz.seed = Some(seed);
            self.content.seed = Some(seed);
        }

        if let Some(capacity) = env::var("QUIZ_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.quiz.cache_capacity = capacity;
        }

        if let Ok(emails) = env::var("ADMIN_EMAILS") {
            self.account.admin_emails = emails
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
        }

        if let Some(format) = env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| LogFormat::from_str(&v))
        {
            self.log.format = format;
        }
    }

    /// Account backends are only reachable outside the static export
    pub fn accounts_available(&self) -> bool {
        self.account.enabled && !self.build_target.is_static_export()
    }
}
