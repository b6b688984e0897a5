use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    env::var("UYGHURLY_DATA_DIR").unwrap_or_else(|_| ".uyghurly".to_string())
}

fn default_local_store() -> String {
    "local_storage.json".to_string()
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Key-value file standing in for the browser's local storage
    #[serde(default = "default_local_store")]
    pub local_store: String,
    /// `users` collection
    #[serde(default = "default_users_file")]
    pub users_file: String,
    /// Credentials of the local auth backend
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            local_store: default_local_store(),
            users_file: default_users_file(),
            accounts_file: default_accounts_file(),
        }
    }
}

impl StorageConfig {
    pub fn local_store_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.local_store)
    }

    pub fn users_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.users_file)
    }

    pub fn accounts_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.accounts_file)
    }
}
