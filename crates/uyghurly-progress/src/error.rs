use uyghurly_account::AuthError;
use uyghurly_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Malformed progress record '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Account(#[from] AuthError),

    #[error("Admin access required")]
    NotAdmin,
}

impl From<StoreError> for ProgressError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt { key, source } => ProgressError::Corrupt { key, source },
            other => ProgressError::Store(other),
        }
    }
}
