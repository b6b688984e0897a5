mod practice_tests;

use std::path::Path;
use std::sync::Arc;

use uyghurly_config::Config;

use crate::state::AppState;

fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = dir.to_string_lossy().into_owned();
    config.content.seed = Some(11);
    config.quiz.seed = Some(11);
    config
}

async fn test_state(dir: &Path) -> Arc<AppState> {
    Arc::new(AppState::init(test_config(dir)).await.unwrap())
}
