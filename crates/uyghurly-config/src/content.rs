use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding a `units.json` manifest and unit files, replacing the embedded bundle
    pub bundle_dir: Option<String>,
    /// Seed for lesson exercise generation; a fixed default seed is used when unset
    pub seed: Option<u64>,
}
