use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use uyghurly_config::Config;

pub const MAIN_PROFILE: &str = "main";

fn profiles_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("profiles")
}

fn profile_path(data_dir: &Path, name: &str) -> PathBuf {
    profiles_dir(data_dir).join(format!("{name}.json"))
}

/// Named configuration stored under `<data-dir>/profiles`
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("parsing profile {}", path.display()))?;
    Ok(profile.value)
}

/// Create the profiles folder and a main profile from defaults if missing
pub fn init_user_config(data_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(profiles_dir(data_dir))?;

    let main_profile = profile_path(data_dir, MAIN_PROFILE);
    if !main_profile.exists() {
        let profile = Profile {
            name: MAIN_PROFILE.into(),
            value: Config::default(),
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile in {}", data_dir.display());
    }

    Ok(())
}

/// Load a profile by name, falling back to main, then to defaults.
///
/// Environment overrides are applied on top of whatever was loaded.
pub fn load_user_profile(data_dir: &Path, name: &str) -> anyhow::Result<Config> {
    let mut config = resolve_profile(data_dir, name)?;
    config.apply_env();
    Ok(config)
}

/// Profile file contents only, without environment overrides
fn resolve_profile(data_dir: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profile_path(data_dir, name);
    let main_file = profile_path(data_dir, MAIN_PROFILE);

    let config = if profile_file.exists() {
        read_profile(&profile_file)?
    } else if main_file.exists() {
        tracing::warn!("Profile {name} not found, falling back to main profile");
        read_profile(&main_file)?
    } else {
        tracing::warn!("No profiles in {}, using defaults", data_dir.display());
        Config::default()
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use uyghurly_config::BuildTarget;

    use super::*;

    #[test]
    fn main_profile_is_created_once() {
        let dir = tempfile::tempdir().unwrap();
        init_user_config(dir.path()).unwrap();

        let path = profile_path(dir.path(), MAIN_PROFILE);
        fs::write(
            &path,
            r#"{"name": "main", "value": {"build_target": "ios", "quiz": {"lives": 5, "seed": 9}}}"#,
        )
        .unwrap();
        init_user_config(dir.path()).unwrap();

        let config = resolve_profile(dir.path(), MAIN_PROFILE).unwrap();
        assert_eq!(config.quiz.lives, 5);
        assert_eq!(config.quiz.seed, Some(9));
        assert_eq!(config.build_target, BuildTarget::Ios);
    }

    #[test]
    fn unknown_profile_falls_back_to_main() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(profiles_dir(dir.path())).unwrap();
        fs::write(
            profile_path(dir.path(), MAIN_PROFILE),
            r#"{"name": "main", "value": {"quiz": {"passing_score": 60}}}"#,
        )
        .unwrap();

        let config = resolve_profile(dir.path(), "travel").unwrap();
        assert_eq!(config.quiz.passing_score, 60);
    }

    #[test]
    fn missing_profiles_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_profile(dir.path(), MAIN_PROFILE).unwrap();
        assert_eq!(config.quiz.max_questions, 20);
        assert_eq!(config.quiz.lives, 3);
        assert_eq!(config.quiz.seed, None);
        assert_eq!(config.build_target, BuildTarget::Web);
    }

    #[test]
    fn malformed_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(profiles_dir(dir.path())).unwrap();
        fs::write(profile_path(dir.path(), MAIN_PROFILE), "{").unwrap();

        let err = load_user_profile(dir.path(), MAIN_PROFILE).unwrap_err();
        assert!(err.to_string().contains("parsing profile"));
    }
}
