use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Hr, Student};
use crate::store::FixtureStore;

pub const FIXTURES_ENV: &str = "KSTART_FIXTURES";
pub const STUDENT_ENV: &str = "KSTART_STUDENT";
pub const HR_ENV: &str = "KSTART_HR";
pub const LOG_ENV: &str = "KSTART_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON fixture file replacing the built-in sample data.
    pub fixtures: Option<PathBuf>,
    /// Student shown on the student dashboard. Defaults to the first one.
    pub student_id: Option<String>,
    /// HR user shown on the HR dashboard. Defaults to the first one.
    pub hr_id: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Reads the config file if it exists, then lets the environment
    /// override individual fields.
    pub fn load_from(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?
            }
            _ => Config::default(),
        };

        if let Some(fixtures) = env(FIXTURES_ENV) {
            config.fixtures = Some(PathBuf::from(fixtures));
        }
        if let Some(student_id) = env(STUDENT_ENV) {
            config.student_id = Some(student_id);
        }
        if let Some(hr_id) = env(HR_ENV) {
            config.hr_id = Some(hr_id);
        }

        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "kstart")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the dashboard writes its log while it owns the terminal.
    pub fn log_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "kstart") {
            proj_dirs.data_dir().join("kstart.log")
        } else {
            PathBuf::from("kstart.log")
        }
    }

    pub fn open_store(&self) -> Result<FixtureStore> {
        match &self.fixtures {
            Some(path) => FixtureStore::load(path),
            None => Ok(FixtureStore::seed()),
        }
    }

    pub fn current_student<'a>(&self, store: &'a FixtureStore) -> Option<&'a Student> {
        match &self.student_id {
            Some(id) => store.student(id),
            None => store.students().first(),
        }
    }

    pub fn current_hr<'a>(&self, store: &'a FixtureStore) -> Option<&'a Hr> {
        match &self.hr_id {
            Some(id) => store.hr(id),
            None => store.hr_users().first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&dir.path().join("config.json")), no_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_file_and_env_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"student_id": "s1", "hr_id": "hr1"}"#).unwrap();

        let env: HashMap<&str, &str> = [(STUDENT_ENV, "s2")].into_iter().collect();
        let config =
            Config::load_from(Some(&path), |key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.student_id.as_deref(), Some("s2"));
        assert_eq!(config.hr_id.as_deref(), Some("hr1"));
        assert_eq!(config.fixtures, None);
    }

    #[test]
    fn rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(Some(&path), no_env).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn current_users_default_to_first_and_miss_quietly() {
        let store = FixtureStore::seed();
        let config = Config::default();
        assert_eq!(config.current_student(&store).map(|s| s.id.as_str()), Some("s1"));
        assert_eq!(config.current_hr(&store).map(|h| h.id.as_str()), Some("hr1"));

        let config = Config {
            student_id: Some("s404".to_string()),
            ..Config::default()
        };
        assert!(config.current_student(&store).is_none());
    }

    #[test]
    fn fixtures_path_replaces_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        std::fs::write(&path, r#"{"companies": []}"#).unwrap();

        let config = Config {
            fixtures: Some(path),
            ..Config::default()
        };
        let store = config.open_store().unwrap();
        assert!(store.students().is_empty());
    }
}
