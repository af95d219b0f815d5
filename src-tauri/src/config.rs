use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub database_file: String,
    pub uploads_dir: String,
    /// Platforms seeded into every new address record.
    pub default_platforms: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from("."),
            database_file: "sublet.db".to_string(),
            uploads_dir: "uploads".to_string(),
            default_platforms: vec![
                "AirDNA".to_string(),
                "Airbnb Homes".to_string(),
                "Airbnb Haute".to_string(),
                "Airbnb Basse".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Reads `settings.json` from `data_dir` if present. A missing or
    /// unreadable file yields the defaults.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);

        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read settings file, using defaults");
                AppConfig::default()
            }
        };

        config.data_dir = data_dir.to_path_buf();
        config
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.data_dir.join(&self.uploads_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path());

        assert_eq!(config.database_path(), dir.path().join("sublet.db"));
        assert_eq!(config.uploads_path(), dir.path().join("uploads"));
        assert_eq!(config.default_platforms.len(), 4);
    }

    #[test]
    fn test_partial_settings_keep_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "default_platforms": ["Airbnb", "Booking"] }"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path());
        assert_eq!(config.default_platforms, vec!["Airbnb", "Booking"]);
        assert_eq!(config.database_file, "sublet.db");
    }

    #[test]
    fn test_malformed_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "not json").unwrap();

        let config = AppConfig::load(dir.path());
        assert_eq!(config.uploads_dir, "uploads");
        assert_eq!(config.data_dir, dir.path());
    }
}
