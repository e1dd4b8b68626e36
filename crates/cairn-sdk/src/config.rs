//! Repository configuration, stored as TOML at `<gitdir>/config`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// The only on-disk layout this crate understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 0;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Spelled the way git spells it; git config keys carry no underscores.
    #[serde(rename = "repositoryformatversion", default)]
    pub repository_format_version: u32,
    #[serde(default)]
    pub filemode: bool,
    #[serde(default)]
    pub bare: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            repository_format_version: SUPPORTED_FORMAT_VERSION,
            filemode: false,
            bare: false,
        }
    }
}

/// Identity used for tags created through this repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

impl RepoConfig {
    /// Load and validate a config file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| SdkError::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> SdkResult<()> {
        let text = toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> SdkResult<()> {
        match self.core.repository_format_version {
            SUPPORTED_FORMAT_VERSION => Ok(()),
            other => Err(SdkError::UnsupportedFormatVersion(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config() {
        let c = RepoConfig::default();
        assert_eq!(c.core.repository_format_version, 0);
        assert!(!c.core.filemode);
        assert!(!c.core.bare);
        assert!(c.user.is_none());
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        let config = RepoConfig {
            user: Some(UserConfig {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            }),
            ..RepoConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(RepoConfig::from_toml_file(&path).unwrap(), config);
    }

    #[test]
    fn default_serializes_core_section() {
        let text = toml::to_string(&RepoConfig::default()).unwrap();
        assert!(text.contains("[core]"));
        assert!(text.contains("repositoryformatversion = 0"));
        assert!(!text.contains("[user]"));
    }

    #[test]
    fn rejects_unknown_format_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[core]\nrepositoryformatversion = 1\n").unwrap();
        assert!(matches!(
            RepoConfig::from_toml_file(&path),
            Err(SdkError::UnsupportedFormatVersion(1))
        ));
    }

    #[test]
    fn loads_git_style_core_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(
            &path,
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = false\n\tbare = false\n\tlogallrefupdates = true\n",
        )
        .unwrap();
        let config = RepoConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.core, CoreConfig::default());
    }

    #[test]
    fn missing_format_version_defaults_to_supported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[core]\nbare = false\n").unwrap();
        let config = RepoConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.core.repository_format_version, SUPPORTED_FORMAT_VERSION);
    }

    #[test]
    fn rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[core\n").unwrap();
        assert!(matches!(
            RepoConfig::from_toml_file(&path),
            Err(SdkError::Config(_))
        ));
    }
}
