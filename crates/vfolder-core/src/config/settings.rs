//! Application configuration loaded from a TOML file.
//!
//! Every field has a default, so vfolder works without a config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Top-level application configuration.
///
/// Call [`Config::load`] to read from a TOML path, or
/// [`Config::load_or_default`] when the file is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub icons: IconConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> CoreResult<Self> {
        match Self::load(path) {
            Err(CoreError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }
}

/// Where the tree document lives and how it is bootstrapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Relative paths resolve against the working directory at startup.
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    /// Label of the root directory written into a freshly created document.
    #[serde(default = "default_root_name")]
    pub root_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            create_if_missing: true,
            root_name: default_root_name(),
        }
    }
}

/// Icon resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconConfig {
    #[serde(default = "default_true")]
    pub large: bool,
    /// Path handed to the resolver for the shared directory icon.
    #[serde(default)]
    pub directory_placeholder: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            large: true,
            directory_placeholder: String::new(),
        }
    }
}

/// Logging output settings, consumed by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_document_path() -> PathBuf {
    PathBuf::from("Data.xml")
}

fn default_root_name() -> String {
    "Root".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_store() {
        let config = Config::default();

        assert_eq!(config.store.document_path, PathBuf::from("Data.xml"));
        assert!(config.store.create_if_missing);
        assert_eq!(config.store.root_name, "Root");
    }

    #[test]
    fn default_config_icons_and_log() {
        let config = Config::default();

        assert!(config.icons.large);
        assert!(config.icons.directory_placeholder.is_empty());
        assert_eq!(config.log.level, "info");
        assert!(config.log.file.is_none());
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vfolder.toml");
        fs::write(
            &path,
            r#"
[store]
document_path = "/var/lib/vfolder/tree.xml"
create_if_missing = false
root_name = "Desk"

[icons]
large = false
directory_placeholder = "/"

[log]
level = "debug"
file = "/tmp/vfolder-test.log"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(
            config.store.document_path,
            PathBuf::from("/var/lib/vfolder/tree.xml")
        );
        assert!(!config.store.create_if_missing);
        assert_eq!(config.store.root_name, "Desk");
        assert!(!config.icons.large);
        assert_eq!(config.icons.directory_placeholder, "/");
        assert_eq!(config.log.level, "debug");
        assert_eq!(
            config.log.file,
            Some(PathBuf::from("/tmp/vfolder-test.log"))
        );
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vfolder.toml");
        fs::write(
            &path,
            r#"
[store]
root_name = "Projects"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.store.root_name, "Projects");
        assert_eq!(config.store.document_path, PathBuf::from("Data.xml"));
        assert!(config.store.create_if_missing);
        assert!(config.icons.large);
    }

    #[test]
    fn load_empty_toml_uses_all_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vfolder.toml");
        fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        let default = Config::default();

        assert_eq!(config.store.document_path, default.store.document_path);
        assert_eq!(config.log.level, default.log.level);
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config.store.root_name, "Root");
    }

    #[test]
    fn load_or_default_still_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vfolder.toml");
        fs::write(&path, "this is not valid [[[toml").unwrap();

        let result = Config::load_or_default(&path);
        assert!(matches!(result.unwrap_err(), CoreError::ConfigParse(_)));
    }
}
