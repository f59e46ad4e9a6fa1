//! YAML application configuration.
//!
//! The configuration is an ordinary command-line value: `--config FILE`
//! parses a file through [`FromText`], and the same loader reads the default
//! location at startup.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use cmdtree_core::{BoxError, EnvSource, FromText};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the user's configuration directory.
pub const CONFIG_FILE_NAME: &str = "cmdtree-example.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Named profiles; their settings are kept as raw YAML.
    #[serde(default)]
    pub profiles: BTreeMap<String, serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_profile: Option<String>,
}

/// A configuration together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfigFile {
    pub path: PathBuf,
    pub config: AppConfig,
}

impl AppConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), profiles = config.profiles.len(), "loaded config");
        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }
}

impl FromText for AppConfigFile {
    fn from_text(text: &str) -> Result<Self, BoxError> {
        Ok(Self::load(Path::new(text))?)
    }
}

/// `$XDG_CONFIG_HOME/cmdtree-example.yaml`, falling back to `$HOME/.config`.
pub fn default_path(env: &EnvSource) -> Option<PathBuf> {
    let dir = env
        .var("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env.var("HOME")
                .filter(|home| !home.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(dir.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from the default location.
///
/// A missing file is not an error; a file that exists but cannot be read or
/// parsed is.
pub fn load_default(env: &EnvSource) -> Result<Option<AppConfigFile>, ConfigError> {
    match default_path(env) {
        Some(path) if path.is_file() => AppConfigFile::load(&path).map(Some),
        Some(path) => {
            debug!(path = %path.display(), "no default config");
            Ok(None)
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_default_path_prefers_xdg() {
        let env = EnvSource::from_pairs([("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/me")]);
        assert_eq!(default_path(&env), Some(PathBuf::from("/xdg/cmdtree-example.yaml")));

        let env = EnvSource::from_pairs([("XDG_CONFIG_HOME", ""), ("HOME", "/home/me")]);
        assert_eq!(
            default_path(&env),
            Some(PathBuf::from("/home/me/.config/cmdtree-example.yaml"))
        );

        assert_eq!(default_path(&EnvSource::from_pairs(Vec::<(String, String)>::new())), None);
    }

    #[test]
    fn test_load_default_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let env = EnvSource::from_pairs([("XDG_CONFIG_HOME", dir.path().to_str().unwrap())]);
        assert!(load_default(&env).unwrap().is_none());
    }

    #[test]
    fn test_load_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "profiles:\n  work:\n    region: eu\n  home: {}\nactiveProfile: work\n",
        )
        .unwrap();

        let env = EnvSource::from_pairs([("XDG_CONFIG_HOME", dir.path().to_str().unwrap())]);
        let loaded = load_default(&env).unwrap().unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(
            loaded.config.profiles.keys().collect::<Vec<_>>(),
            vec!["home", "work"]
        );
        assert_eq!(loaded.config.active_profile.as_deref(), Some("work"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "profiles: [unclosed").unwrap();
        assert!(matches!(
            AppConfigFile::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_from_text_reports_missing_file() {
        let err = AppConfigFile::from_text("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
