//! Game configuration.
//!
//! A small TOML record:
//!
//! ```toml
//! api_key = "..."
//! narrative_model = "gemini-2.0-flash"
//! command_model = "gemini-2.0-flash"
//! saves_directory = "saves"
//! timeout_secs = 60
//! ```
//!
//! Missing keys take their defaults and unknown keys are ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the working and user config directories.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Credential value written into a fresh template.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Default model for both narrative and command generation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default bound on a single generation call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for a game run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Text service credential.
    pub api_key: String,
    /// Model used to generate narratives and hostnames.
    pub narrative_model: String,
    /// Model used to answer player commands.
    pub command_model: String,
    /// Where session records live. Relative paths resolve against the
    /// directory of the config file.
    pub saves_directory: PathBuf,
    /// Bound on a single generation call, in seconds.
    pub timeout_secs: u64,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            narrative_model: DEFAULT_MODEL.to_string(),
            command_model: DEFAULT_MODEL.to_string(),
            saves_directory: PathBuf::from("saves"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_dir: PathBuf::from("."),
        }
    }
}

impl GameConfig {
    /// Pick the config file: the explicit path, else `./config.toml`, else the
    /// user config directory, else `./config.toml` as the place to create it.
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        if let Some(user) = dirs::config_dir()
            .map(|d| d.join("terminal-mystery").join(CONFIG_FILE_NAME))
            .filter(|p| p.exists())
        {
            return user;
        }
        local
    }

    /// Load the config, requiring a usable credential.
    ///
    /// When the file does not exist a template with the placeholder key is
    /// written there first, so the player has something to edit.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            Self::write_template(path)?;
            return Err(ConfigError::NotConfigured {
                path: path.to_path_buf(),
            });
        }
        Self::read(path)?.require_credential(path)
    }

    /// Load the config without checking the credential. A missing file yields
    /// the defaults anchored at the file's directory.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default().anchored_at(path));
        }
        Self::read(path)
    }

    fn read(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            action: "reading",
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.anchored_at(path))
    }

    fn write_template(path: &Path) -> ConfigResult<()> {
        let template = Self::default().with_api_key(PLACEHOLDER_API_KEY);
        let text = toml::to_string_pretty(&template)?;
        let io_err = |source| ConfigError::Io {
            action: "writing",
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, text).map_err(io_err)?;
        tracing::info!(path = %path.display(), "wrote config template");
        Ok(())
    }

    fn anchored_at(mut self, path: &Path) -> Self {
        self.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        self
    }

    fn require_credential(self, path: &Path) -> ConfigResult<Self> {
        if self.is_configured() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                path: path.to_path_buf(),
            })
        }
    }

    /// Whether the credential is present and not the placeholder.
    pub fn is_configured(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_API_KEY
    }

    /// Resolved saves directory.
    pub fn saves_path(&self) -> PathBuf {
        if self.saves_directory.is_absolute() {
            self.saves_directory.clone()
        } else {
            self.base_dir.join(&self.saves_directory)
        }
    }

    /// Generation timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Set the credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the saves directory.
    pub fn with_saves_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.saves_directory = dir.into();
        self
    }

    /// Set the generation timeout (at least one second).
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.narrative_model, "gemini-2.0-flash");
        assert_eq!(cfg.command_model, "gemini-2.0-flash");
        assert_eq!(cfg.timeout(), Duration::from_secs(60));
        assert!(!cfg.is_configured());
    }

    #[test]
    fn missing_file_writes_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let err = GameConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { .. }));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(PLACEHOLDER_API_KEY));

        // placeholder still blocks startup
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn partial_file_takes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\nfuture_option = true\n").unwrap();

        let cfg = GameConfig::load(&path).unwrap();
        assert_eq!(cfg.api_key, "abc");
        assert_eq!(cfg.command_model, DEFAULT_MODEL);
        assert_eq!(cfg.saves_path(), dir.path().join("saves"));
    }

    #[test]
    fn blank_key_is_not_configured() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"   \"\n").unwrap();
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::NotConfigured { .. })
        ));
        // still usable for offline commands
        assert!(GameConfig::load_or_default(&path).is_ok());
    }

    #[test]
    fn invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();
        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_or_default_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = GameConfig::load_or_default(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(cfg.saves_path(), dir.path().join("saves"));
    }

    #[test]
    fn absolute_saves_directory() {
        let dir = TempDir::new().unwrap();
        let cfg = GameConfig::default().with_saves_directory(dir.path());
        assert_eq!(cfg.saves_path(), dir.path());
    }

    #[test]
    fn builder_methods() {
        let cfg = GameConfig::default().with_api_key("k").with_timeout(0);
        assert!(cfg.is_configured());
        assert_eq!(cfg.timeout_secs, 1);
    }
}
