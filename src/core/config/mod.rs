//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! The configuration is a single JSON file, searched in order:
//! 1. The path given with `--config-file-path` (must exist)
//! 2. `$SCM_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/scm/config.json`
//! 4. `~/.scm/config.json`
//!
//! When no file is found, defaults are used.
//!
//! # Lazy loading
//!
//! Most commands never need the configuration (e.g. `set-url`), so it is
//! wrapped in a [`LazyConfig`] that reads the file on the first
//! [`LazyConfig::ensure_loaded`] call and caches it for the rest of the
//! invocation.
//!
//! # Example
//!
//! ```no_run
//! use scmapp::core::config::{ConfigSource, LazyConfig};
//!
//! let mut config = LazyConfig::new(ConfigSource::Discover);
//! let loaded = config.ensure_loaded().unwrap();
//! println!("default branch: {}", loaded.default_branch());
//! ```

pub mod schema;

pub use schema::{CredentialsConfig, ScmConfig, StageRedirect};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::BranchName;
use crate::git::RepoInfo;

/// Branch created for the first commit of an empty repository.
pub const DEFAULT_BRANCH: &str = "dev";

/// Primary branch of the `upstream` remote.
pub const DEFAULT_UPSTREAM_BRANCH: &str = "main";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config file '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Where to look for the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// An explicit file; it is an error if it does not exist.
    Explicit(PathBuf),
    /// Search the default locations.
    Discover,
}

impl ConfigSource {
    /// Build a source from an optional `--config-file-path` flag.
    pub fn from_flag(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => ConfigSource::Explicit(path),
            None => ConfigSource::Discover,
        }
    }
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: ScmConfig,
    /// Path the file was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or if a file exists
    /// but cannot be parsed or fails validation.
    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        let path = match source {
            ConfigSource::Explicit(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound { path: path.clone() });
                }
                Some(path.clone())
            }
            ConfigSource::Discover => Self::discover(),
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let file = Self::read_config(&path)?;
        file.validate()?;

        Ok(Config {
            file,
            path: Some(path),
        })
    }

    /// Wrap an in-memory schema, as if it had been loaded from disk.
    pub fn from_file(file: ScmConfig) -> Self {
        Config { file, path: None }
    }

    /// Find the first existing file in the default locations.
    fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SCM_CONFIG") {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("scm/config.json");
            if path.is_file() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".scm/config.json"))
            .filter(|path| path.is_file())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ScmConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Path of the commit message log for the repository described by `repo`.
    ///
    /// Defaults to `<git_dir>/scm/commit-message.txt`, which keeps the log
    /// out of the work tree (and out of `push all`).
    pub fn commit_message_path(&self, repo: &RepoInfo) -> PathBuf {
        match &self.file.commit_message_file {
            Some(path) => {
                let path = expand_home(path);
                if path.is_absolute() {
                    path
                } else {
                    repo.work_dir.join(path)
                }
            }
            None => repo.git_dir.join("scm").join("commit-message.txt"),
        }
    }

    /// Branch created for the first commit of an empty repository.
    pub fn default_branch(&self) -> BranchName {
        self.validated_branch(self.file.default_branch.as_deref(), DEFAULT_BRANCH)
    }

    /// Primary branch pulled from `upstream`.
    pub fn upstream_branch(&self) -> BranchName {
        self.validated_branch(self.file.upstream_branch.as_deref(), DEFAULT_UPSTREAM_BRANCH)
    }

    fn validated_branch(&self, configured: Option<&str>, fallback: &str) -> BranchName {
        configured
            .and_then(|name| BranchName::new(name).ok())
            .or_else(|| BranchName::new(fallback).ok())
            .unwrap_or_else(|| unreachable!("built-in branch names are valid"))
    }

    /// Configured credentials (may be empty).
    pub fn credentials(&self) -> CredentialsConfig {
        self.file.credentials.clone().unwrap_or_default()
    }

    /// Redirect rules for single-file staging.
    pub fn stage_redirects(&self) -> &[StageRedirect] {
        &self.file.stage_redirects
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Configuration that is read on first use.
#[derive(Debug)]
pub struct LazyConfig {
    source: ConfigSource,
    loaded: Option<Config>,
}

impl LazyConfig {
    /// Create an unloaded handle.
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            loaded: None,
        }
    }

    /// Wrap a configuration that is already in memory.
    pub fn preloaded(config: Config) -> Self {
        Self {
            source: ConfigSource::Discover,
            loaded: Some(config),
        }
    }

    /// Whether the configuration has been read.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Load the configuration if needed and return it.
    ///
    /// Idempotent: the file is read at most once.
    pub fn ensure_loaded(&mut self) -> Result<&Config, ConfigError> {
        if self.loaded.is_none() {
            self.loaded = Some(Config::load(&self.source)?);
        }
        Ok(self.loaded.get_or_insert_with(Config::default))
    }
}
