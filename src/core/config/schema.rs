//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```json
//! {
//!   "commit_message_file": "~/notes/next-commit.txt",
//!   "default_branch": "dev",
//!   "upstream_branch": "main",
//!   "credentials": { "username": "octocat", "token": "ghp_..." },
//!   "stage_redirects": [
//!     { "extension": "md", "directory": "input/posts" }
//!   ]
//! }
//! ```
//!
//! # Validation
//!
//! Config values are validated after parsing (branch names must be valid,
//! redirect rules must be relative and name an extension).

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// The JSON configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScmConfig {
    /// Path of the commit message log. Relative paths are resolved against
    /// the repository root.
    pub commit_message_file: Option<PathBuf>,

    /// Branch created when the first commit lands in an empty repository
    pub default_branch: Option<String>,

    /// Primary branch pulled from the `upstream` remote
    pub upstream_branch: Option<String>,

    /// Credentials for push and fetch
    pub credentials: Option<CredentialsConfig>,

    /// Path redirect rules for single-file staging
    pub stage_redirects: Vec<StageRedirect>,
}

impl ScmConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(branch) = &self.default_branch {
            BranchName::new(branch.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid default_branch: {}", e))
            })?;
        }

        if let Some(branch) = &self.upstream_branch {
            BranchName::new(branch.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid upstream_branch: {}", e))
            })?;
        }

        if let Some(path) = &self.commit_message_file {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "commit_message_file cannot be empty".to_string(),
                ));
            }
        }

        for rule in &self.stage_redirects {
            rule.validate()?;
        }

        Ok(())
    }
}

/// Credentials used by the push/fetch credential callback.
///
/// The token is never printed; `Debug` redacts it.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsConfig {
    /// User name for HTTPS remotes
    pub username: Option<String>,

    /// Personal access token or password
    pub token: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A single-file staging redirect.
///
/// When a path ending in `.<extension>` is staged, and `directory` exists in
/// the work tree, and the path is not already inside `directory`, the file
/// at `<directory>/<path>` is staged instead if it exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StageRedirect {
    /// File extension without the leading dot (e.g. `md`)
    pub extension: String,

    /// Work-tree relative directory (e.g. `input/posts`)
    pub directory: PathBuf,
}

impl StageRedirect {
    /// Validate the rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(ConfigError::InvalidValue(
                "stage redirect extension cannot be empty".to_string(),
            ));
        }

        let is_relative = self
            .directory
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if self.directory.as_os_str().is_empty() || !is_relative {
            return Err(ConfigError::InvalidValue(format!(
                "stage redirect directory must be a relative path inside the repository: {}",
                self.directory.display()
            )));
        }

        Ok(())
    }

    /// Whether `path` carries this rule's extension.
    pub fn matches_extension(&self, path: &Path) -> bool {
        let wanted = self.extension.trim_start_matches('.');
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted))
    }
}
