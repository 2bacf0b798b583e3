//! core::message
//!
//! The pending commit message.
//!
//! The message lives in a log file the operator edits between pushes. It is
//! read once per invocation (see [`crate::engine::session::Session`]) and
//! used both for new commits and to decide whether an amend still has
//! something to say.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading the commit message log.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The log file does not exist.
    #[error("log file: {} not found!", path.display())]
    NotFound { path: PathBuf },

    /// The log file exists but could not be read.
    #[error("failed to read log file '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The log file holds nothing but whitespace.
    #[error("log file '{}' is empty", path.display())]
    Empty { path: PathBuf },
}

/// A commit message read from the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    text: String,
}

impl CommitMessage {
    /// Read the message from `path`.
    ///
    /// # Errors
    ///
    /// - [`MessageError::NotFound`] if the file is absent
    /// - [`MessageError::Empty`] if it contains only whitespace
    pub fn load(path: &Path) -> Result<Self, MessageError> {
        if !path.is_file() {
            return Err(MessageError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let text = fs::read_to_string(path).map_err(|e| MessageError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        if text.trim().is_empty() {
            return Err(MessageError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { text })
    }

    /// Build a message from text already in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The full message, as written in the log file.
    pub fn full(&self) -> &str {
        &self.text
    }

    /// The first line of the message.
    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }

    /// Whether `other` (typically the tip commit's message) says something
    /// different, ignoring surrounding whitespace.
    pub fn differs_from(&self, other: &str) -> bool {
        self.text.trim() != other.trim()
    }
}
