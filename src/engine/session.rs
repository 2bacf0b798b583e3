//! engine::session
//!
//! Per-invocation state shared by the engines.
//!
//! The configuration, the pending commit message and the push/fetch
//! credentials are all external resources that most commands never touch.
//! A [`Session`] starts with none of them loaded; each accessor loads its
//! resource on first use and caches it for the rest of the invocation.

use crate::core::config::{Config, ConfigError, ConfigSource, LazyConfig};
use crate::core::message::CommitMessage;
use crate::git::{Credentials, TransportOptions, VcsBackend};
use crate::ui::output::{self, Verbosity};

use super::{Context, WorkflowError};

/// Environment variable that overrides the configured token.
pub const TOKEN_ENV: &str = "SCM_TOKEN";

/// Lazily-loaded resources for one command invocation.
#[derive(Debug)]
pub struct Session {
    config: LazyConfig,
    message: Option<CommitMessage>,
    credentials: Option<Credentials>,
    verbosity: Verbosity,
    interactive: bool,
}

impl Session {
    /// Create a session with nothing loaded yet.
    pub fn new(config: LazyConfig, verbosity: Verbosity, interactive: bool) -> Self {
        Self {
            config,
            message: None,
            credentials: None,
            verbosity,
            interactive,
        }
    }

    /// Create a session from the global CLI context.
    pub fn from_context(ctx: &Context) -> Self {
        let source = ConfigSource::from_flag(ctx.config_path.clone());
        Self::new(LazyConfig::new(source), ctx.verbosity(), ctx.interactive)
    }

    /// Use `message` instead of reading the log file.
    pub fn with_commit_message(mut self, message: CommitMessage) -> Self {
        self.message = Some(message);
        self
    }

    /// Use `credentials` instead of resolving them from config and environment.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Output verbosity for engine logging.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether prompting is allowed.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// The configuration, loaded on first call.
    pub fn config(&mut self) -> Result<&Config, ConfigError> {
        self.config.ensure_loaded()
    }

    /// The pending commit message, read on first call.
    ///
    /// # Errors
    ///
    /// A missing log file is a precondition failure for the whole workflow.
    pub fn commit_message(
        &mut self,
        backend: &dyn VcsBackend,
    ) -> Result<&CommitMessage, WorkflowError> {
        let message = match self.message.take() {
            Some(message) => message,
            None => {
                let repo = backend.repo_info()?;
                let path = self.config()?.commit_message_path(&repo);
                output::debug(
                    format!("reading commit message from {}", path.display()),
                    self.verbosity,
                );
                CommitMessage::load(&path)?
            }
        };
        Ok(self.message.insert(message))
    }

    /// Credentials for push and fetch, resolved on first call.
    ///
    /// The token comes from `$SCM_TOKEN`, then the config file, then an
    /// interactive prompt if a user name is configured without one.
    pub fn credentials(&mut self) -> Result<Credentials, WorkflowError> {
        if let Some(credentials) = &self.credentials {
            return Ok(credentials.clone());
        }

        let configured = self.config()?.credentials();
        let mut credentials = Credentials {
            username: configured.username,
            token: configured.token,
        };

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                output::debug(format!("using token from ${}", TOKEN_ENV), self.verbosity);
                credentials.token = Some(token);
            }
        }

        if let (Some(username), None, true) =
            (&credentials.username, &credentials.token, self.interactive)
        {
            let prompt = format!("token for {}: ", username);
            let token = rpassword::prompt_password(prompt)
                .map_err(|e| WorkflowError::Credentials(e.to_string()))?;
            if !token.is_empty() {
                credentials.token = Some(token);
            }
        }

        self.credentials = Some(credentials.clone());
        Ok(credentials)
    }

    /// Options for a push or fetch.
    pub fn transport(&mut self) -> Result<TransportOptions, WorkflowError> {
        Ok(TransportOptions {
            credentials: self.credentials()?,
            verbosity: self.verbosity,
        })
    }
}
