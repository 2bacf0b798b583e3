//! core::types
//!
//! Strong types for the values that flow between the workflow engines and
//! the VCS backend.
//!
//! # Types
//!
//! - [`BranchName`] - Validated Git branch name
//! - [`Oid`] - Git object identifier (SHA)
//! - [`RefName`] - Validated Git reference name
//! - [`RefSpec`] - Source/destination mapping used for push, fetch and delete
//!
//! # Examples
//!
//! ```
//! use scmapp::core::types::{BranchName, RefName, RefSpec};
//!
//! let branch = BranchName::new("feature/login").unwrap();
//! let refname = RefName::for_branch(&branch);
//! assert_eq!(refname.as_str(), "refs/heads/feature/login");
//!
//! let spec = RefSpec::push(&refname, true);
//! assert_eq!(spec.to_string(), "+refs/heads/feature/login:refs/heads/feature/login");
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hex digits shown for a short commit id.
pub const SHORT_ID_LEN: usize = 9;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),
}

/// Implements the string plumbing shared by every validated name: `as_str`,
/// `Display`, `AsRef<str>`, and the `String` conversions serde goes through.
macro_rules! validated_string {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = TypeError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// Whole-name rules from `git check-ref-format`, first match wins.
const NAME_RULES: &[(fn(&str) -> bool, &str)] = &[
    (|n| n.is_empty(), "cannot be empty"),
    (|n| n.ends_with('/'), "cannot end with '/'"),
    (|n| n.ends_with(".lock"), "cannot end with '.lock'"),
    (|n| n.contains(".."), "cannot contain '..'"),
    (|n| n.contains("@{"), "cannot contain '@{'"),
    (|n| n.contains("//"), "cannot contain '//'"),
    (
        |n| n.contains([' ', '~', '^', ':', '\\', '?', '*', '[']),
        "cannot contain ' ', '~', '^', ':', '\\', '?', '*' or '['",
    ),
    (
        |n| n.chars().any(|c| c.is_ascii_control()),
        "cannot contain control characters",
    ),
];

/// First refname rule `name` breaks, if any.
fn refname_violation(name: &str) -> Option<&'static str> {
    if let Some((_, reason)) = NAME_RULES.iter().find(|(breaks, _)| breaks(name)) {
        return Some(*reason);
    }
    name.split('/').find_map(|component| {
        if component.starts_with('.') {
            Some("path component cannot start with '.'")
        } else if component.ends_with(".lock") {
            Some("path component cannot end with '.lock'")
        } else {
            None
        }
    })
}

/// A branch name as the operator types it (`dev`, `feature/login`).
///
/// On top of the refname rules, a branch cannot start with `-` (it would
/// parse as a flag) and cannot be the bare `@` shorthand.
///
/// ```
/// use scmapp::core::types::BranchName;
///
/// assert_eq!(BranchName::new("dev").unwrap().as_str(), "dev");
/// assert!(BranchName::new("-flag").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let reason = match name.as_str() {
            "@" => Some("cannot be '@' (reserved)"),
            n if n.starts_with('-') => Some("cannot start with '-'"),
            n => refname_violation(n),
        };
        match reason {
            Some(reason) => Err(TypeError::InvalidBranchName(format!(
                "branch name {reason}"
            ))),
            None => Ok(Self(name)),
        }
    }
}

validated_string!(BranchName);

/// A commit or object id, stored as lowercase hex (40 or 64 digits).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let mut oid = oid.into();
        oid.make_ascii_lowercase();
        match oid.len() {
            40 | 64 if oid.bytes().all(|b| b.is_ascii_hexdigit()) => Ok(Self(oid)),
            40 | 64 => Err(TypeError::InvalidOid(format!("{oid} is not hexadecimal"))),
            n => Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex digits, got {n}"
            ))),
        }
    }

    /// At most `len` leading digits.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }

    /// The abbreviation printed after commits, pushes and pulls.
    pub fn short_id(&self) -> &str {
        self.short(SHORT_ID_LEN)
    }
}

validated_string!(Oid);

/// A full reference name such as `refs/heads/dev`.
///
/// ```
/// use scmapp::core::types::{BranchName, RefName};
///
/// let dev = BranchName::new("dev").unwrap();
/// assert_eq!(
///     RefName::for_remote_tracking("upstream", &dev).as_str(),
///     "refs/remotes/upstream/dev"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

const HEADS: &str = "refs/heads/";

impl RefName {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let reason = if name.starts_with('/') {
            Some("cannot start with '/'")
        } else {
            refname_violation(&name)
        };
        match reason {
            Some(reason) => Err(TypeError::InvalidRefName(format!("ref name {reason}"))),
            None => Ok(Self(name)),
        }
    }

    /// `refs/heads/<branch>`.
    pub fn for_branch(branch: &BranchName) -> Self {
        Self(format!("{HEADS}{branch}"))
    }

    /// `refs/remotes/<remote>/<branch>`; `remote` is a plain remote name.
    pub fn for_remote_tracking(remote: &str, branch: &BranchName) -> Self {
        Self(format!("refs/remotes/{remote}/{branch}"))
    }

    pub fn strip_prefix(&self, prefix: &str) -> Option<&str> {
        self.0.strip_prefix(prefix)
    }

    pub fn is_branch_ref(&self) -> bool {
        self.0.starts_with(HEADS)
    }
}

validated_string!(RefName);

/// A refspec: how a source ref updates a destination ref.
///
/// An absent source means "delete the destination" and is only meaningful
/// for push. The force marker (`+`) allows non-fast-forward updates.
///
/// # Example
///
/// ```
/// use scmapp::core::types::{RefName, RefSpec};
///
/// let head = RefName::new("refs/heads/old").unwrap();
///
/// assert_eq!(RefSpec::push(&head, false).to_string(), "refs/heads/old:refs/heads/old");
/// assert_eq!(RefSpec::delete(&head).to_string(), ":refs/heads/old");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSpec {
    source: Option<RefName>,
    destination: RefName,
    force: bool,
}

impl RefSpec {
    /// Push `refname` to the same name on the remote.
    pub fn push(refname: &RefName, force: bool) -> Self {
        Self {
            source: Some(refname.clone()),
            destination: refname.clone(),
            force,
        }
    }

    /// Delete `refname` on the remote.
    pub fn delete(refname: &RefName) -> Self {
        Self {
            source: None,
            destination: refname.clone(),
            force: false,
        }
    }

    /// Fetch `source` from the remote into the local `destination`.
    pub fn fetch(source: &RefName, destination: &RefName) -> Self {
        Self {
            source: Some(source.clone()),
            destination: destination.clone(),
            force: false,
        }
    }

    /// The source ref, `None` for a delete refspec.
    pub fn source(&self) -> Option<&RefName> {
        self.source.as_ref()
    }

    /// The destination ref.
    pub fn destination(&self) -> &RefName {
        &self.destination
    }

    /// Whether the refspec carries the `+` force marker.
    pub fn is_forced(&self) -> bool {
        self.force
    }

    /// Whether this refspec deletes its destination.
    pub fn is_delete(&self) -> bool {
        self.source.is_none()
    }
}

impl fmt::Display for RefSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.force {
            write!(f, "+")?;
        }
        match &self.source {
            Some(source) => write!(f, "{}:{}", source, self.destination),
            None => write!(f, ":{}", self.destination),
        }
    }
}
