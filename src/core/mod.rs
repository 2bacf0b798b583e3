//! core
//!
//! Domain types, configuration, the commit message source and the
//! repository lock.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid, RefName, RefSpec
//! - [`config`] - JSON configuration schema and lazy loading
//! - [`message`] - The pending commit message log
//! - [`lock`] - Exclusive repository lock for mutating commands

pub mod config;
pub mod lock;
pub mod message;
pub mod types;
