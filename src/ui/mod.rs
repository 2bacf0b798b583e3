//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All output goes through this module so that `--quiet` and `--debug` are
//! honored in one place.

pub mod output;
