//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Regular output goes to stdout and respects the quiet flag. Warnings,
//! errors and debug lines go to stderr so that stdout stays clean for the
//! command's own results.

use std::fmt::Display;

/// How much a command prints, from `--quiet` and `--debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Nothing but errors.
    Quiet,
    Normal,
    /// Normal output plus `[debug]` lines on stderr.
    Debug,
}

impl Verbosity {
    /// `quiet` wins when both flags are given.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }

    pub fn is_debug(self) -> bool {
        self == Verbosity::Debug
    }

    fn is_quiet(self) -> bool {
        self == Verbosity::Quiet
    }
}

/// A result line on stdout.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("{message}");
    }
}

/// Same stream as [`print`]; used for the line that reports a completed step.
pub fn success(message: impl Display, verbosity: Verbosity) {
    print(message, verbosity);
}

pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity.is_debug() {
        eprintln!("[debug] {message}");
    }
}

pub fn warn(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        eprintln!("warning: {message}");
    }
}

/// Errors are printed even in quiet mode.
pub fn error(message: impl Display) {
    eprintln!("error: {message}");
}
