//! Shared error types.
//!
//! Follows the project's convention of hand-written enums with manual
//! `Display`/`Error` impls rather than a derive-macro crate — every error
//! here is small and its variants are named after what went wrong, not
//! wrapped library errors.

use std::fmt;

/// Failure connecting to or querying the observed server.
#[derive(Debug)]
pub enum DbError {
    /// TCP/auth-level connection failure.
    Connect(String),
    /// Query execution failed (bad SQL, permission, server busy).
    Query(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::Connect(msg) => write!(f, "{msg}"),
            DbError::Query(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DbError {}

/// Failure reading or parsing a `/proc` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcError {
    pub message: String,
}

impl ProcError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl fmt::Display for ProcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/proc: {}", self.message)
    }
}

impl std::error::Error for ProcError {}

/// Failure reading or validating `~/.pgcenterrc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file exists but its permission bits grant group/other access.
    InsecurePermissions,
    /// The file could not be opened or read.
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InsecurePermissions => {
                write!(f, "connection file permissions allow group or other access")
            }
            ConfigError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
