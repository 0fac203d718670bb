//! Structured error types shared across netview crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`NetError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable code naming the failing step.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, ranks, exit codes, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for network viewing.
///
/// None of these are recoverable locally. Every variant serializes so that an
/// error raised on the leader can be replayed on every other rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum NetError {
    /// Invalid handles and malformed network descriptions.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Unsupported viewers, missing shared directories, bad option values.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Temporary path acquisition failures.
    #[error("resource error: {0}")]
    Resource(ErrorInfo),
    /// Collective operation failures.
    #[error("communication error: {0}")]
    Comm(ErrorInfo),
    /// External renderer spawn failures and non-zero exits.
    #[error("external tool error: {0}")]
    External(ErrorInfo),
    /// Failure to remove a temporary artifact.
    #[error("cleanup error: {0}")]
    Cleanup(ErrorInfo),
    /// Failures writing to an output sink.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Encoding and decoding failures.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl NetError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NetError::Graph(info)
            | NetError::Config(info)
            | NetError::Resource(info)
            | NetError::Comm(info)
            | NetError::External(info)
            | NetError::Cleanup(info)
            | NetError::Io(info)
            | NetError::Serde(info) => info,
        }
    }

    /// Shorthand for a [`NetError::Graph`] without context.
    pub fn graph(code: impl Into<String>, message: impl Into<String>) -> Self {
        NetError::Graph(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`NetError::Config`] without context.
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        NetError::Config(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`NetError::Comm`] without context.
    pub fn comm(code: impl Into<String>, message: impl Into<String>) -> Self {
        NetError::Comm(ErrorInfo::new(code, message))
    }

    /// Wraps an I/O failure from an output sink.
    pub fn io(code: impl Into<String>, err: impl ToString) -> Self {
        NetError::Io(ErrorInfo::new(code, err.to_string()))
    }

    /// Adds a context entry to whichever payload this error carries.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value.to_string()))
    }

    /// Attaches a remediation hint to whichever payload this error carries.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            NetError::Graph(info) => NetError::Graph(f(info)),
            NetError::Config(info) => NetError::Config(f(info)),
            NetError::Resource(info) => NetError::Resource(f(info)),
            NetError::Comm(info) => NetError::Comm(f(info)),
            NetError::External(info) => NetError::External(f(info)),
            NetError::Cleanup(info) => NetError::Cleanup(f(info)),
            NetError::Io(info) => NetError::Io(f(info)),
            NetError::Serde(info) => NetError::Serde(f(info)),
        }
    }
}
