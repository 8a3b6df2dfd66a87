//! Common enumerations used throughout cmkits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{KitError, Result};

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::None => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = KitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(LogLevel::None),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(KitError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "NONE"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

/// Compiler families recognised by filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilerFamily {
    /// `gcc`, `arm-none-eabi-gcc`, `gcc.exe`, ...
    Gcc,
    /// `clang`, `clang-14`, `clang-3.9.1.exe`, ...
    Clang,
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerFamily::Gcc => write!(f, "GCC"),
            CompilerFamily::Clang => write!(f, "Clang"),
        }
    }
}

/// What a reload does when a persisted kit's compiler has vanished from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingCompilerPolicy {
    /// Abandon the whole reload; the catalog becomes empty.
    #[default]
    DiscardAll,
    /// Drop only the affected kit and keep the rest.
    DropKit,
}

impl FromStr for MissingCompilerPolicy {
    type Err = KitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "discard-all" => Ok(MissingCompilerPolicy::DiscardAll),
            "drop-kit" => Ok(MissingCompilerPolicy::DropKit),
            _ => Err(KitError::Validation(format!(
                "Invalid missing compiler policy: {} (expected discard-all or drop-kit)",
                s
            ))),
        }
    }
}

impl fmt::Display for MissingCompilerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingCompilerPolicy::DiscardAll => write!(f, "discard-all"),
            MissingCompilerPolicy::DropKit => write!(f, "drop-kit"),
        }
    }
}
