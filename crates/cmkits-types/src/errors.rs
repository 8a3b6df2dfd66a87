//! Error types for cmkits operations.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The main error type for cmkits operations.
///
/// Expected misses (a file that is not a compiler, an architecture a toolset
/// does not support, a kit name that is no longer known) are never reported
/// through this type; they are modelled as `Option`/outcome values instead.
#[derive(Error, Debug)]
pub enum KitError {
    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Kit-related error
    #[error("Kit error: {0}")]
    Kit(String),

    /// Kit store (cmake-kits.json) error
    #[error("Kit store error: {0}")]
    Store(String),

    /// Visual Studio toolset error
    #[error("Toolset error: {0}")]
    Toolset(String),

    /// Persisted state error
    #[error("State error: {0}")]
    State(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A subprocess could not be started
    #[error("Failed to execute {program:?}: {source}")]
    Spawn {
        /// Program that failed to start
        program: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// A subprocess did not finish within its time budget
    #[error("{program:?} did not finish within {after:?}")]
    Timeout {
        /// Program that was killed
        program: PathBuf,
        /// The budget that elapsed
        after: Duration,
    },

    /// The operation was cancelled through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// The kit manager was used before `initialize()`
    #[error("Kit manager has not been initialized")]
    NotInitialized,

    /// File watching error
    #[error("Watch error: {0}")]
    Watch(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0}\n\nThis is an internal error. Please report this issue at:\nhttps://github.com/cmkits/cmkits/issues")]
    Bug(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl KitError {
    /// The OS-level error behind this error, if there is one.
    ///
    /// Scanners use this to tell "access denied" and friends apart from
    /// genuinely unexpected failures.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            KitError::Io(e) => Some(e),
            KitError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Shorthand for the [`io::ErrorKind`] behind this error.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        self.io_error().map(io::Error::kind)
    }
}

/// A specialized Result type for cmkits operations.
pub type Result<T> = std::result::Result<T, KitError>;

/// Helper macro to create and return a KitError::Bug
///
/// This should be used for conditions that should never occur
/// in normal operation and indicate a bug in cmkits itself.
///
/// # Example
///
/// ```ignore
/// if some_impossible_condition {
///     bug!("This should never happen: {:?}", condition);
/// }
/// ```
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::KitError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::KitError::Bug(format!($fmt, $($arg)*)))
    };
}

/// Helper macro to bail out with a KitError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Kit, "Invalid kit: {}", reason);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::KitError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::KitError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::KitError::Other($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::KitError::Other(format!($fmt, $($arg)*)))
    };
}
