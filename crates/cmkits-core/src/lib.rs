//! # cmkits Core
//!
//! Core utilities, configuration management, logging, and common functionality
//! for the cmkits kit manager.
//!
//! This crate provides:
//!
//! - **Configuration**: Multi-layer configuration system (defaults, file, programmatic, environment)
//! - **Logging**: Structured logging to stderr and rolling log files
//! - **State**: The persisted active-kit name
//! - **Process Execution**: Subprocesses with timeouts and cancellation
//! - **File Operations**: Permissive JSON handling, toolchain lookup
//! - **Data Structures**: Deep merging of configuration layers
//!
//! ## Example
//!
//! ```rust,no_run
//! use cmkits_core::config::KitsConfig;
//!
//! # fn main() -> cmkits_core::Result<()> {
//! // Initialize logging
//! cmkits_core::log::init_default()?;
//!
//! // Load configuration
//! let config = KitsConfig::load()?;
//! println!("kits are stored in {}", config.store_path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod util;
pub mod state;

// Re-export commonly used items
pub use config::{Config, KitsConfig};
pub use state::{FileStateStore, MemoryStateStore};
pub use util::process::TokioProcessRunner;
pub use util::fs::SearchPathLocator;
pub use cmkits_types::{KitError, Result};

/// cmkits application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// cmkits application name
pub const APP_NAME: &str = "cmkits";
