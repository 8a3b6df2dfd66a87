//! # cmkits Types
//!
//! Core types, traits, and enums shared across all cmkits crates.
//!
//! This crate provides the fundamental building blocks of the kit manager,
//! including:
//!
//! - The [`Kit`] descriptor and its [`KitIdentity`] variants
//! - Visual Studio installation records
//! - Collaborator traits for process execution, persisted state, toolchain
//!   lookup, and interactive kit choice
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use cmkits_types::{Kit, KitIdentity};
//!
//! let kit = Kit::with_compilers("GCC 9.3.0", "/usr/bin", [("C", "/usr/bin/gcc")]);
//! assert_eq!(kit.name, "GCC 9.3.0");
//! assert!(matches!(kit.identity, KitIdentity::Compilers(_)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod kit;
pub mod vs;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{KitError, Result};
pub use kit::{CMakeGenerator, Kit, KitIdentity, UNSPECIFIED_KIT_NAME};
pub use vs::VsInstallation;
pub use enums::{CompilerFamily, LogLevel, MissingCompilerPolicy};
pub use traits::{
    KitChoice, KitPicker, ProcessOutput, ProcessRunner, RunOptions, StateStore, ToolchainLocator,
};
