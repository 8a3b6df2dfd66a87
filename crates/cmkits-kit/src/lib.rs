//! # cmkits Kit
//!
//! Complete kit handling system including:
//! - Compiler detection from binary names and `-v` banners
//! - Concurrent directory scanning
//! - Visual Studio installations and their developer environments
//! - The schema-validated `cmake-kits.json` store
//! - The kit manager: active kit, reloads, change notifications
//! - Deciding whether a kit switch needs a clean build
//!
//! ## Example
//!
//! ```rust,no_run
//! use cmkits_core::{MemoryStateStore, SearchPathLocator, TokioProcessRunner};
//! use cmkits_kit::KitManager;
//! use std::sync::Arc;
//!
//! # async fn example() -> cmkits_types::Result<()> {
//! let mut manager = KitManager::new(
//!     "/tmp/cmake-kits.json",
//!     Arc::new(TokioProcessRunner::new()),
//!     Arc::new(MemoryStateStore::new()),
//!     Arc::new(SearchPathLocator::from_current_exe("toolchain/bin")),
//! );
//! manager.initialize().await?;
//! for kit in manager.kits() {
//!     println!("{}", kit.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clean;
pub mod manager;
pub mod probe;
pub mod scanner;
pub mod store;
pub mod toolset;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use clean::kit_change_needs_clean;
pub use manager::{merge_kits, KitManager, KitSelection};
pub use probe::{CompilerProbe, ProbeOutcome};
pub use scanner::{DirectoryScanner, ScanItem};
pub use store::KitStore;
pub use toolset::VsToolset;
pub use watcher::StoreWatcher;
