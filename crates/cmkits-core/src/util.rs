//! Common utility functions.

pub mod data;
pub mod process;
pub mod fs;

// Re-export commonly used items
pub use data::{load_yaml, parse_permissive_json, to_pretty_json, deep_merge};
pub use process::{run, TokioProcessRunner};
pub use fs::{expand_path, SearchPathLocator};
