//! Filesystem utilities.

use async_trait::async_trait;
use cmkits_types::{Result, ToolchainLocator};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path.to_path_buf()
}

/// Whether `path` exists. Unlike [`Path::exists`], I/O errors other than
/// "not found" are reported instead of being folded into `false`.
pub async fn exists(path: impl AsRef<Path>) -> Result<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}

/// Locates a toolchain directory (e.g. `toolchain/bin`) beneath a list of
/// search roots or any of their ancestors.
#[derive(Debug, Clone)]
pub struct SearchPathLocator {
    item: PathBuf,
    roots: Vec<PathBuf>,
}

impl SearchPathLocator {
    /// Look for `item` under each of `roots`, walking up from every root.
    pub fn new(item: impl AsRef<Path>, roots: Vec<PathBuf>) -> Self {
        Self {
            item: item.as_ref().to_path_buf(),
            roots,
        }
    }

    /// Search upward from the directory of the running executable.
    pub fn from_current_exe(item: impl AsRef<Path>) -> Self {
        let roots = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .into_iter()
            .collect();
        Self::new(item, roots)
    }

    /// Add another root to search after the existing ones.
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.roots.push(expand_path(root));
        self
    }

    /// Synchronous lookup.
    pub fn find(&self) -> Option<PathBuf> {
        for root in &self.roots {
            for dir in root.ancestors() {
                let candidate = dir.join(&self.item);
                if candidate.is_dir() {
                    debug!("Found {:?} at {:?}", self.item, candidate);
                    return Some(candidate);
                }
            }
        }
        debug!("{:?} not found under {:?}", self.item, self.roots);
        None
    }
}

#[async_trait]
impl ToolchainLocator for SearchPathLocator {
    async fn toolchain_root(&self) -> Result<Option<PathBuf>> {
        Ok(self.find())
    }
}
