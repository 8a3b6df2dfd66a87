//! CLI command implementations.

pub mod active;
pub mod list;
pub mod needs_clean;
pub mod scan;
pub mod select;
pub mod vs;
pub mod watch;

use anyhow::{Context, Result};
use cmkits_core::{FileStateStore, KitsConfig, SearchPathLocator, TokioProcessRunner};
use cmkits_kit::{CompilerProbe, KitManager, KitStore, VsToolset};
use cmkits_types::ProcessRunner;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Everything a command needs: settings plus a process runner that Ctrl-C
/// cancels.
pub struct Session {
    config: KitsConfig,
    runner: Arc<dyn ProcessRunner>,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(config: KitsConfig) -> Self {
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            debug!("Interrupted, cancelling running processes");
            token.cancel();

            // A second interrupt exits even if nothing was listening
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });

        let runner = TokioProcessRunner::new().with_cancellation(cancel.clone());
        Self {
            config,
            runner: Arc::new(runner),
            cancel,
        }
    }

    /// Cancelled on Ctrl-C.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn store(&self) -> KitStore {
        KitStore::new(&self.config.store_path)
    }

    pub fn state(&self) -> FileStateStore {
        FileStateStore::open(&self.config.state_path)
    }

    /// A kit manager wired to the configured store, state file, and
    /// toolchain search path. Not yet initialized.
    pub fn manager(&self) -> KitManager {
        let locator = self
            .config
            .search_roots
            .iter()
            .fold(
                SearchPathLocator::from_current_exe(&self.config.toolchain_item),
                |locator, root| locator.with_root(root),
            );
        let probe = CompilerProbe::new(self.runner.clone()).with_timeout(self.config.probe_timeout());

        KitManager::new(
            &self.config.store_path,
            self.runner.clone(),
            Arc::new(self.state()),
            Arc::new(locator),
        )
        .with_policy(self.config.missing_compiler_policy)
        .with_scan_dirs(self.config.scan_dirs.iter().cloned())
        .with_probe(probe)
    }

    /// [`manager`](Self::manager), initialized.
    pub async fn initialized_manager(&self) -> Result<KitManager> {
        let mut manager = self.manager();
        manager
            .initialize()
            .await
            .context("Failed to initialize kit manager")?;
        Ok(manager)
    }

    pub fn toolset(&self) -> VsToolset {
        let toolset = VsToolset::new(self.runner.clone())
            .with_script_timeout(self.config.env_script_timeout());
        match &self.config.vswhere_path {
            Some(vswhere) => toolset.with_vswhere(vswhere),
            None => toolset,
        }
    }
}
