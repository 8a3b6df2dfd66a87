//! Collaborator traits for cmkits.
//!
//! The kit subsystem never talks to the operating system or the user
//! directly; it goes through these seams so that scanning, persistence, and
//! selection can be driven by fakes in tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::errors::Result;

/// Options for a single subprocess invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run through the platform shell (`cmd /c` or `sh -c`)
    pub shell: bool,
    /// Kill the process after this long
    pub timeout: Option<Duration>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
}

impl RunOptions {
    /// Options with a timeout and nothing else.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Default::default()
        }
    }

    /// Run through the platform shell.
    pub fn shell(mut self) -> Self {
        self.shell = true;
        self
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (-1 when killed by a signal)
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Check if the process exited with status 0.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external programs and captures their output.
///
/// A non-zero exit is *not* an error: it is reported through
/// [`ProcessOutput::exit_code`]. Errors are reserved for failing to start the
/// program at all, timeouts, and cancellation.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to finish.
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        options: &RunOptions,
    ) -> Result<ProcessOutput>;
}

/// Durable storage for the name of the active kit.
///
/// Survives process restarts; `None` means no kit is active.
pub trait StateStore: Send + Sync {
    /// Name of the kit that was active last time.
    fn active_kit_name(&self) -> Option<String>;

    /// Record the active kit name (or clear it).
    fn set_active_kit_name(&self, name: Option<&str>) -> Result<()>;
}

/// Finds the directory holding toolchain binaries.
#[async_trait]
pub trait ToolchainLocator: Send + Sync {
    /// The toolchain binary directory, or `None` when no toolchain is installed.
    async fn toolchain_root(&self) -> Result<Option<PathBuf>>;
}

/// One entry offered to the user when choosing a kit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitChoice {
    /// Kit name (or "[Unspecified]")
    pub label: String,
    /// Where the kit's compilers come from
    pub description: String,
}

/// Interactive kit chooser.
#[async_trait]
pub trait KitPicker: Send + Sync {
    /// Present `choices` and return the chosen index, or `None` if the user
    /// cancelled.
    async fn pick(&self, choices: &[KitChoice]) -> Result<Option<usize>>;
}
