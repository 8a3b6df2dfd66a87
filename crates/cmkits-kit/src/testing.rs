//! Test doubles shared by the unit tests in this crate.

use async_trait::async_trait;
use cmkits_types::{
    KitChoice, KitPicker, ProcessOutput, ProcessRunner, Result, RunOptions, ToolchainLocator,
};
use mockall::mock;
use std::path::{Path, PathBuf};

mock! {
    pub Runner {}

    #[async_trait]
    impl ProcessRunner for Runner {
        async fn run(
            &self,
            program: &Path,
            args: &[String],
            options: &RunOptions,
        ) -> Result<ProcessOutput>;
    }
}

mock! {
    pub Picker {}

    #[async_trait]
    impl KitPicker for Picker {
        async fn pick(&self, choices: &[KitChoice]) -> Result<Option<usize>>;
    }
}

pub fn output(exit_code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
    ProcessOutput {
        exit_code,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

/// Answers `-v` like a real GCC for any `*gcc` binary that exists on disk.
pub struct FakeGccRunner {
    pub version: String,
}

#[async_trait]
impl ProcessRunner for FakeGccRunner {
    async fn run(
        &self,
        program: &Path,
        _args: &[String],
        _options: &RunOptions,
    ) -> Result<ProcessOutput> {
        Ok(output(
            0,
            "",
            &format!(
                "Using built-in specs.\nTarget: {}\ngcc version {}\n",
                program.display(),
                self.version
            ),
        ))
    }
}

/// Locator with a fixed answer.
pub struct FixedLocator(pub Option<PathBuf>);

#[async_trait]
impl ToolchainLocator for FixedLocator {
    async fn toolchain_root(&self) -> Result<Option<PathBuf>> {
        Ok(self.0.clone())
    }
}
