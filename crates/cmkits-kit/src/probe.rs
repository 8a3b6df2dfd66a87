//! Compiler detection.
//!
//! A candidate binary is classified by its file name first; only names that
//! look like GCC or Clang are ever executed. Recognised compilers are run
//! with `-v` and their version banner becomes the kit name.

use cmkits_core::util::fs::exists;
use cmkits_types::{CompilerFamily, Kit, KitError, ProcessOutput, ProcessRunner, Result, RunOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default time budget for a single `<compiler> -v`.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

static GCC_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((\w+-)*)gcc(\.exe)?$").expect("invalid gcc name regex"));

static CLANG_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^clang(-\d+(\.\d+(\.\d+)?)?)?(\.exe)?$").expect("invalid clang name regex")
});

static GCC_TARGET_TRIPLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"((\w+-)+)gcc.*").expect("invalid target triple regex"));

static GCC_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^gcc version (.+)$").expect("invalid gcc version regex"));

static CLANG_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Apple LLVM|clang) version (.*?)[ -]").expect("invalid clang version regex")
});

/// Result of probing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The file is a working compiler
    Kit(Kit),
    /// The file is not a compiler we can use
    NotACompiler,
}

impl ProbeOutcome {
    /// The discovered kit, if any.
    pub fn into_kit(self) -> Option<Kit> {
        match self {
            ProbeOutcome::Kit(kit) => Some(kit),
            ProbeOutcome::NotACompiler => None,
        }
    }
}

/// Turns candidate binaries into compiler kits.
#[derive(Clone)]
pub struct CompilerProbe {
    runner: Arc<dyn ProcessRunner>,
    timeout: Duration,
}

impl CompilerProbe {
    /// Create a probe that runs compilers through `runner`.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Kill a compiler that has not answered `-v` within `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Classify a file name without running anything.
    pub fn classify(file_name: &str) -> Option<CompilerFamily> {
        if GCC_NAME.is_match(file_name) {
            Some(CompilerFamily::Gcc)
        } else if CLANG_NAME.is_match(file_name) {
            Some(CompilerFamily::Clang)
        } else {
            None
        }
    }

    /// Probe `path`.
    ///
    /// Compilers that fail or print an unrecognised banner are reported as
    /// [`ProbeOutcome::NotACompiler`]. Failing to start the binary, or any
    /// other I/O problem, is an error.
    pub async fn probe(&self, path: &Path) -> Result<ProbeOutcome> {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(ProbeOutcome::NotACompiler);
        };

        match Self::classify(file_name) {
            Some(CompilerFamily::Gcc) => self.probe_gcc(path, file_name).await,
            Some(CompilerFamily::Clang) => self.probe_clang(path, file_name).await,
            None => Ok(ProbeOutcome::NotACompiler),
        }
    }

    async fn probe_gcc(&self, path: &Path, file_name: &str) -> Result<ProbeOutcome> {
        info!("Testing GCC-ish binary: {:?}", path);
        let Some(output) = self.version_output(path).await? else {
            return Ok(ProbeOutcome::NotACompiler);
        };

        let version = output
            .stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .and_then(|line| GCC_VERSION.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let Some(version) = version else {
            warn!("Bad GCC binary {:?}, -v output: {}", path, output.stderr);
            return Ok(ProbeOutcome::NotACompiler);
        };

        let description = GCC_TARGET_TRIPLE
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .map(|prefix| format!("for {} ", prefix.as_str().trim_end_matches('-')))
            .unwrap_or_default();

        info!("Detected GCC compiler: {:?}", path);
        let name = format!("GCC {}{}", description, version);
        Ok(ProbeOutcome::Kit(Kit::with_compilers(
            name,
            parent_dir(path),
            [("C", path)],
        )))
    }

    async fn probe_clang(&self, path: &Path, file_name: &str) -> Result<ProbeOutcome> {
        info!("Testing Clang-ish binary: {:?}", path);
        let Some(output) = self.version_output(path).await? else {
            return Ok(ProbeOutcome::NotACompiler);
        };

        let version = output
            .stderr
            .lines()
            .next()
            .and_then(|line| CLANG_VERSION.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let Some(version) = version else {
            warn!("Bad Clang binary {:?}, -v output: {}", path, output.stderr);
            return Ok(ProbeOutcome::NotACompiler);
        };

        let dir = parent_dir(path);
        let mut compilers = vec![("C", path.to_path_buf())];
        if let Some(rest) = file_name.strip_prefix("clang") {
            let clangxx = dir.join(format!("clang++{}", rest));
            if exists(&clangxx).await? {
                compilers.push(("CXX", clangxx));
            } else {
                debug!("No C++ sibling {:?} for {:?}", clangxx, path);
            }
        }

        info!("Detected Clang compiler: {:?}", path);
        Ok(ProbeOutcome::Kit(Kit::with_compilers(
            format!("Clang {}", version),
            dir,
            compilers,
        )))
    }

    /// Run `<path> -v`. `None` means the compiler failed or hung.
    async fn version_output(&self, path: &Path) -> Result<Option<ProcessOutput>> {
        let options = RunOptions::with_timeout(self.timeout);
        let output = match self.runner.run(path, &["-v".to_string()], &options).await {
            Ok(output) => output,
            Err(KitError::Timeout { after, .. }) => {
                warn!("{:?} did not answer -v within {:?}, skipping", path, after);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !output.is_success() {
            warn!(
                "Bad compiler binary {:?} (\"-v\" exited with {})",
                path, output.exit_code
            );
            return Ok(None);
        }

        Ok(Some(output))
    }
}

fn parent_dir(path: &Path) -> std::path::PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
