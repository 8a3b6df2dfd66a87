//! Directory scanning for compiler kits.

use crate::probe::{CompilerProbe, ProbeOutcome};
use cmkits_types::{Kit, KitError, Result};
use futures::future::try_join_all;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `ENOEXEC`: the file is not in an executable format.
#[cfg(not(windows))]
const NOT_EXECUTABLE: i32 = 8;

/// `ERROR_BAD_EXE_FORMAT`: "%1 is not a valid Win32 application".
#[cfg(windows)]
const NOT_EXECUTABLE: i32 = 193;

/// Per-entry result of a scan.
#[derive(Debug)]
pub enum ScanItem {
    /// The entry is a usable compiler
    Found(Kit),
    /// Not a compiler, or not something we are allowed to run
    Skip,
}

/// Probes every entry of a directory for compilers.
#[derive(Clone)]
pub struct DirectoryScanner {
    probe: CompilerProbe,
}

impl DirectoryScanner {
    /// Create a scanner around `probe`.
    pub fn new(probe: CompilerProbe) -> Self {
        Self { probe }
    }

    /// Scan the entries of `dir` (not recursively).
    ///
    /// A missing directory, a path that is not a directory, and a directory
    /// we may not list all yield no kits. Entries that cannot be run are
    /// skipped; any other probe error aborts the scan.
    pub async fn scan(&self, dir: &Path) -> Result<Vec<Kit>> {
        let metadata = match tokio::fs::metadata(dir).await {
            Ok(metadata) => metadata,
            Err(e) if is_benign_listing_error(&e) => {
                debug!("Not scanning {:?}: {}", dir, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_dir() {
            debug!("Not scanning {:?}: not a directory", dir);
            return Ok(Vec::new());
        }

        let paths = match list_entries(dir).await {
            Ok(paths) => paths,
            Err(e) if is_benign_listing_error(&e) => {
                debug!("Cannot list {:?}: {}", dir, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        info!("Scanning {} entries of {:?} for compilers", paths.len(), dir);
        let items = try_join_all(paths.iter().map(|path| self.scan_item(path))).await?;

        let kits: Vec<Kit> = items
            .into_iter()
            .filter_map(|item| match item {
                ScanItem::Found(kit) => Some(kit),
                ScanItem::Skip => None,
            })
            .collect();
        info!("Found {} kit(s) in {:?}", kits.len(), dir);
        Ok(kits)
    }

    /// Scan several directories concurrently and concatenate the results.
    pub async fn scan_all(&self, dirs: &[PathBuf]) -> Result<Vec<Kit>> {
        let per_dir = try_join_all(dirs.iter().map(|dir| self.scan(dir))).await?;
        Ok(per_dir.into_iter().flatten().collect())
    }

    async fn scan_item(&self, path: &Path) -> Result<ScanItem> {
        match self.probe.probe(path).await {
            Ok(ProbeOutcome::Kit(kit)) => Ok(ScanItem::Found(kit)),
            Ok(ProbeOutcome::NotACompiler) => Ok(ScanItem::Skip),
            Err(e) if is_benign_probe_error(&e) => {
                debug!("Skipping {:?}: {}", path, e);
                Ok(ScanItem::Skip)
            }
            Err(e) => Err(e),
        }
    }
}

async fn list_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        paths.push(entry.path());
    }
    Ok(paths)
}

fn is_benign_listing_error(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied)
}

fn is_benign_probe_error(e: &KitError) -> bool {
    let Some(io) = e.io_error() else {
        return false;
    };
    matches!(
        io.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound
    ) || io.raw_os_error() == Some(NOT_EXECUTABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{output, MockRunner};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn scanner(runner: MockRunner) -> DirectoryScanner {
        DirectoryScanner::new(CompilerProbe::new(Arc::new(runner)))
    }

    fn spawn_error(program: &Path, source: io::Error) -> KitError {
        KitError::Spawn {
            program: program.to_path_buf(),
            source,
        }
    }

    #[tokio::test]
    async fn test_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        runner.expect_run().never();

        let kits = scanner(runner)
            .scan(&temp_dir.path().join("nope"))
            .await
            .unwrap();
        assert!(kits.is_empty());
    }

    #[tokio::test]
    async fn test_file_is_not_scanned() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("gcc");
        std::fs::write(&file, "").unwrap();

        let mut runner = MockRunner::new();
        runner.expect_run().never();

        assert!(scanner(runner).scan(&file).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mixed_directory_yields_one_kit() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["gcc", "notes.txt", "arm-none-eabi-gcc"] {
            std::fs::write(temp_dir.path().join(name), "").unwrap();
        }

        let mut runner = MockRunner::new();
        runner.expect_run().times(2).returning(|program, _, _| {
            if program.ends_with("arm-none-eabi-gcc") {
                Err(spawn_error(
                    program,
                    io::Error::from(io::ErrorKind::PermissionDenied),
                ))
            } else {
                Ok(output(0, "", "gcc version 9.3.0 (Ubuntu)\n"))
            }
        });

        let kits = scanner(runner).scan(temp_dir.path()).await.unwrap();
        assert_eq!(kits.len(), 1);
        assert_eq!(kits[0].name, "GCC 9.3.0 (Ubuntu)");
        assert_eq!(kits[0].compilers().unwrap()["C"], temp_dir.path().join("gcc"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unrunnable_files_are_skipped_by_real_runner() {
        use cmkits_core::TokioProcessRunner;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        let temp_dir = TempDir::new().unwrap();
        let set_mode = |name: &str, mode: u32| {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, "").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        };
        set_mode("gcc", 0o000);
        set_mode("clang-14", 0o644);
        set_mode("notes.txt", 0o644);

        let runner = TokioProcessRunner::new().with_default_timeout(Duration::from_secs(10));
        let scanner = DirectoryScanner::new(CompilerProbe::new(Arc::new(runner)));

        let kits = scanner.scan(temp_dir.path()).await.unwrap();
        assert!(kits.is_empty());
    }

    #[tokio::test]
    async fn test_not_executable_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("clang"), "").unwrap();

        let mut runner = MockRunner::new();
        runner.expect_run().returning(|program, _, _| {
            Err(spawn_error(program, io::Error::from_raw_os_error(NOT_EXECUTABLE)))
        });

        assert!(scanner(runner).scan(temp_dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_error_aborts_scan() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("gcc"), "").unwrap();

        let mut runner = MockRunner::new();
        runner.expect_run().returning(|program, _, _| {
            Err(spawn_error(program, io::Error::new(io::ErrorKind::Other, "disk on fire")))
        });

        let err = scanner(runner).scan(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, KitError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_scan_all_flattens() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(first.path().join("gcc"), "").unwrap();
        std::fs::write(second.path().join("x86_64-w64-mingw32-gcc"), "").unwrap();

        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .times(2)
            .returning(|_, _, _| Ok(output(0, "", "gcc version 8.1.0 (GCC)")));

        let dirs = vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
            first.path().join("missing"),
        ];
        let mut names: Vec<String> = scanner(runner)
            .scan_all(&dirs)
            .await
            .unwrap()
            .into_iter()
            .map(|kit| kit.name)
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["GCC 8.1.0 (GCC)", "GCC for x86_64-w64-mingw32 8.1.0 (GCC)"]
        );
    }
}
