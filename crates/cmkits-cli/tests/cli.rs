//! Integration tests for the cmkits binary.
// cargo_bin is deprecated in newer assert_cmd releases but still works.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = json!({
            "store_path": temp.path().join("cmake-kits.json"),
            "state_path": temp.path().join("state.json"),
            "toolchain_item": "no-such-toolchain/bin",
        });
        // JSON is valid YAML
        fs::write(temp.path().join("config"), config.to_string()).unwrap();
        Self { temp }
    }

    fn path(&self) -> &Path {
        self.temp.path()
    }

    /// A file standing in for a compiler binary.
    fn compiler(&self, name: &str) -> PathBuf {
        let bin = self.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let path = bin.join(name);
        fs::write(&path, "").unwrap();
        path
    }

    fn write_kits(&self, kits: serde_json::Value) {
        fs::write(self.path().join("cmake-kits.json"), kits.to_string()).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("cmkits"));
        cmd.env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path().join("config"));
        cmd
    }
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("cmkits"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("needs-clean"))
        .stdout(predicate::str::contains("vs-kits"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("cmkits"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_list_without_toolchain_is_empty() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new();
    ws.cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));

    // The empty scan result is persisted
    assert_eq!(fs::read_to_string(ws.path().join("cmake-kits.json"))?, "[]");
    Ok(())
}

#[test]
fn cli_list_reads_existing_store() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new();
    let gcc = ws.compiler("gcc-9");
    ws.write_kits(json!([{ "name": "GCC 9.3.0", "compilers": { "C": gcc } }]));

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GCC 9.3.0"))
        .stdout(predicate::str::contains("Using compilers: C ="));
    Ok(())
}

#[test]
fn cli_select_by_name_persists_active_kit() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new();
    let gcc = ws.compiler("gcc-9");
    let clang = ws.compiler("clang-14");
    ws.write_kits(json!([
        { "name": "Clang 14.0.0", "compilers": { "C": clang } },
        { "name": "GCC 9.3.0", "compilers": { "C": gcc } },
    ]));

    ws.cmd().arg("active").assert().success().stdout(predicate::str::contains("No active kit"));

    ws.cmd()
        .args(["select", "GCC 9.3.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected GCC 9.3.0"));

    ws.cmd()
        .arg("active")
        .assert()
        .success()
        .stdout(predicate::str::contains("GCC 9.3.0"));
    Ok(())
}

#[test]
fn cli_select_unknown_kit_fails() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new();
    let gcc = ws.compiler("gcc-9");
    ws.write_kits(json!([{ "name": "GCC 9.3.0", "compilers": { "C": gcc } }]));

    ws.cmd()
        .args(["select", "MSVC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No kit named 'MSVC'"));
    Ok(())
}

#[test]
fn cli_needs_clean_compares_compilers() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new();
    ws.write_kits(json!([
        { "name": "Clang 14.0.0", "compilers": { "C": "/usr/bin/clang-14" } },
        { "name": "GCC 9.3.0", "compilers": { "C": "/usr/bin/gcc-9" } },
        { "name": "GCC 9.3.0 (copy)", "compilers": { "C": "/usr/bin/gcc-9" } },
    ]));

    ws.cmd()
        .args(["needs-clean", "Clang 14.0.0", "GCC 9.3.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yes:"));

    ws.cmd()
        .args(["needs-clean", "GCC 9.3.0 (copy)", "GCC 9.3.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No:"));

    // No prior kit
    ws.cmd()
        .args(["needs-clean", "GCC 9.3.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No:"));
    Ok(())
}

#[test]
fn cli_store_flag_overrides_config() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new();
    let other = ws.path().join("other").join("kits.json");
    fs::create_dir_all(other.parent().unwrap())?;
    fs::write(&other, r#"[{ "name": "Elsewhere", "compilers": { "C": "/x/gcc" } }]"#)?;

    ws.cmd()
        .arg("--store")
        .arg(&other)
        .args(["needs-clean", "Elsewhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Elsewhere"));
    Ok(())
}
