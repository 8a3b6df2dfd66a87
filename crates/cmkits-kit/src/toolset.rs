//! Visual Studio toolset kits.
//!
//! Installations are enumerated with `vswhere`. For every installation and
//! target architecture a small batch script calls `VsDevCmd.bat` and echoes
//! the variables the compiler needs; a kit exists for each combination the
//! installation actually supports.

use cmkits_types::{
    CMakeGenerator, Kit, KitError, KitIdentity, ProcessRunner, Result, RunOptions, VsInstallation,
};
use futures::future::join_all;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Variables echoed back from the developer command prompt.
pub const MSVC_ENVIRONMENT_VARIABLES: [&str; 23] = [
    "CL",
    "_CL_",
    "INCLUDE",
    "LIBPATH",
    "LINK",
    "_LINK_",
    "LIB",
    "PATH",
    "TMP",
    "FRAMEWORKDIR",
    "FRAMEWORKDIR64",
    "FRAMEWORKVERSION",
    "FRAMEWORKVERSION64",
    "UCRTCONTEXTROOT",
    "UCRTVERSION",
    "UNIVERSALCRTSDKDIR",
    "VCINSTALLDIR",
    "VCTARGETSPATH",
    "WINDOWSLIBPATH",
    "WINDOWSSDKDIR",
    "WINDOWSSDKLIBVERSION",
    "WINDOWSSDKVERSION",
    "VISUALSTUDIOVERSION",
];

/// Architectures tried for every installation.
pub const VS_ARCHITECTURES: [&str; 6] = [
    "x86",
    "amd64",
    "x86_amd64",
    "x86_arm",
    "amd64_arm",
    "amd64_x86",
];

/// Default time budget for one environment script.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(120);

const UNSUPPORTED_MARKERS: [&str; 2] = ["Invalid host architecture", "Error in script usage"];

static ENV_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+) := ?(.*)").expect("invalid environment line regex"));

/// CMake generator for a Visual Studio major version.
pub fn generator_for_version(major: u32) -> Option<&'static str> {
    match major {
        11 => Some("Visual Studio 11 2012"),
        12 => Some("Visual Studio 12 2013"),
        14 => Some("Visual Studio 14 2015"),
        15 => Some("Visual Studio 15 2017"),
        16 => Some("Visual Studio 16 2019"),
        17 => Some("Visual Studio 17 2022"),
        _ => None,
    }
}

/// Generator platform (`-A`) for an architecture, where one is needed.
pub fn platform_for_arch(arch: &str) -> Option<&'static str> {
    match arch {
        "amd64" => Some("x64"),
        "arm" | "amd64_arm" => Some("ARM"),
        _ => None,
    }
}

/// Default location of `vswhere.exe`.
pub fn default_vswhere_path() -> PathBuf {
    let program_files = std::env::var_os("ProgramFiles(x86)")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"));
    program_files
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe")
}

/// Discovers Visual Studio installations and their per-architecture
/// environments.
#[derive(Clone)]
pub struct VsToolset {
    runner: Arc<dyn ProcessRunner>,
    vswhere: PathBuf,
    script_timeout: Duration,
    script_dir: Option<PathBuf>,
}

impl VsToolset {
    /// Create a toolset resolver using the default `vswhere` location.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            vswhere: default_vswhere_path(),
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
            script_dir: None,
        }
    }

    /// Use a specific `vswhere.exe`.
    pub fn with_vswhere(mut self, vswhere: impl Into<PathBuf>) -> Self {
        self.vswhere = vswhere.into();
        self
    }

    /// Kill an environment script after `timeout`.
    pub fn with_script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Create the temporary scripts in `dir` instead of the system temp dir.
    pub fn with_script_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.script_dir = Some(dir.into());
        self
    }

    /// All installations known to `vswhere`, first occurrence of each
    /// instance id only.
    pub async fn list_installations(&self) -> Result<Vec<VsInstallation>> {
        let args = vec![
            "65001".to_string(),
            "|".to_string(),
            format!("\"{}\"", self.vswhere.display()),
            "-all".to_string(),
            "-format".to_string(),
            "json".to_string(),
            "-products".to_string(),
            "*".to_string(),
            "-legacy".to_string(),
            "-prerelease".to_string(),
        ];
        let options = RunOptions::with_timeout(self.script_timeout).shell();

        let output = match self.runner.run(Path::new("chcp"), &args, &options).await {
            Ok(output) => output,
            Err(KitError::Cancelled) => return Err(KitError::Cancelled),
            Err(e) => {
                error!("Failed to execute vswhere.exe: {}", e);
                return Ok(Vec::new());
            }
        };

        if !output.is_success() {
            error!(
                "Failed to execute vswhere.exe (exit code {}): {}",
                output.exit_code, output.stderr
            );
            return Ok(Vec::new());
        }

        let installations: Vec<VsInstallation> = match serde_json::from_str(&output.stdout) {
            Ok(installations) => installations,
            Err(e) => {
                error!("Failed to parse vswhere.exe output: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let installations: Vec<VsInstallation> = installations
            .into_iter()
            .filter(|inst| seen.insert(inst.instance_id.clone()))
            .collect();
        debug!("vswhere reported {} installation(s)", installations.len());
        Ok(installations)
    }

    /// Kit for `installation` targeting `arch`, or `None` if the
    /// installation cannot build for that architecture.
    pub async fn resolve_kit(&self, installation: &VsInstallation, arch: &str) -> Result<Option<Kit>> {
        let name = format!("{} - {}", installation.kit_display_name(), arch);
        debug!("Checking for kit: {}", name);

        if self.environment_for_installation(installation, arch).await?.is_none() {
            return Ok(None);
        }

        let mut kit = Kit::new(
            name,
            KitIdentity::VisualStudio {
                instance_id: installation.instance_id.clone(),
                architecture: arch.to_string(),
            },
        );

        match installation.major_version().and_then(generator_for_version) {
            Some(generator) => {
                debug!(
                    "{} {} uses generator {}",
                    installation.instance_id, installation.installation_version, generator
                );
                kit.preferred_generator = Some(CMakeGenerator {
                    name: generator.to_string(),
                    toolset: None,
                    platform: platform_for_arch(arch).map(str::to_string),
                });
            }
            None => debug!(
                "No known generator for version {}",
                installation.installation_version
            ),
        }

        Ok(Some(kit))
    }

    /// Build environment of a Visual Studio kit.
    ///
    /// `None` when the kit is not a Visual Studio kit, its installation is
    /// gone, or the architecture is unsupported.
    pub async fn environment_for(&self, kit: &Kit) -> Result<Option<IndexMap<String, String>>> {
        let KitIdentity::VisualStudio { instance_id, architecture } = &kit.identity else {
            debug!("Kit {} is not a Visual Studio kit", kit.name);
            return Ok(None);
        };

        let installations = self.list_installations().await?;
        let Some(installation) = installations.iter().find(|inst| &inst.instance_id == instance_id) else {
            warn!("Visual Studio instance {} is no longer installed", instance_id);
            return Ok(None);
        };

        self.environment_for_installation(installation, architecture).await
    }

    /// Run `VsDevCmd.bat -arch=<arch>` for `installation` and collect the
    /// resulting environment.
    pub async fn environment_for_installation(
        &self,
        installation: &VsInstallation,
        arch: &str,
    ) -> Result<Option<IndexMap<String, String>>> {
        let common_dir = installation.common_tools_dir();
        let devbat = common_dir.join("VsDevCmd.bat");
        let args = ["-no_logo".to_string(), format!("-arch={}", arch)];

        let Some(mut variables) = self.collect_devbat_vars(&devbat, &args).await? else {
            return Ok(None);
        };

        if let Some(version) = variables.get("VISUALSTUDIOVERSION") {
            let digits: String = version.chars().filter(char::is_ascii_digit).collect();
            variables.insert(
                format!("VS{}COMNTOOLS", digits),
                common_dir.to_string_lossy().to_string(),
            );
        }

        // Make CMake try cl.exe before any other compiler on PATH
        variables.insert("CC".to_string(), "cl.exe".to_string());
        variables.insert("CXX".to_string(), "cl.exe".to_string());

        Ok(Some(variables))
    }

    /// Kits for every installation and architecture that resolves.
    pub async fn scan_kits(&self) -> Result<Vec<Kit>> {
        let installations = self.list_installations().await?;
        info!(
            "Checking {} Visual Studio installation(s) for kits",
            installations.len()
        );

        let attempts = installations.iter().flat_map(move |installation| {
            VS_ARCHITECTURES
                .iter()
                .map(move |arch| async move { (*arch, self.resolve_kit(installation, arch).await) })
        });

        let mut kits = Vec::new();
        for (arch, result) in join_all(attempts).await {
            match result {
                Ok(Some(kit)) => kits.push(kit),
                Ok(None) => {}
                Err(KitError::Cancelled) => return Err(KitError::Cancelled),
                Err(e) => warn!("Failed to resolve Visual Studio kit for {}: {}", arch, e),
            }
        }

        info!("Found {} Visual Studio kit(s)", kits.len());
        Ok(kits)
    }

    async fn collect_devbat_vars(
        &self,
        devbat: &Path,
        args: &[String],
    ) -> Result<Option<IndexMap<String, String>>> {
        let script = self.write_script(devbat, args)?;
        let options = RunOptions::with_timeout(self.script_timeout).shell();

        // `script` is removed when it goes out of scope, whatever happens here
        let result = self.runner.run(&script, &[], &options).await;
        drop(script);

        let output = match result {
            Ok(output) => output,
            Err(KitError::Timeout { after, .. }) => {
                error!("Running {:?} did not finish within {:?}", devbat, after);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let text = if output.stdout.trim().is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };

        if !output.is_success() {
            if UNSUPPORTED_MARKERS.iter().any(|marker| text.contains(marker)) {
                debug!("{:?} does not support {}", devbat, args.join(" "));
            } else {
                error!(
                    "Error running {:?} (exit code {}): {}",
                    devbat, output.exit_code, text
                );
            }
            return Ok(None);
        }

        if text.trim().is_empty() {
            error!("Environment detection using {:?} failed: no output", devbat);
            return Ok(None);
        }

        Ok(Some(parse_environment(text)))
    }

    fn write_script(&self, devbat: &Path, args: &[String]) -> Result<tempfile::TempPath> {
        let mut lines = vec![
            "@echo off".to_string(),
            format!("call \"{}\" {} || exit", devbat.display(), args.join(" ")),
        ];
        lines.extend(
            MSVC_ENVIRONMENT_VARIABLES
                .iter()
                .map(|var| format!("echo {} := %{}%", var, var)),
        );

        let mut builder = tempfile::Builder::new();
        builder.prefix("vs-cmt-").suffix(".bat");
        let mut file = match &self.script_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(lines.join("\r\n").as_bytes())?;
        file.flush()?;

        // Close the handle so cmd.exe can open the script
        Ok(file.into_temp_path())
    }
}

/// Parse `NAME := value` lines. Lines that do not match are logged and
/// skipped.
pub fn parse_environment(text: &str) -> IndexMap<String, String> {
    let mut variables = IndexMap::new();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match ENV_LINE.captures(line) {
            Some(caps) => {
                variables.insert(caps[1].to_string(), caps[2].to_string());
            }
            None => error!("Error parsing environment variable: {}", line),
        }
    }
    variables
}
