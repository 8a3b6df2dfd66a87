//! Kit descriptors.
//!
//! A kit is a named description of a build environment: which compilers to
//! use (or which Visual Studio installation, or which toolchain file), plus
//! optional generator preferences, CMake cache settings, and environment
//! overrides.
//!
//! On disk a kit is a flat JSON object (see `cmake-kits.json`). In memory the
//! mutually exclusive "how do we find the compilers" fields are folded into
//! [`KitIdentity`], so a kit can never claim two identities at once.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the "let CMake decide" sentinel kit.
pub const UNSPECIFIED_KIT_NAME: &str = "__unspec__";

/// A CMake generator, along with an optional toolset and platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CMakeGenerator {
    /// Generator name, e.g. "Visual Studio 15 2017"
    pub name: String,
    /// Generator toolset (`-T`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolset: Option<String>,
    /// Generator platform (`-A`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// How a kit locates its compilers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitIdentity {
    /// Explicit compiler binaries, keyed by CMake language tag ("C", "CXX", ...).
    ///
    /// Declaration order is preserved; the first entry is the one checked when
    /// deciding whether a persisted kit is still usable.
    Compilers(IndexMap<String, PathBuf>),

    /// A Visual Studio installation plus target architecture.
    VisualStudio {
        /// `instanceId` reported by vswhere
        instance_id: String,
        /// Architecture passed to `VsDevCmd.bat -arch=`
        architecture: String,
    },

    /// An external CMake toolchain file.
    ToolchainFile(PathBuf),

    /// Let CMake guess.
    Unspecified,
}

/// A named build environment descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KitRecord", into = "KitRecord")]
pub struct Kit {
    /// Unique name within a kit list
    pub name: String,

    /// Directory holding the discovered compiler binaries (empty for
    /// Visual Studio kits)
    pub toolchain_binary_path: PathBuf,

    /// Preferred CMake generator
    pub preferred_generator: Option<CMakeGenerator>,

    /// Additional cache settings passed to CMake
    pub cmake_settings: Option<IndexMap<String, String>>,

    /// Environment overrides applied when building with this kit
    pub environment_variables: Option<IndexMap<String, String>>,

    /// How the compilers are found
    pub identity: KitIdentity,
}

impl Kit {
    /// Create a kit with the given identity and no optional settings.
    pub fn new(name: impl Into<String>, identity: KitIdentity) -> Self {
        Self {
            name: name.into(),
            toolchain_binary_path: PathBuf::new(),
            preferred_generator: None,
            cmake_settings: None,
            environment_variables: None,
            identity,
        }
    }

    /// Create a kit from explicit compiler binaries.
    pub fn with_compilers<L, P>(
        name: impl Into<String>,
        toolchain_binary_path: impl AsRef<Path>,
        compilers: impl IntoIterator<Item = (L, P)>,
    ) -> Self
    where
        L: Into<String>,
        P: Into<PathBuf>,
    {
        let compilers = compilers
            .into_iter()
            .map(|(lang, path)| (lang.into(), path.into()))
            .collect();
        Self {
            toolchain_binary_path: toolchain_binary_path.as_ref().to_path_buf(),
            ..Self::new(name, KitIdentity::Compilers(compilers))
        }
    }

    /// The "let CMake decide" sentinel. Never persisted.
    pub fn unspecified() -> Self {
        Self::new(UNSPECIFIED_KIT_NAME, KitIdentity::Unspecified)
    }

    /// Whether this is the unspecified sentinel kit.
    pub fn is_unspecified(&self) -> bool {
        self.name == UNSPECIFIED_KIT_NAME
    }

    /// Set the preferred generator.
    pub fn with_generator(mut self, generator: CMakeGenerator) -> Self {
        self.preferred_generator = Some(generator);
        self
    }

    /// Compilers of an explicit-compiler kit.
    pub fn compilers(&self) -> Option<&IndexMap<String, PathBuf>> {
        match &self.identity {
            KitIdentity::Compilers(compilers) => Some(compilers),
            _ => None,
        }
    }

    /// Visual Studio instance id of a toolset kit.
    pub fn visual_studio(&self) -> Option<&str> {
        match &self.identity {
            KitIdentity::VisualStudio { instance_id, .. } => Some(instance_id),
            _ => None,
        }
    }

    /// Visual Studio architecture of a toolset kit.
    pub fn visual_studio_architecture(&self) -> Option<&str> {
        match &self.identity {
            KitIdentity::VisualStudio { architecture, .. } => Some(architecture),
            _ => None,
        }
    }

    /// Toolchain file of a toolchain-file kit.
    pub fn toolchain_file(&self) -> Option<&Path> {
        match &self.identity {
            KitIdentity::ToolchainFile(path) => Some(path),
            _ => None,
        }
    }

    /// Label shown when choosing between kits.
    pub fn label(&self) -> &str {
        if self.is_unspecified() {
            "[Unspecified]"
        } else {
            &self.name
        }
    }

    /// Human-readable description of where this kit's compilers come from.
    pub fn description(&self) -> String {
        match &self.identity {
            KitIdentity::ToolchainFile(path) => {
                format!("Kit for toolchain file {}", path.display())
            }
            KitIdentity::VisualStudio { instance_id, architecture } => {
                format!(
                    "Using compilers for {} ({} architecture)",
                    instance_id, architecture
                )
            }
            KitIdentity::Compilers(compilers) => {
                let compilers: Vec<String> = compilers
                    .iter()
                    .map(|(lang, path)| format!("{} = {}", lang, path.display()))
                    .collect();
                format!("Using compilers: {}", compilers.join(", "))
            }
            KitIdentity::Unspecified => {
                "Unspecified (Let CMake guess what compilers and environment to use)".to_string()
            }
        }
    }
}

impl fmt::Display for Kit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Flat wire form of a kit, as stored in `cmake-kits.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KitRecord {
    name: String,
    #[serde(default)]
    toolchain_binary_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferred_generator: Option<CMakeGenerator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cmake_settings: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    environment_variables: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compilers: Option<IndexMap<String, PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visual_studio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visual_studio_architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    toolchain_file: Option<PathBuf>,
}

impl TryFrom<KitRecord> for Kit {
    type Error = String;

    fn try_from(record: KitRecord) -> std::result::Result<Self, Self::Error> {
        let identity = match (
            record.compilers,
            record.visual_studio,
            record.visual_studio_architecture,
            record.toolchain_file,
        ) {
            (None, None, None, None) => KitIdentity::Unspecified,
            (Some(compilers), None, None, None) => KitIdentity::Compilers(compilers),
            (None, Some(instance_id), Some(architecture), None) => KitIdentity::VisualStudio {
                instance_id,
                architecture,
            },
            (None, None, None, Some(file)) => KitIdentity::ToolchainFile(file),
            (None, Some(_), None, None) | (None, None, Some(_), None) => {
                return Err(format!(
                    "kit '{}': visualStudio and visualStudioArchitecture must be given together",
                    record.name
                ));
            }
            _ => {
                return Err(format!(
                    "kit '{}' declares more than one of compilers, visualStudio, toolchainFile",
                    record.name
                ));
            }
        };

        Ok(Kit {
            name: record.name,
            toolchain_binary_path: record.toolchain_binary_path,
            preferred_generator: record.preferred_generator,
            cmake_settings: record.cmake_settings,
            environment_variables: record.environment_variables,
            identity,
        })
    }
}

impl From<Kit> for KitRecord {
    fn from(kit: Kit) -> Self {
        let mut record = KitRecord {
            name: kit.name,
            toolchain_binary_path: kit.toolchain_binary_path,
            preferred_generator: kit.preferred_generator,
            cmake_settings: kit.cmake_settings,
            environment_variables: kit.environment_variables,
            ..Default::default()
        };

        match kit.identity {
            KitIdentity::Compilers(compilers) => record.compilers = Some(compilers),
            KitIdentity::VisualStudio { instance_id, architecture } => {
                record.visual_studio = Some(instance_id);
                record.visual_studio_architecture = Some(architecture);
            }
            KitIdentity::ToolchainFile(file) => record.toolchain_file = Some(file),
            KitIdentity::Unspecified => {}
        }

        record
    }
}
