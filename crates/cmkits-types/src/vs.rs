//! Visual Studio installation records.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Description of a Visual Studio installation as reported by `vswhere`.
///
/// This isn't every property vswhere emits, just the ones kit discovery needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsInstallation {
    /// Stable instance id
    pub instance_id: String,

    /// Product display name, e.g. "Visual Studio Community 2017"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Installation root
    pub installation_path: PathBuf,

    /// Full version, e.g. "15.9.28307.1300"
    pub installation_version: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Whether this is a preview release
    #[serde(default)]
    pub is_prerelease: bool,
}

impl VsInstallation {
    /// Name used for kits built from this installation.
    ///
    /// Prefers the display name (marked " Preview" for prereleases) and falls
    /// back to the instance id.
    pub fn kit_display_name(&self) -> String {
        match &self.display_name {
            Some(name) if self.is_prerelease => format!("{} Preview", name),
            Some(name) => name.clone(),
            None => self.instance_id.clone(),
        }
    }

    /// Major component of `installation_version`.
    pub fn major_version(&self) -> Option<u32> {
        self.installation_version.split('.').next()?.parse().ok()
    }

    /// `Common7/Tools` directory of this installation.
    pub fn common_tools_dir(&self) -> PathBuf {
        self.installation_path.join("Common7").join("Tools")
    }
}
