//! The `cmake-kits.json` kit store.
//!
//! Reading is forgiving: a missing, unparsable, or invalid file yields no
//! kits and a logged error, never a failure. Writing is normalised: the
//! unspecified sentinel is dropped and kits are sorted by name.

use cmkits_core::util::data::{parse_permissive_json, to_pretty_json};
use cmkits_types::{Kit, Result};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

static KITS_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(include_str!("../schemas/kits-schema.json"))
        .expect("invalid kits schema JSON");
    JSONSchema::compile(&schema).expect("invalid kits schema")
});

/// A kit list persisted as JSON.
#[derive(Debug, Clone)]
pub struct KitStore {
    path: PathBuf,
}

impl KitStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists.
    pub async fn exists(&self) -> Result<bool> {
        cmkits_core::util::fs::exists(&self.path).await
    }

    /// Read all kits.
    pub async fn load(&self) -> Vec<Kit> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Not reading non-existent kits file: {:?}", self.path);
                return Vec::new();
            }
            Err(e) => {
                error!("Failed to read kits file {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        debug!("Reading kits file {:?}", self.path);
        let kits = parse_kits(&content, &self.path);
        info!("Loaded {} kit(s) from {:?}", kits.len(), self.path);
        kits
    }

    /// Replace the file's contents with `kits`.
    pub async fn save(&self, kits: &[Kit]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = to_pretty_json(&normalized(kits))?;
        tokio::fs::write(&self.path, content).await?;

        debug!("Saved {} kit(s) to {:?}", kits.len(), self.path);
        Ok(())
    }
}

/// Kits as they are written: without the sentinel, ordered by name.
fn normalized(kits: &[Kit]) -> Vec<&Kit> {
    let mut kits: Vec<&Kit> = kits.iter().filter(|kit| !kit.is_unspecified()).collect();
    kits.sort_by(|a, b| a.name.cmp(&b.name));
    kits
}

fn parse_kits(content: &str, path: &Path) -> Vec<Kit> {
    let raw = match parse_permissive_json(content) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to parse {:?}: {}", path, e);
            return Vec::new();
        }
    };

    if let Err(errors) = KITS_SCHEMA.validate(&raw) {
        error!("Invalid kits file {:?}:", path);
        for e in errors {
            error!(" >> {}: {}", e.instance_path, e);
        }
        return Vec::new();
    }

    let Value::Array(items) = raw else {
        return Vec::new();
    };

    let kits: std::result::Result<Vec<Kit>, _> = items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(serde_json::from_value::<Kit>)
        .collect();

    match kits {
        Ok(kits) => kits,
        Err(e) => {
            error!("Invalid kits file {:?}: {}", path, e);
            Vec::new()
        }
    }
}
