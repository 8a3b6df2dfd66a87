//! Configuration management for cmkits.
//!
//! This module provides multi-layer configuration support with:
//! - File-based configuration (YAML)
//! - Environment variable overrides (`CMKITS_*`)
//! - Programmatic updates
//! - Schema validation
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Environment variables
//! 2. Programmatically set values
//! 3. Values loaded from file
//! 4. Default values
//!
//! ## Example
//!
//! ```rust,no_run
//! use cmkits_core::config::KitsConfig;
//!
//! # fn main() -> cmkits_core::Result<()> {
//! let config = KitsConfig::load()?;
//! println!("probe timeout: {:?}", config.probe_timeout());
//! # Ok(())
//! # }
//! ```

use cmkits_types::config::LogConfig;
use cmkits_types::{KitError, MissingCompilerPolicy, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "CMKITS_";

static CONFIG_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../schemas/config-schema.json"))
        .unwrap_or(Value::Bool(true))
});

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values set programmatically
    Set = 2,
    /// Values from environment variables
    Environment = 3,
}

const LAYER_ORDER: [ConfigLayer; 4] = [
    ConfigLayer::Default,
    ConfigLayer::Loaded,
    ConfigLayer::Set,
    ConfigLayer::Environment,
];

/// Main configuration structure with multi-layer support.
///
/// This is the low-level configuration type. For the typed view, see
/// [`KitsConfig`].
#[derive(Clone, Debug)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
    file_path: Option<PathBuf>,
    schema: Option<Value>,
}

impl Config {
    /// Create a new configuration from a file path.
    ///
    /// If the file doesn't exist, an empty configuration is created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut layers = HashMap::new();

        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| KitError::Config(format!("Failed to read config file: {}", e)))?;

            let value = crate::util::data::load_yaml(&content)
                .map_err(|e| KitError::Config(format!("Failed to parse config: {}", e)))?;

            // An empty file parses as null
            if !value.is_null() {
                layers.insert(ConfigLayer::Loaded, value);
            }
        }

        Ok(Self {
            layers,
            file_path: Some(path.to_path_buf()),
            schema: None,
        })
    }

    /// An empty configuration that is not backed by a file.
    pub fn in_memory() -> Self {
        Self {
            layers: HashMap::new(),
            file_path: None,
            schema: None,
        }
    }

    /// Replace the default layer.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.layers.insert(ConfigLayer::Default, defaults);
        self
    }

    /// Fill the environment layer from `vars`.
    ///
    /// `CMKITS_PROBE_TIMEOUT_SECS=5` becomes `probe_timeout_secs: 5`. Values
    /// are parsed as YAML scalars so numbers and booleans keep their type.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut overrides = serde_json::Map::new();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let value = serde_yaml::from_str::<Value>(value.as_ref())
                .ok()
                .filter(|v| !v.is_null() && !v.is_object() && !v.is_array())
                .unwrap_or_else(|| Value::String(value.as_ref().to_string()));
            overrides.insert(name.to_lowercase(), value);
        }

        if !overrides.is_empty() {
            self.layers.insert(ConfigLayer::Environment, Value::Object(overrides));
        }
        self
    }

    /// Fill the environment layer from the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env_vars(std::env::vars())
    }

    /// Get a configuration value by key, respecting layer priority.
    ///
    /// Returns None if the key doesn't exist in any layer.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        for layer in LAYER_ORDER.iter().rev() {
            if let Some(layer_data) = self.layers.get(layer) {
                if let Some(value) = Self::get_value_at_path(layer_data, key) {
                    if let Ok(typed_value) = serde_json::from_value(value.clone()) {
                        return Some(typed_value);
                    }
                }
            }
        }

        None
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| KitError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self
            .layers
            .entry(ConfigLayer::Set)
            .or_insert(Value::Object(Default::default()));

        Self::set_value_at_path(set_layer, key, value)
    }

    /// Save the file, programmatic, and default layers back to the file.
    ///
    /// Environment overrides are never written out.
    pub fn save(&self) -> Result<()> {
        let path = self
            .file_path
            .as_ref()
            .ok_or_else(|| KitError::Config("Cannot save: no file path set".to_string()))?;

        let merged = self.merge_layers(&LAYER_ORDER[..3]);

        let yaml = serde_yaml::to_string(&merged)
            .map_err(|e| KitError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| KitError::Config(format!("Failed to create config directory: {}", e)))?;
        }
        fs::write(path, yaml)
            .map_err(|e| KitError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Merged data from all layers.
    pub fn merged_data(&self) -> Value {
        self.merge_layers(&LAYER_ORDER)
    }

    /// Validate configuration against schema (if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(schema) = &self.schema {
            let instance = self.merged_data();

            let compiled = jsonschema::JSONSchema::compile(schema)
                .map_err(|e| KitError::Config(format!("Invalid schema: {}", e)))?;

            let result = compiled.validate(&instance);
            if let Err(errors) = result {
                let error_msgs: Vec<String> = errors
                    .map(|e| format!("{}: {}", e.instance_path, e))
                    .collect();
                return Err(KitError::Config(format!(
                    "Validation failed: {}",
                    error_msgs.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Set validation schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    fn get_value_at_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
        let mut current = data;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_value_at_path(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = parts.split_last() else {
            return Err(KitError::Config("Empty path".to_string()));
        };
        if last.is_empty() {
            return Err(KitError::Config("Empty path".to_string()));
        }

        // Navigate to parent, creating intermediate objects as needed
        let mut current = data;
        for part in parents {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            let Value::Object(map) = current else {
                cmkits_types::bug!("config layer is not an object after coercion");
            };
            current = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }

        if !current.is_object() {
            *current = Value::Object(Default::default());
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }

        Ok(())
    }

    fn merge_layers(&self, layers: &[ConfigLayer]) -> Value {
        let mut merged = Value::Object(Default::default());

        for layer in layers {
            if let Some(layer_data) = self.layers.get(layer) {
                merged = crate::util::data::deep_merge(merged, layer_data.clone());
            }
        }

        merged
    }
}

/// Typed cmkits settings (`~/.cmkits/config`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitsConfig {
    /// Where discovered kits are persisted
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Where the active kit name is persisted
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Relative path of the toolchain binary directory to look for
    #[serde(default = "default_toolchain_item")]
    pub toolchain_item: String,

    /// Extra directories to search for `toolchain_item` (after the
    /// executable's own directory)
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,

    /// Directories scanned for compilers in addition to the toolchain
    /// directory
    #[serde(default)]
    pub scan_dirs: Vec<PathBuf>,

    /// Time budget for each `<compiler> -v`
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Time budget for each Visual Studio environment script
    #[serde(default = "default_env_script_timeout")]
    pub env_script_timeout_secs: u64,

    /// What to do when a persisted kit's compiler has disappeared
    #[serde(default)]
    pub missing_compiler_policy: MissingCompilerPolicy,

    /// Path of `vswhere.exe`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vswhere_path: Option<PathBuf>,

    /// Log file outputs
    #[serde(default)]
    pub logs: Vec<LogConfig>,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(crate::APP_NAME)
}

fn default_store_path() -> PathBuf {
    data_dir().join("cmake-kits.json")
}

fn default_state_path() -> PathBuf {
    data_dir().join("state.json")
}

fn default_toolchain_item() -> String {
    "toolchain/bin".to_string()
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_env_script_timeout() -> u64 {
    120
}

impl KitsConfig {
    /// Load configuration from the default location, with environment
    /// overrides applied.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path, with environment overrides
    /// applied.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::load(path)?
            .with_process_env()
            .with_schema(CONFIG_SCHEMA.clone());
        Self::from_config(&config)
    }

    /// Build the typed view from a layered [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut kits_config: KitsConfig = serde_json::from_value(config.merged_data())
            .map_err(|e| KitError::Config(format!("Failed to parse config: {}", e)))?;

        kits_config.store_path = crate::util::fs::expand_path(&kits_config.store_path);
        kits_config.state_path = crate::util::fs::expand_path(&kits_config.state_path);
        kits_config.scan_dirs = kits_config
            .scan_dirs
            .iter()
            .map(crate::util::fs::expand_path)
            .collect();
        Ok(kits_config)
    }

    /// Get the default path for the configuration file.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".cmkits")
            .join("config")
    }

    /// Probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Environment script timeout as a [`Duration`].
    pub fn env_script_timeout(&self) -> Duration {
        Duration::from_secs(self.env_script_timeout_secs)
    }
}

impl Default for KitsConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            state_path: default_state_path(),
            toolchain_item: default_toolchain_item(),
            search_roots: Vec::new(),
            scan_dirs: Vec::new(),
            probe_timeout_secs: default_probe_timeout(),
            env_script_timeout_secs: default_env_script_timeout(),
            missing_compiler_policy: MissingCompilerPolicy::default(),
            vswhere_path: None,
            logs: Vec::new(),
        }
    }
}
