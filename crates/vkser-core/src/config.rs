use serde::{Deserialize, Serialize};
use vkser_protocol::Compression;

use crate::error::CoreError;

/// Top-level configuration, loaded from vkser.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VkserConfig {
    #[serde(default)]
    pub serialise: SerialiseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerialiseConfig {
    /// LZ4-compress chunk payloads
    #[serde(default = "default_true")]
    pub compression: bool,
    /// Payloads up to this many bytes are stored uncompressed
    #[serde(default = "default_compression_threshold")]
    pub compression_threshold: usize,
    /// Build a structured tree while reading. Handles stay unresolved.
    #[serde(default)]
    pub structured_export: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when VKSER_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for SerialiseConfig {
    fn default() -> Self {
        Self {
            compression: true,
            compression_threshold: default_compression_threshold(),
            structured_export: false,
        }
    }
}

impl SerialiseConfig {
    pub fn compression(&self) -> Compression {
        if self.compression {
            Compression::Lz4 {
                threshold: self.compression_threshold,
            }
        } else {
            Compression::None
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl VkserConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigError(e.to_string()))
    }

    /// Load configuration from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: &str) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

/// Returns the default config file path based on platform conventions.
/// Search order:
/// 1. System-wide config: `%PROGRAMDATA%\VKSER\vkser.toml` (Windows) or `/etc/vkser/vkser.toml` (Linux/macOS)
/// 2. Local fallback: `./vkser.toml`
pub fn default_config_path() -> String {
    #[cfg(windows)]
    {
        let programdata = std::env::var("PROGRAMDATA")
            .unwrap_or_else(|_| r"C:\ProgramData".to_string());
        let system_path = format!(r"{}\VKSER\vkser.toml", programdata);
        if std::path::Path::new(&system_path).exists() {
            return system_path;
        }
    }
    #[cfg(not(windows))]
    {
        let system_path = "/etc/vkser/vkser.toml";
        if std::path::Path::new(system_path).exists() {
            return system_path.to_string();
        }
    }
    "vkser.toml".to_string()
}

fn default_true() -> bool {
    true
}

fn default_compression_threshold() -> usize {
    vkser_protocol::wire::DEFAULT_COMPRESSION_THRESHOLD
}

fn default_filter() -> String {
    "info".to_string()
}
