//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub uploads: UploadsConfig,
}

/// Directories and URLs supplied by the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Template compile directory; the base file path is derived from it.
    #[serde(default = "default_template_compile_dir")]
    pub template_compile_dir: PathBuf,

    /// Image upload directory.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Public URL of the image upload directory.
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template_compile_dir: default_template_compile_dir(),
            upload_dir: default_upload_dir(),
            upload_url: default_upload_url(),
        }
    }
}

/// Text handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// Encoding label of legacy (pre-UTF-8) files.
    #[serde(default = "default_legacy_encoding")]
    pub legacy_encoding: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            legacy_encoding: default_legacy_encoding(),
        }
    }
}

/// Upload handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// Extensions an uploaded file may keep.
    #[serde(default = "default_safe_file_extensions")]
    pub safe_file_extensions: Vec<String>,

    /// Whether the mailing approval workflow is enabled.
    #[serde(default)]
    pub mailing_workflow: bool,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            safe_file_extensions: default_safe_file_extensions(),
            mailing_workflow: false,
        }
    }
}

fn default_template_compile_dir() -> PathBuf {
    PathBuf::from("/var/www/files/civicrm/templates_c/")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("/var/www/files/civicrm/persist/contribute/")
}

fn default_upload_url() -> String {
    "http://localhost/files/civicrm/persist/contribute/".to_string()
}

fn default_legacy_encoding() -> String {
    "windows-1252".to_string()
}

fn default_safe_file_extensions() -> Vec<String> {
    [
        "jpg", "jpeg", "png", "gif", "txt", "pdf", "doc", "xls", "rtf", "csv", "ppt", "docx",
        "xlsx", "pptx", "odt", "ods", "odg", "odp", "html", "htm",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
