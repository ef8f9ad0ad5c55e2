//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use std::path::Path;
use url::Url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_dir("template_compile_dir", &config.paths.template_compile_dir)?;
    validate_dir("upload_dir", &config.paths.upload_dir)?;
    validate_upload_url(&config.paths.upload_url)?;
    validate_legacy_encoding(&config.text.legacy_encoding)?;
    validate_extensions(&config.uploads.safe_file_extensions[..])?;

    Ok(())
}

/// Validate a configured directory.
pub fn validate_dir(field: &str, dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    if dir.parent().is_none() {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "The filesystem root cannot be used".to_string(),
        });
    }

    Ok(())
}

/// Validate the public upload URL.
pub fn validate_upload_url(upload_url: &str) -> Result<()> {
    if upload_url.is_empty() {
        return Err(Error::MissingConfig("upload_url".to_string()));
    }

    let url = Url::parse(upload_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::ConfigValidation {
            field: "upload_url".to_string(),
            message: format!("'{}' cannot hold sub-paths", upload_url),
        });
    }

    Ok(())
}

/// Validate the legacy encoding label.
pub fn validate_legacy_encoding(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(Error::MissingConfig("legacy_encoding".to_string()));
    }

    if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
        return Err(Error::ConfigValidation {
            field: "legacy_encoding".to_string(),
            message: format!("Unknown encoding label '{}'", label),
        });
    }

    Ok(())
}

/// Validate the safe-extension list.
pub fn validate_extensions<S: AsRef<str>>(extensions: &[S]) -> Result<()> {
    for ext in extensions {
        let ext = ext.as_ref();
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::ConfigValidation {
                field: "safe_file_extensions".to_string(),
                message: format!(
                    "Extension '{}' must be alphanumeric, without a leading dot",
                    ext
                ),
            });
        }
    }

    Ok(())
}
