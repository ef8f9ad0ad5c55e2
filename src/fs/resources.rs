//! Dynamic resource directory: generated static assets (compiled CSS, JS)
//! kept in one flat, browse-protected directory under the upload area.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use url::Url;

use crate::context::FileContext;
use crate::error::{Error, Result};
use crate::fs::dirs::create_dir;
use crate::fs::lockdown::restrict_browsing;
use crate::fs::naming::check_plain_file_name;
use crate::fs::paths::add_trailing_slash;

pub const DYNAMIC_DIR_NAME: &str = "dynamic";

/// Upload sub-path that is not part of the resource location.
const CONTRIBUTION_SUFFIXES: [&str; 2] = ["/persist/contribute", "\\persist\\contribute"];

impl FileContext {
    /// Path of the dynamic resource directory, or of `file_name` inside it.
    pub fn dynamic_resource_path(&self, file_name: Option<&str>) -> PathBuf {
        let mut upload_dir = self.config.paths.upload_dir.to_string_lossy().into_owned();
        for suffix in CONTRIBUTION_SUFFIXES {
            upload_dir = upload_dir.replace(suffix, "");
        }

        let dir = PathBuf::from(add_trailing_slash(&upload_dir, None)).join(DYNAMIC_DIR_NAME);
        match file_name {
            Some(name) => dir.join(name),
            None => dir,
        }
    }

    /// Public URL of a dynamic resource.
    ///
    /// The name is encoded as a single path segment, so `?` and `#` stay
    /// part of it.
    pub fn dynamic_resource_url(&self, file_name: &str) -> Result<String> {
        let upload_url = self.config.paths.upload_url.replace(CONTRIBUTION_SUFFIXES[0], "");
        let mut url = Url::parse(&add_trailing_slash(&upload_url, Some('/')))?;
        url.path_segments_mut()
            .map_err(|_| Error::ConfigValidation {
                field: "upload_url".to_string(),
                message: format!("'{}' cannot hold sub-paths", upload_url),
            })?
            .pop_if_empty()
            .push(DYNAMIC_DIR_NAME)
            .push(file_name);
        Ok(url.into())
    }

    /// Write a dynamic resource, replacing any file of the same name.
    ///
    /// The directory is created and protected against browsing on first use.
    pub fn add_dynamic_resource(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        let file_name = check_plain_file_name(file_name)?;
        let dir = self.dynamic_resource_path(None);

        if !dir.is_dir() {
            create_dir(&dir, true)?;
            restrict_browsing(&dir);
        }

        let path = dir.join(file_name);
        fs::write(&path, contents)?;
        tracing::debug!("Wrote dynamic resource {}", path.display());
        Ok(path)
    }

    /// Delete every file in the dynamic resource directory.
    ///
    /// Subdirectories are left alone. Returns the number of files removed.
    pub fn flush_dynamic_resources(&self) -> Result<usize> {
        let dir = self.dynamic_resource_path(None);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        tracing::info!("Flushed {} dynamic resources from {}", removed, dir.display());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, NoCapabilities};
    use crate::error::Error;
    use std::path::Path;

    fn make_test_context(upload_dir: &Path) -> FileContext {
        let mut config = Config::default();
        config.paths.upload_dir = upload_dir.join("persist/contribute");
        config.paths.upload_url = "https://example.org/files/persist/contribute/".to_string();
        FileContext::new(config, &NoCapabilities)
    }

    #[test]
    fn test_dynamic_resource_path() {
        let ctx = make_test_context(Path::new("/srv/files"));
        assert_eq!(
            ctx.dynamic_resource_path(None),
            PathBuf::from("/srv/files/dynamic")
        );
        assert_eq!(
            ctx.dynamic_resource_path(Some("a.css")),
            PathBuf::from("/srv/files/dynamic/a.css")
        );
    }

    #[test]
    fn test_dynamic_resource_url() {
        let ctx = make_test_context(Path::new("/srv/files"));
        assert_eq!(
            ctx.dynamic_resource_url("a.css").unwrap(),
            "https://example.org/files/dynamic/a.css"
        );
        assert_eq!(
            ctx.dynamic_resource_url("my styles.css").unwrap(),
            "https://example.org/files/dynamic/my%20styles.css"
        );
        assert_eq!(
            ctx.dynamic_resource_url("a.css?v=1").unwrap(),
            "https://example.org/files/dynamic/a.css%3Fv=1"
        );
        assert_eq!(
            ctx.dynamic_resource_url("print#2.css").unwrap(),
            "https://example.org/files/dynamic/print%232.css"
        );
    }

    #[test]
    fn test_add_then_read_then_flush() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_test_context(dir.path());

        let path = ctx.add_dynamic_resource("a.css", b"body{}").unwrap();
        assert_eq!(path, ctx.dynamic_resource_path(Some("a.css")));
        assert_eq!(
            fs::read_to_string(ctx.dynamic_resource_path(Some("a.css"))).unwrap(),
            "body{}"
        );

        let resource_dir = ctx.dynamic_resource_path(None);
        assert!(resource_dir.join("index.html").is_file());

        ctx.add_dynamic_resource("a.css", b"p{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "p{}");

        assert_eq!(ctx.flush_dynamic_resources().unwrap(), 2);
        assert_eq!(fs::read_dir(&resource_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_flush_without_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_test_context(dir.path());
        assert_eq!(ctx.flush_dynamic_resources().unwrap(), 0);
    }

    #[test]
    fn test_add_rejects_nested_names() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_test_context(dir.path());
        assert!(matches!(
            ctx.add_dynamic_resource("../escape.js", b""),
            Err(Error::InvalidFilename(_))
        ));
    }
}
