//! Temporary files and directories that outlive the current request.
//!
//! Nothing here is removed automatically; the caller owns cleanup.

use std::path::PathBuf;

use crate::error::Result;

pub const DEFAULT_TEMP_PREFIX: &str = "tmp-";

/// Create an empty, uniquely named file in the system temp directory.
pub fn tempnam(prefix: &str) -> Result<PathBuf> {
    let file = tempfile::Builder::new().prefix(prefix).tempfile()?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    tracing::debug!("Allocated temp file {}", path.display());
    Ok(path)
}

/// Create a uniquely named, owner-only directory in the system temp
/// directory.
pub fn tempdir(prefix: &str) -> Result<PathBuf> {
    let path = tempfile::Builder::new().prefix(prefix).tempdir()?.keep();
    tracing::debug!("Allocated temp dir {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempnam_survives() {
        let path = tempnam(DEFAULT_TEMP_PREFIX).unwrap();
        assert!(path.is_file());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(DEFAULT_TEMP_PREFIX));
        assert!(path.starts_with(std::env::temp_dir()));

        let other = tempnam(DEFAULT_TEMP_PREFIX).unwrap();
        assert_ne!(path, other);

        std::fs::remove_file(path).unwrap();
        std::fs::remove_file(other).unwrap();
    }

    #[test]
    fn test_tempdir_survives() {
        let path = tempdir("upload-").unwrap();
        assert!(path.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }

        std::fs::remove_dir(path).unwrap();
    }
}
