//! Directory creation, cleanup, copy and replacement.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::output::{Notice, Notifier};

/// Ensure `path` and all missing ancestors exist.
///
/// Empty and existing paths succeed without touching the filesystem. On
/// failure, `abort_on_failure` turns the outcome into
/// [`Error::DirectoryCreation`] for the host to act on; otherwise
/// `Ok(false)` is returned.
pub fn create_dir(path: &Path, abort_on_failure: bool) -> Result<bool> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(true);
    }

    match fs::create_dir_all(path) {
        Ok(()) => {
            tracing::debug!("Created directory {}", path.display());
            Ok(true)
        }
        Err(source) if abort_on_failure => Err(Error::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) => {
            tracing::warn!("Could not create directory {}: {}", path.display(), e);
            Ok(false)
        }
    }
}

/// Delete everything below `target`, and `target` itself if `remove_root`.
///
/// Refuses empty paths and the filesystem root. Individual failures do not
/// stop the walk; they are logged, and sent to `notifier` when `verbose`.
/// Symbolic links are removed, never followed.
///
/// Returns `Ok(true)` when every deletion succeeded, `Ok(false)` otherwise
/// (including when `target` is not a directory).
pub fn clean_dir(
    target: &Path,
    remove_root: bool,
    verbose: bool,
    notifier: &dyn Notifier,
) -> Result<bool> {
    clean_dir_with(target, remove_root, verbose, notifier, remove_file)
}

fn remove_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

fn clean_dir_with(
    target: &Path,
    remove_root: bool,
    verbose: bool,
    notifier: &dyn Notifier,
    remove_file: fn(&Path) -> io::Result<()>,
) -> Result<bool> {
    if target.as_os_str().is_empty() || target.parent().is_none() {
        return Err(Error::OverlyBroadDeletion(target.display().to_string()));
    }

    if !target.is_dir() {
        tracing::debug!("Nothing to clean at {}", target.display());
        return Ok(false);
    }

    let report = |message: String| {
        tracing::warn!("{}", message);
        if verbose {
            notifier.notify(Notice::warning(message));
        }
    };

    let mut complete = true;
    let mut pending = vec![target.to_path_buf()];
    // Parents precede their children here, so removal runs back to front.
    let mut visited: Vec<PathBuf> = Vec::new();

    while let Some(dir) = pending.pop() {
        match fs::read_dir(&dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(e) => {
                            report(format!("Unable to read {}: {}", dir.display(), e));
                            complete = false;
                            continue;
                        }
                    };

                    let path = entry.path();
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

                    if is_dir {
                        pending.push(path);
                    } else if let Err(e) = remove_file(&path) {
                        report(format!("Unable to remove file {}: {}", path.display(), e));
                        complete = false;
                    } else {
                        tracing::debug!("Removed file {}", path.display());
                    }
                }
            }
            Err(e) => {
                report(format!("Unable to read {}: {}", dir.display(), e));
                complete = false;
            }
        }
        visited.push(dir);
    }

    for dir in visited.iter().skip(1).rev() {
        if let Err(e) = fs::remove_dir(dir) {
            report(format!("Unable to remove directory {}: {}", dir.display(), e));
            complete = false;
        }
    }

    if remove_root {
        match fs::remove_dir(target) {
            Ok(()) => {
                tracing::info!("Removed directory {}", target.display());
                if verbose {
                    notifier.notify(Notice::success(format!(
                        "Removed directory {}",
                        target.display()
                    )));
                }
            }
            Err(e) => {
                report(format!(
                    "Unable to remove directory {}: {}",
                    target.display(),
                    e
                ));
                complete = false;
            }
        }
    }

    Ok(complete)
}

/// Copy the tree under `source` into `destination`, creating it if needed.
///
/// Existing files are overwritten. Symbolic links to directories are
/// skipped; other links are copied as the file they point to.
pub fn copy_dir(source: &Path, destination: &Path) -> Result<()> {
    let mut pending = vec![(source.to_path_buf(), destination.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to)?;

        for entry in fs::read_dir(&from)? {
            let entry = entry?;
            let path = entry.path();
            let target = to.join(entry.file_name());
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                pending.push((path, target));
            } else if file_type.is_symlink() && path.is_dir() {
                tracing::warn!("Skipping directory link {}", path.display());
            } else {
                fs::copy(&path, &target)?;
                tracing::debug!("Copied {} to {}", path.display(), target.display());
            }
        }
    }

    Ok(())
}

/// Replace `to` with the contents of `from`, then delete `from`.
///
/// Copies instead of renaming so it also works across filesystems. Returns
/// `Ok(false)` if either cleanup fails; a partial copy is not rolled back.
pub fn replace_dir(from: &Path, to: &Path, verbose: bool, notifier: &dyn Notifier) -> Result<bool> {
    replace_dir_with(from, to, verbose, notifier, remove_file)
}

fn replace_dir_with(
    from: &Path,
    to: &Path,
    verbose: bool,
    notifier: &dyn Notifier,
    remove_file: fn(&Path) -> io::Result<()>,
) -> Result<bool> {
    if to.is_dir() && !clean_dir_with(to, true, verbose, notifier, remove_file)? {
        return Ok(false);
    }

    copy_dir(from, to)?;

    if !clean_dir_with(from, true, false, notifier, remove_file)? {
        notifier.notify(Notice::alert(format!(
            "Failed to clean temp dir: {}",
            from.display()
        )));
        return Ok(false);
    }

    tracing::info!("Replaced {} with {}", to.display(), from.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{MemoryNotifier, NoticeLevel};
    use std::collections::BTreeMap;

    /// Relative path -> contents for every file under `root`.
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    let rel = path.strip_prefix(root).unwrap().to_path_buf();
                    files.insert(rel, fs::read(&path).unwrap());
                }
            }
        }
        files
    }

    /// Refuses to delete any file named `locked.txt`.
    fn remove_unlocked(path: &Path) -> io::Result<()> {
        if path.file_name() == Some(std::ffi::OsStr::new("locked.txt")) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        fs::remove_file(path)
    }

    fn make_tree(root: &Path) {
        fs::create_dir_all(root.join("css/vendor")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("index.html"), "<p>hi</p>").unwrap();
        fs::write(root.join("css/site.css"), "body{}").unwrap();
        fs::write(root.join("css/vendor/lib.css"), [0u8, 159, 146, 150]).unwrap();
    }

    #[test]
    fn test_create_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c");

        assert!(create_dir(&path, true).unwrap());
        assert!(path.is_dir());
        assert!(create_dir(&path, true).unwrap());
        assert!(create_dir(Path::new(""), true).unwrap());
    }

    #[test]
    fn test_create_dir_failure_modes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        let path = file.join("sub");

        assert!(!create_dir(&path, false).unwrap());
        let err = create_dir(&path, true).unwrap_err();
        assert!(matches!(err, Error::DirectoryCreation { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_clean_dir_refuses_root_and_empty() {
        let notes = MemoryNotifier::new();
        assert!(matches!(
            clean_dir(Path::new(""), true, true, &notes),
            Err(Error::OverlyBroadDeletion(_))
        ));
        assert!(matches!(
            clean_dir(Path::new("/"), false, true, &notes),
            Err(Error::OverlyBroadDeletion(_))
        ));
        assert!(notes.drain().is_empty());
    }

    #[test]
    fn test_clean_dir_keeps_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        make_tree(&root);
        let notes = MemoryNotifier::new();

        assert!(clean_dir(&root, false, true, &notes).unwrap());
        assert!(root.is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
        assert!(notes.drain().is_empty());
    }

    #[test]
    fn test_clean_dir_removes_root_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        make_tree(&root);
        let notes = MemoryNotifier::new();

        assert!(clean_dir(&root, true, true, &notes).unwrap());
        assert!(!root.exists());

        let notices = notes.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert!(notices[0].message.starts_with("Removed directory"));
    }

    #[test]
    fn test_clean_dir_quiet_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        make_tree(&root);
        let notes = MemoryNotifier::new();

        assert!(clean_dir(&root, true, false, &notes).unwrap());
        assert!(notes.drain().is_empty());
        assert!(!clean_dir(&root, true, false, &notes).unwrap());
    }

    #[test]
    fn test_clean_dir_reports_failures_when_verbose() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        make_tree(&root);
        fs::write(root.join("css/locked.txt"), "x").unwrap();
        let notes = MemoryNotifier::new();

        assert!(!clean_dir_with(&root, true, true, &notes, remove_unlocked).unwrap());
        assert!(root.join("css/locked.txt").is_file());
        assert!(!root.join("index.html").exists());
        assert!(!root.join("css/vendor").exists());

        let notices = notes.drain();
        assert!(!notices.is_empty());
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Warning));
        assert!(notices
            .iter()
            .any(|n| n.message.starts_with("Unable to remove file")));
        assert!(notices
            .iter()
            .any(|n| n.message.starts_with("Unable to remove directory")));
    }

    #[test]
    fn test_clean_dir_failures_stay_quiet_without_verbose() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        make_tree(&root);
        fs::write(root.join("locked.txt"), "x").unwrap();
        let notes = MemoryNotifier::new();

        assert!(!clean_dir_with(&root, false, false, &notes, remove_unlocked).unwrap());
        assert!(root.join("locked.txt").is_file());
        assert!(notes.drain().is_empty());
    }

    #[test]
    fn test_replace_dir_alerts_when_source_cleanup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("staging");
        let to = dir.path().join("live");
        make_tree(&from);
        fs::write(from.join("locked.txt"), "x").unwrap();
        let notes = MemoryNotifier::new();

        assert!(!replace_dir_with(&from, &to, false, &notes, remove_unlocked).unwrap());
        assert!(to.join("css/site.css").is_file());
        assert!(to.join("locked.txt").is_file());

        let notices = notes.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Alert);
        assert!(notices[0].message.starts_with("Failed to clean temp dir"));
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_dir_does_not_follow_links() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("keep.txt"), "keep").unwrap();

        let root = dir.path().join("site");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        assert!(clean_dir(&root, true, false, &MemoryNotifier::new()).unwrap());
        assert!(!root.exists());
        assert!(outside.join("keep.txt").is_file());
    }

    #[test]
    fn test_copy_dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        make_tree(&src);
        let original = snapshot(&src);

        copy_dir(&src, &dst).unwrap();
        assert!(dst.join("empty").is_dir());

        assert!(clean_dir(&src, true, false, &MemoryNotifier::new()).unwrap());
        assert_eq!(snapshot(&dst), original);
    }

    #[test]
    fn test_copy_dir_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        make_tree(&src);
        fs::create_dir_all(dst.join("css")).unwrap();
        fs::write(dst.join("css/site.css"), "old").unwrap();
        fs::write(dst.join("extra.txt"), "stays").unwrap();

        copy_dir(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst.join("css/site.css")).unwrap(), "body{}");
        assert!(dst.join("extra.txt").is_file());
    }

    #[test]
    fn test_replace_dir() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("staging");
        let to = dir.path().join("live");
        make_tree(&from);
        let expected = snapshot(&from);
        fs::create_dir_all(&to).unwrap();
        fs::write(to.join("stale.txt"), "old").unwrap();

        let notes = MemoryNotifier::new();
        assert!(replace_dir(&from, &to, false, &notes).unwrap());
        assert!(!from.exists());
        assert_eq!(snapshot(&to), expected);
        assert!(notes.drain().is_empty());
    }

    #[test]
    fn test_replace_dir_into_new_location() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("staging");
        let to = dir.path().join("nested/live");
        make_tree(&from);

        assert!(replace_dir(&from, &to, false, &MemoryNotifier::new()).unwrap());
        assert!(to.join("css/site.css").is_file());
    }
}
