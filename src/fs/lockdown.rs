//! Keep web clients out of private or generated directories.

use std::fs;
use std::path::Path;

use crate::error::Result;

pub const ACCESS_RULE_FILE: &str = ".htaccess";
pub const PLACEHOLDER_INDEX: &str = "index.html";

const DENY_ALL_RULE: &str = "<Files \"*\">\n  Order allow,deny\n  Deny from all\n</Files>\n\n";

/// Plant a deny-all `.htaccess` in `dir`.
///
/// An existing rule file is kept unless `overwrite`. Empty or missing
/// directories are left alone: an empty path would put the rule at the
/// site root.
pub fn restrict_access(dir: &Path, overwrite: bool) -> Result<()> {
    if dir.as_os_str().is_empty() || !dir.is_dir() {
        return Ok(());
    }

    let rule_file = dir.join(ACCESS_RULE_FILE);
    if overwrite || !rule_file.exists() {
        fs::write(&rule_file, DENY_ALL_RULE)?;
        tracing::info!("Restricted access to {}", dir.display());
    }

    Ok(())
}

/// Put an empty `index.html` in `dir` and every directory below it so the
/// web server never renders a listing. Existing index files are kept.
///
/// Best effort: returns how many placeholders were written.
pub fn restrict_browsing(dir: &Path) -> usize {
    let writable = fs::metadata(dir)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false);
    if !writable {
        return 0;
    }

    let mut placed = 0;
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let index = current.join(PLACEHOLDER_INDEX);
        if !index.exists() {
            match fs::write(&index, "") {
                Ok(()) => placed += 1,
                Err(e) => tracing::debug!("Cannot write {}: {}", index.display(), e),
            }
        }

        let Ok(entries) = fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.filter_map(|entry| entry.ok()) {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                pending.push(entry.path());
            }
        }
    }

    placed
}
