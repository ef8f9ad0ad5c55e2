//! Path conversion helpers.

use std::path::{Path, MAIN_SEPARATOR};

use crate::context::FileContext;

/// Directory segment stripped from the base path so uploads never land
/// inside the compiled-template cache.
const COMPILE_DIR_NAME: &str = "templates_c";

/// Append `separator` (default: the OS separator) unless already present.
pub fn add_trailing_slash(name: &str, separator: Option<char>) -> String {
    let separator = separator.unwrap_or(MAIN_SEPARATOR);
    let mut name = name.to_string();
    if !name.ends_with(separator) {
        name.push(separator);
    }
    name
}

/// Derive the base file path from a template compile directory.
///
/// Takes the parent of `template_compile_dir`, drops a trailing
/// `templates_c` segment and adds a trailing separator.
pub fn base_file_path(template_compile_dir: &Path) -> String {
    let mut path = match template_compile_dir.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => template_compile_dir,
    };

    if path.file_name().and_then(|n| n.to_str()) == Some(COMPILE_DIR_NAME) {
        path = path.parent().unwrap_or(Path::new(""));
    }

    add_trailing_slash(&path.to_string_lossy(), None)
}

/// Strip the literal prefix `base` from `directory` if present.
pub fn relativize<'a>(directory: &'a str, base: &str) -> &'a str {
    directory.strip_prefix(base).unwrap_or(directory)
}

/// Whether `child` lies strictly below `parent`.
///
/// With `resolve_symlinks` both paths are canonicalized first; a path that
/// cannot be canonicalized is never a child.
pub fn is_child_path(parent: &Path, child: &Path, resolve_symlinks: bool) -> bool {
    if resolve_symlinks {
        return match (parent.canonicalize(), child.canonicalize()) {
            (Ok(parent), Ok(child)) => is_child_path(&parent, &child, false),
            _ => false,
        };
    }

    child.starts_with(parent) && child.components().count() > parent.components().count()
}

impl FileContext {
    /// Express `directory` relative to the base file path.
    ///
    /// Identity on Windows, for relative input, and for absolute paths
    /// outside the base path.
    pub fn relative_directory<'a>(&self, directory: &'a str) -> &'a str {
        if cfg!(windows) || !directory.starts_with(MAIN_SEPARATOR) {
            return directory;
        }

        relativize(directory, &self.base_path)
    }

    /// Express `directory` as an absolute path under the base file path.
    ///
    /// Identity on Windows and for input that is already absolute.
    pub fn absolute_directory(&self, directory: &str) -> String {
        if cfg!(windows) || directory.starts_with(MAIN_SEPARATOR) {
            return directory.to_string();
        }

        format!("{}{}", self.base_path, directory)
    }
}
