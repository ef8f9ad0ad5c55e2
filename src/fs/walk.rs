//! Directory searches.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::Result;

/// Translate a shell glob into an anchored regex.
///
/// Supports `*`, `?`, `[...]` and `[!...]`; everything else is literal.
fn glob_to_regex(pattern: &str) -> Regex {
    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            '[' => {
                let mut class = String::new();
                let mut closed = false;
                if chars.peek() == Some(&'!') {
                    chars.next();
                    class.push('^');
                }
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    if c == '\\' || c == '[' || (c == '^' && class.is_empty()) {
                        class.push('\\');
                    }
                    class.push(c);
                }
                if closed && !class.is_empty() && class != "^" {
                    re.push('[');
                    re.push_str(&class);
                    re.push(']');
                } else {
                    // Unterminated or empty class: match it literally.
                    re.push_str(&regex::escape("["));
                    re.push_str(&regex::escape(&class));
                    if closed {
                        re.push_str(&regex::escape("]"));
                    }
                }
            }
            c => re.push_str(&regex::escape(&c.to_string())),
        }
    }

    re.push('$');
    // Every piece is escaped or a well-formed class.
    Regex::new(&re).unwrap_or_else(|_| Regex::new(&format!("^{}$", regex::escape(pattern))).unwrap())
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Collect every non-directory entry under `dir` whose name matches
/// `pattern`, at any depth.
///
/// Dot-prefixed files and directories (`.git`, `.svn`, ...) are skipped.
/// Results come breadth-first by directory, sorted by name within each
/// directory. Unreadable directories are skipped.
pub fn find_files(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let matcher = glob_to_regex(pattern);
    let mut todo = VecDeque::from([dir.to_path_buf()]);
    let mut result = Vec::new();

    while let Some(subdir) = todo.pop_front() {
        let entries = match fs::read_dir(&subdir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping unreadable {}: {}", subdir.display(), e);
                continue;
            }
        };

        let mut entries: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| !is_hidden(&entry.file_name().to_string_lossy()))
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let is_dir = match entry.file_type() {
                Ok(ft) if ft.is_symlink() => path.is_dir(),
                Ok(ft) => ft.is_dir(),
                Err(_) => continue,
            };
            if is_dir {
                todo.push_back(path);
            } else if matcher.is_match(&entry.file_name().to_string_lossy()) {
                result.push(path);
            }
        }
    }

    result
}

/// List the entries directly inside `dir` whose name ends with `.ext`.
pub fn files_by_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", ext);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
        .map(|entry| entry.path())
        .collect();
    files.sort();
    Ok(files)
}
