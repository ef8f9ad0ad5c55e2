//! Filename safety, generation and manipulation.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};
use rand::Rng;
use regex::Regex;

use crate::config::{Capability, PermissionProvider, UploadsConfig};
use crate::context::FileContext;
use crate::error::{Error, Result};

/// Maximum length of a generated name, leaving room for the extension.
pub const MAX_NAME_LENGTH: usize = 240;

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LENGTH: usize = 32;

/// Extension given to uploads whose real extension is not safe.
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// Extensions only trusted callers may keep.
const MARKUP_EXTENSIONS: [&str; 2] = ["html", "htm"];

static FINGERPRINT_COUNTER: AtomicU64 = AtomicU64::new(0);

static FINGERPRINT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_[0-9a-fA-F]{32}(\.[^.]*)$").expect("fingerprint suffix pattern is valid")
});

/// Build the lowercase safe-extension set for a caller.
///
/// `html`/`htm` survive only for callers with mailing access, administrators,
/// or mailing creators when the mailing workflow is enabled.
pub(crate) fn compute_safe_extensions(
    uploads: &UploadsConfig,
    permissions: &dyn PermissionProvider,
) -> HashSet<String> {
    let mut extensions: HashSet<String> = uploads
        .safe_file_extensions
        .iter()
        .map(|ext| ext.to_lowercase())
        .collect();

    let may_upload_markup = permissions.has(Capability::AccessMailing)
        || permissions.has(Capability::Administer)
        || (uploads.mailing_workflow && permissions.has(Capability::CreateMailings));

    if !may_upload_markup {
        for ext in MARKUP_EXTENSIONS {
            extensions.remove(ext);
        }
    }

    extensions
}

/// Replace every run of non-alphanumeric characters with `replacement` and
/// cap the result at `max_len` characters.
pub fn munge(name: &str, replacement: char, max_len: usize) -> String {
    let mut munged = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            munged.push(c);
            in_run = false;
        } else if !in_run {
            munged.push(replacement);
            in_run = true;
        }
    }

    munged.chars().take(max_len).collect()
}

/// 32 lowercase hex characters, unique per call.
pub fn fingerprint() -> String {
    let seed: u64 = rand::thread_rng().gen();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let counter = FINGERPRINT_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Md5::new();
    hasher.update(format!("{}{:x}.{}.{}", seed, nanos, std::process::id(), counter));
    format!("{:x}", hasher.finalize())
}

/// Remove the `_<fingerprint>` segment that sits right before the final
/// extension, if there is one.
pub fn clean_file_name(name: &str) -> String {
    FINGERPRINT_SUFFIX.replace(name, "$1").into_owned()
}

/// Check that `name` is a single plain file name.
///
/// Rejects path separators, traversal, null bytes and blank names.
pub fn check_plain_file_name(name: &str) -> Result<&str> {
    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    if name.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(name)
}

/// Split a path-like name into its base name stem and extension.
fn split_extension(name: &str) -> (&str, &str) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    match basename.rfind('.') {
        Some(dot_pos) => (&basename[..dot_pos], &basename[dot_pos + 1..]),
        None => (basename, ""),
    }
}

/// Munge `base` and append `_<fingerprint>`.
///
/// Only the base is shortened, so the full fingerprint always fits within
/// `MAX_NAME_LENGTH`.
fn fingerprinted(base: &str) -> String {
    let mut name = munge(base, '_', MAX_NAME_LENGTH - FINGERPRINT_LENGTH - 1);
    if !name.ends_with('_') {
        name.push('_');
    }
    name.push_str(&fingerprint());
    name
}

impl FileContext {
    /// Case-insensitive membership in the safe-extension list.
    pub fn is_extension_safe(&self, ext: &str) -> bool {
        self.safe_extensions.contains(&ext.to_lowercase())
    }

    /// Generate a collision-resistant name for an uploaded file.
    ///
    /// Safe extensions are kept. Anything else is folded into the name and
    /// replaced by `.unknown`, so `shell.php` can never be served as PHP.
    pub fn make_file_name(&self, original: &str) -> String {
        let (stem, ext) = split_extension(original);

        if self.is_extension_safe(ext) {
            format!("{}.{}", fingerprinted(stem), ext)
        } else {
            format!(
                "{}.{}",
                fingerprinted(&format!("{}_{}", stem, ext)),
                UNKNOWN_EXTENSION
            )
        }
    }
}
