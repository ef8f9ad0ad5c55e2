//! Filesystem module.
//!
//! Provides:
//! - Directory creation, cleanup, copy and replacement
//! - Recursive searches
//! - ASCII/HTML sniffing and UTF-8 recoding
//! - Filename safety and generation
//! - Path conversion
//! - Temp allocation, access lockdown and the dynamic resource directory

pub mod classify;
pub mod dirs;
pub mod lockdown;
pub mod naming;
pub mod paths;
pub mod resources;
pub mod temp;
pub mod walk;

pub use classify::{is_ascii, is_html};
pub use dirs::{clean_dir, copy_dir, create_dir, replace_dir};
pub use lockdown::{restrict_access, restrict_browsing};
pub use naming::{check_plain_file_name, clean_file_name, fingerprint, munge};
pub use paths::{add_trailing_slash, base_file_path, is_child_path, relativize};
pub use temp::{tempdir, tempnam, DEFAULT_TEMP_PREFIX};
pub use walk::{files_by_extension, find_files};
