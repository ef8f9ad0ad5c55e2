//! cms-fileutils - filesystem helpers for a web content-management application.
//!
//! Small, synchronous utilities over the local filesystem.
//!
//! # Features
//!
//! - Directory creation, cleanup, copy and replacement
//! - Recursive glob search that skips hidden entries
//! - ASCII/HTML sniffing and in-place recoding to UTF-8
//! - Safe upload names with fingerprinting and extension neutralizing
//! - Relative/absolute conversion against a configured base path
//! - Temp files, directory lockdown and a dynamic resource cache
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cms_fileutils::{Config, FileContext, NoCapabilities};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let ctx = FileContext::new(config, &NoCapabilities);
//!
//!     let stored_as = ctx.make_file_name("invoice.pdf");
//!     ctx.add_dynamic_resource("site.css", b"body{}")?;
//!     println!("{} -> {}", stored_as, ctx.dynamic_resource_url("site.css")?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod output;

// Re-exports for convenience
pub use config::{Capability, Config, GrantedCapabilities, NoCapabilities, PermissionProvider};
pub use context::FileContext;
pub use error::{Error, Result};
pub use output::{ConsoleNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier};
