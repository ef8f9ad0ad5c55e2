//! Configuration module for cms-fileutils.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation
//! - Capabilities and permission providers

pub mod capability;
pub mod loader;
pub mod validation;

pub use capability::{Capability, GrantedCapabilities, NoCapabilities, PermissionProvider};
pub use loader::{Config, PathsConfig, TextConfig, UploadsConfig};
pub use validation::validate_config;
