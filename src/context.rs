//! Explicitly constructed file context.
//!
//! Holds the values derived once from configuration (base file path,
//! safe-extension list) together with the notification sink. Operations
//! that depend on configuration are methods on [`FileContext`]; the rest
//! of the crate is free functions.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, PermissionProvider};
use crate::fs::naming::compute_safe_extensions;
use crate::fs::paths::base_file_path;
use crate::output::{ConsoleNotifier, Notifier};

pub struct FileContext {
    pub(crate) config: Config,
    pub(crate) base_path: String,
    pub(crate) safe_extensions: HashSet<String>,
    notifier: Arc<dyn Notifier>,
}

impl FileContext {
    /// Build a context, computing the base path and safe-extension list.
    ///
    /// The permission provider is consulted here and never again.
    pub fn new(config: Config, permissions: &dyn PermissionProvider) -> Self {
        let base_path = base_file_path(&config.paths.template_compile_dir);
        let safe_extensions = compute_safe_extensions(&config.uploads, permissions);

        tracing::debug!(
            "File context ready: base path {}, {} safe extensions",
            base_path,
            safe_extensions.len()
        );

        Self {
            config,
            base_path,
            safe_extensions,
            notifier: Arc::new(ConsoleNotifier),
        }
    }

    /// Replace the notification sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use another template compile directory, recomputing the base path.
    pub fn with_template_compile_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.paths.template_compile_dir = dir.as_ref().to_path_buf();
        self.base_path = base_file_path(&self.config.paths.template_compile_dir);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// The base file path, always ending with a separator.
    pub fn base_file_path(&self) -> &str {
        &self.base_path
    }
}

impl fmt::Debug for FileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContext")
            .field("base_path", &self.base_path)
            .field("safe_extensions", &self.safe_extensions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Capability, GrantedCapabilities, NoCapabilities};
    use std::path::PathBuf;

    #[test]
    fn test_base_path_is_computed_from_config() {
        let mut config = Config::default();
        config.paths.template_compile_dir = PathBuf::from("/srv/site/templates_c/en_US/");

        let ctx = FileContext::new(config, &NoCapabilities);
        assert_eq!(ctx.base_file_path(), "/srv/site/");
    }

    #[test]
    fn test_template_compile_dir_override() {
        let ctx = FileContext::new(Config::default(), &NoCapabilities)
            .with_template_compile_dir("/var/other/templates_c/en_US");

        assert_eq!(ctx.base_file_path(), "/var/other/");
        assert_eq!(
            ctx.config().paths.template_compile_dir,
            PathBuf::from("/var/other/templates_c/en_US")
        );
    }

    #[test]
    fn test_permissions_are_consulted_once() {
        let admin = GrantedCapabilities::new([Capability::Administer]);
        let ctx = FileContext::new(Config::default(), &admin);
        drop(admin);

        assert!(ctx.is_extension_safe("html"));
    }
}
