//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{Capability, Config};
use crate::fs::DEFAULT_TEMP_PREFIX;

/// Filesystem maintenance for the CMS file area.
#[derive(Parser, Debug)]
#[command(
    name = "cms-fileutils",
    version,
    about = "Filesystem helpers for the CMS file area",
    long_about = "Runs the CMS filesystem helpers from the shell: directory cleanup and copy,\n\
                  upload name generation, text sniffing, path conversion and the dynamic\n\
                  resource directory."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Template compile directory (the base path is derived from it).
    #[arg(long, env = "CMS_TEMPLATE_COMPILE_DIR")]
    pub template_compile_dir: Option<PathBuf>,

    /// Image upload directory.
    #[arg(long, env = "CMS_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Public URL of the image upload directory.
    #[arg(long, env = "CMS_UPLOAD_URL")]
    pub upload_url: Option<String>,

    /// Encoding of legacy text files.
    #[arg(long, env = "CMS_LEGACY_ENCODING")]
    pub legacy_encoding: Option<String>,

    /// Capabilities granted to the caller (access-mailing, administer,
    /// create-mailings).
    #[arg(long = "capability", value_delimiter = ',', value_parser = Capability::from_str)]
    pub capabilities: Vec<Capability>,

    /// Treat the mailing approval workflow as enabled.
    #[arg(long)]
    pub mailing_workflow: bool,

    /// Report cleanup outcomes as notices.
    #[arg(long, short)]
    pub verbose: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the effective configuration.
    Info,
    /// Write the effective configuration to a TOML file.
    InitConfig {
        #[arg(default_value = "config.toml")]
        path: PathBuf,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Create a directory and any missing parents.
    Mkdir {
        path: PathBuf,
        /// Report failure instead of stopping.
        #[arg(long)]
        no_abort: bool,
    },
    /// Delete everything inside a directory.
    Clean {
        target: PathBuf,
        /// Keep the directory itself.
        #[arg(long)]
        keep_root: bool,
    },
    /// Copy a directory tree.
    Copy {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Replace a directory with the contents of another, consuming it.
    Replace { from: PathBuf, to: PathBuf },
    /// Find files matching a glob, skipping hidden entries.
    Find {
        dir: PathBuf,
        #[arg(default_value = "*")]
        pattern: String,
    },
    /// List files in a directory by extension.
    List { dir: PathBuf, ext: String },
    /// Check whether one path lies below another.
    IsChild {
        parent: PathBuf,
        child: PathBuf,
        /// Compare the paths as written.
        #[arg(long)]
        no_resolve: bool,
    },
    /// Report whether a file is ASCII and whether it passes the HTML sniff.
    Sniff { path: PathBuf },
    /// Recode a file from the legacy encoding to UTF-8, in place.
    ToUtf8 { path: PathBuf },
    /// Check an extension against the safe list.
    SafeExt { ext: String },
    /// Generate a storage name for an uploaded file.
    MakeName { name: String },
    /// Strip the fingerprint from a generated name.
    CleanName { name: String },
    /// Express a path relative to the base path.
    Relative { path: String },
    /// Express a path as absolute under the base path.
    Absolute { path: String },
    /// Strip a literal prefix from a path.
    Relativize { path: String, base: String },
    /// Allocate a temp file.
    Tempnam {
        #[arg(default_value = DEFAULT_TEMP_PREFIX)]
        prefix: String,
    },
    /// Allocate a temp directory.
    Tempdir {
        #[arg(default_value = DEFAULT_TEMP_PREFIX)]
        prefix: String,
    },
    /// Deny all web access to a directory.
    RestrictAccess {
        dir: PathBuf,
        /// Replace an existing rule file.
        #[arg(long)]
        overwrite: bool,
    },
    /// Stop the web server from listing a directory tree.
    RestrictBrowsing { dir: PathBuf },
    /// Manage the dynamic resource directory.
    #[command(subcommand)]
    Resource(ResourceCommand),
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    /// Store a file as a dynamic resource.
    Add {
        name: String,
        /// File whose contents are stored.
        source: PathBuf,
    },
    /// Print the path of a resource, or of the directory.
    Path { name: Option<String> },
    /// Print the public URL of a resource.
    Url { name: String },
    /// Delete every resource.
    Flush,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.template_compile_dir {
            config.paths.template_compile_dir = dir.clone();
        }

        if let Some(dir) = &self.upload_dir {
            config.paths.upload_dir = dir.clone();
        }

        if let Some(url) = &self.upload_url {
            config.paths.upload_url = url.clone();
        }

        if let Some(encoding) = &self.legacy_encoding {
            config.text.legacy_encoding = encoding.clone();
        }

        if self.mailing_workflow {
            config.uploads.mailing_workflow = true;
        }
    }

    /// Capabilities granted on the command line.
    pub fn granted_capabilities(&self) -> Vec<Capability> {
        self.capabilities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_merge_into_config() {
        let args = Args::parse_from([
            "cms-fileutils",
            "--upload-dir",
            "/srv/uploads",
            "--legacy-encoding",
            "iso-8859-2",
            "--capability",
            "administer,access-mailing",
            "--mailing-workflow",
            "info",
        ]);

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.paths.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.text.legacy_encoding, "iso-8859-2");
        assert!(config.uploads.mailing_workflow);
        assert_eq!(
            args.granted_capabilities(),
            vec![Capability::Administer, Capability::AccessMailing]
        );
    }

    #[test]
    fn test_unknown_capability_is_rejected() {
        let result = Args::try_parse_from(["cms-fileutils", "--capability", "root", "info"]);
        assert!(result.is_err());

        let args = Args::parse_from(["cms-fileutils", "--capability", "CREATE_MAILINGS", "info"]);
        assert_eq!(args.granted_capabilities(), vec![Capability::CreateMailings]);
    }

    #[test]
    fn test_subcommand_defaults() {
        let args = Args::parse_from(["cms-fileutils", "init-config"]);
        match args.command {
            Command::InitConfig { path, force } => {
                assert_eq!(path, PathBuf::from("config.toml"));
                assert!(!force);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let args = Args::parse_from(["cms-fileutils", "find", "/srv"]);
        match args.command {
            Command::Find { pattern, .. } => assert_eq!(pattern, "*"),
            other => panic!("unexpected command {:?}", other),
        }

        let args = Args::parse_from(["cms-fileutils", "resource", "path"]);
        assert!(matches!(
            args.command,
            Command::Resource(ResourceCommand::Path { name: None })
        ));
    }
}
