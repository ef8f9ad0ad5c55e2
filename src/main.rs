//! cms-fileutils - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cms_fileutils::{
    cli::{Args, Command, ResourceCommand},
    config::{validate_config, Config, GrantedCapabilities},
    error::{exit_codes, Error, Result},
    fs::{
        clean_dir, clean_file_name, copy_dir, create_dir, files_by_extension, find_files,
        is_ascii, is_child_path, is_html, relativize, replace_dir, restrict_access,
        restrict_browsing, tempdir, tempnam,
    },
    output::{
        print_answer, print_config_summary, print_error, print_info, print_paths, print_success,
        print_warning,
    },
    FileContext,
};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::from(exit_codes::SUCCESS as u8),
        Ok(false) => ExitCode::from(exit_codes::FAILURE as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            if e.is_fatal() {
                return ExitCode::from(exit_codes::FATAL as u8);
            }
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

fn run() -> Result<bool> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let granted = args.granted_capabilities();
    if !granted.is_empty() {
        let names: Vec<String> = granted.iter().map(|c| c.to_string()).collect();
        tracing::debug!("Granted capabilities: {}", names.join(", "));
    }
    let permissions = GrantedCapabilities::new(granted);
    let ctx = FileContext::new(config, &permissions);

    execute(&ctx, args.command, args.verbose)
}

/// Run one subcommand. `Ok(false)` means the operation reported failure.
fn execute(ctx: &FileContext, command: Command, verbose: bool) -> Result<bool> {
    match command {
        Command::Info => {
            let config = ctx.config();
            print_config_summary(
                ctx.base_file_path(),
                &config.paths.upload_dir.display().to_string(),
                &config.text.legacy_encoding,
            );
            Ok(true)
        }
        Command::InitConfig { path, force } => {
            if path.exists() && !force {
                print_warning(&format!(
                    "{} already exists, pass --force to replace it",
                    path.display()
                ));
                return Ok(false);
            }
            ctx.config().save(&path)?;
            print_success(&format!("Configuration written to {}", path.display()));
            Ok(true)
        }
        Command::Mkdir { path, no_abort } => create_dir(&path, !no_abort),
        Command::Clean { target, keep_root } => {
            clean_dir(&target, !keep_root, verbose, ctx.notifier())
        }
        Command::Copy {
            source,
            destination,
        } => {
            copy_dir(&source, &destination)?;
            Ok(true)
        }
        Command::Replace { from, to } => replace_dir(&from, &to, verbose, ctx.notifier()),
        Command::Find { dir, pattern } => {
            print_paths(&find_files(&dir, &pattern));
            Ok(true)
        }
        Command::List { dir, ext } => {
            print_paths(&files_by_extension(&dir, &ext)?);
            Ok(true)
        }
        Command::IsChild {
            parent,
            child,
            no_resolve,
        } => {
            let answer = is_child_path(&parent, &child, !no_resolve);
            print_answer("child", answer);
            Ok(answer)
        }
        Command::Sniff { path } => {
            print_answer("ascii", is_ascii(&path));
            print_answer("html sniff", is_html(&path));
            Ok(true)
        }
        Command::ToUtf8 { path } => {
            let recoded = ctx.to_utf8(&path);
            if recoded {
                print_info(&format!("Recoded {}", path.display()));
            }
            Ok(recoded)
        }
        Command::SafeExt { ext } => {
            let safe = ctx.is_extension_safe(&ext);
            print_answer("safe", safe);
            Ok(safe)
        }
        Command::MakeName { name } => {
            println!("{}", ctx.make_file_name(&name));
            Ok(true)
        }
        Command::CleanName { name } => {
            println!("{}", clean_file_name(&name));
            Ok(true)
        }
        Command::Relative { path } => {
            println!("{}", ctx.relative_directory(&path));
            Ok(true)
        }
        Command::Absolute { path } => {
            println!("{}", ctx.absolute_directory(&path));
            Ok(true)
        }
        Command::Relativize { path, base } => {
            println!("{}", relativize(&path, &base));
            Ok(true)
        }
        Command::Tempnam { prefix } => {
            println!("{}", tempnam(&prefix)?.display());
            Ok(true)
        }
        Command::Tempdir { prefix } => {
            println!("{}", tempdir(&prefix)?.display());
            Ok(true)
        }
        Command::RestrictAccess { dir, overwrite } => {
            restrict_access(&dir, overwrite)?;
            Ok(true)
        }
        Command::RestrictBrowsing { dir } => {
            let placed = restrict_browsing(&dir);
            print_info(&format!("Placed {} index files", placed));
            Ok(true)
        }
        Command::Resource(command) => execute_resource(ctx, command),
    }
}

fn execute_resource(ctx: &FileContext, command: ResourceCommand) -> Result<bool> {
    match command {
        ResourceCommand::Add { name, source } => {
            let contents = std::fs::read(&source)?;
            let path = ctx.add_dynamic_resource(&name, &contents)?;
            print_info(&format!("Stored {}", path.display()));
        }
        ResourceCommand::Path { name } => {
            println!("{}", ctx.dynamic_resource_path(name.as_deref()).display());
        }
        ResourceCommand::Url { name } => {
            println!("{}", ctx.dynamic_resource_url(&name)?);
        }
        ResourceCommand::Flush => {
            let removed = ctx.flush_dynamic_resources()?;
            print_info(&format!("Removed {} dynamic resources", removed));
        }
    }
    Ok(true)
}
