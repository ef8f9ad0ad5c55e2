//! Console output utilities.

use std::path::Path;

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print a list of paths, one per line.
pub fn print_paths<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        println!("{}", path.as_ref().display());
    }
}

/// Print a yes/no answer for a predicate.
pub fn print_answer(label: &str, answer: bool) {
    let value = if answer {
        style("yes").green()
    } else {
        style("no").red()
    };
    println!("{}: {}", style(label).bold(), value);
}

/// Print configuration summary.
pub fn print_config_summary(base_path: &str, upload_dir: &str, legacy_encoding: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Base path: {}", base_path);
    println!("  Uploads:   {}", upload_dir);
    println!("  Encoding:  {}", legacy_encoding);
    println!();
}
