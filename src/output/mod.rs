//! Output module for console output and notices.
//!
//! Provides:
//! - Colored console output
//! - The notification sink used by directory cleanup

pub mod console;
pub mod notify;

pub use console::{
    print_answer, print_config_summary, print_error, print_info, print_paths, print_success,
    print_warning,
};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier};
