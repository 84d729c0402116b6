//! # cqbot
//!
//! Chat bot runtime on top of the gateway client: prefixed text commands with
//! aliases, paginated help, and a plugin registry.

pub mod bot;
pub mod command;
pub mod help;
pub mod plugin;
pub mod router;

// Re-export commonly used types at crate root
pub use bot::Bot;
pub use command::{Command, CommandContext, CommandFuture, CommandHandler, CommandRegistry};
pub use help::{help_command, page_count, COMMANDS_PER_PAGE, HELP_HEADER};
pub use plugin::{PluginRegistry, UnloadHook};
pub use router::CommandLine;
