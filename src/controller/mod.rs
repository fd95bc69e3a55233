mod command;
mod console;

pub use command::{Command, HELP};
pub use console::{debug_script, format_event, run_script};
