pub mod command;
pub mod errors;
pub mod log;
pub mod run;

pub use command::{format_command, print_command, CommandLine};
pub use errors::CommandFailed;
pub use run::{run_and_log_command, run_and_log_command_async};
