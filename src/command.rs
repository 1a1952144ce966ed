use std::io::{self, Write};
use std::process::Command;
use tracing::debug;

/// Renders a command the way it would be typed at a shell prompt.
pub trait CommandLine {
    /// Program and arguments joined by single spaces, without quoting.
    fn command_line(&self) -> String;
}

impl CommandLine for Command {
    fn command_line(&self) -> String {
        let program = self.get_program().to_string_lossy();
        let args = self.get_args().map(|arg| arg.to_string_lossy());

        std::iter::once(program)
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl CommandLine for tokio::process::Command {
    fn command_line(&self) -> String {
        self.as_std().command_line()
    }
}

pub fn format_command(cmd: &impl CommandLine) -> String {
    format!("\n$ {}\n", cmd.command_line())
}

/// Print the command to stdout, prefixed with a `$` prompt.
pub fn print_command(cmd: &impl CommandLine) {
    let line = format_command(cmd);
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(line.as_bytes()).and_then(|_| stdout.flush()) {
        debug!(?e, "Failed to print command");
    }
}
