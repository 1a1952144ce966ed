use std::fmt;
use std::process::ExitStatus;

/// A command ran but did not exit successfully.
///
/// Returned inside [`anyhow::Error`]; use `downcast_ref::<CommandFailed>()`
/// to get at the captured output.
#[derive(Debug)]
pub struct CommandFailed {
    pub command_line: String,
    pub status: ExitStatus,
    /// Combined stdout and stderr, in the order the child wrote them.
    pub output: Vec<u8>,
}

impl CommandFailed {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

impl fmt::Display for CommandFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` failed: {}", self.command_line, self.status)
    }
}

impl std::error::Error for CommandFailed {}

pub fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io_error| io_error.kind() == std::io::ErrorKind::BrokenPipe)
    })
}
