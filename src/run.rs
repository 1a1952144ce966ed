use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, error, info, instrument};

use crate::command::CommandLine;
use crate::errors::CommandFailed;

/// Run `cmd` to completion, logging the command line before and the elapsed
/// time after.
///
/// Stdout and stderr are captured together, interleaved as the child wrote
/// them. Returns the captured bytes if the command exited successfully. A
/// command that ran but failed comes back as [`CommandFailed`], carrying its
/// output; a command that could not be started comes back as the underlying
/// I/O error.
///
/// Any stdin, stdout or stderr configured on `cmd` is replaced: stdin reads
/// from the null device, stdout and stderr go to the capture.
#[instrument(level = "debug", skip(cmd), fields(program = ?cmd.get_program()))]
pub fn run_and_log_command(cmd: &mut Command) -> Result<Vec<u8>> {
    let command_line = cmd.command_line();
    let start = Instant::now();
    info!("$ {}", command_line);

    let result = capture_combined_output(cmd, &command_line);

    log_completion(&command_line, start.elapsed());

    let (status, output) = result?;
    check_status(command_line, status, output)
}

/// Async version of [`run_and_log_command`] for a tokio command.
#[instrument(level = "debug", skip(cmd), fields(program = ?cmd.as_std().get_program()))]
pub async fn run_and_log_command_async(cmd: &mut tokio::process::Command) -> Result<Vec<u8>> {
    let command_line = cmd.command_line();
    let start = Instant::now();
    info!("$ {}", command_line);

    let result = capture_combined_output_async(cmd, &command_line).await;

    log_completion(&command_line, start.elapsed());

    let (status, output) = result?;
    check_status(command_line, status, output)
}

fn capture_combined_output(cmd: &mut Command, command_line: &str) -> Result<(ExitStatus, Vec<u8>)> {
    let mut capture = capture_file()?;
    cmd.stdin(Stdio::null())
        .stdout(capture.try_clone()?)
        .stderr(capture.try_clone()?);

    let status = cmd
        .status()
        .map_err(|e| {
            error!(?e, "Failed to start command");
            e
        })
        .with_context(|| format!("failed to run `{}`", command_line))?;

    let mut output = Vec::new();
    capture.seek(SeekFrom::Start(0))?;
    capture
        .read_to_end(&mut output)
        .context("failed to read command output")?;
    Ok((status, output))
}

async fn capture_combined_output_async(
    cmd: &mut tokio::process::Command,
    command_line: &str,
) -> Result<(ExitStatus, Vec<u8>)> {
    let capture = capture_file()?;
    cmd.stdin(Stdio::null())
        .stdout(capture.try_clone()?)
        .stderr(capture.try_clone()?);

    let status = cmd
        .status()
        .await
        .map_err(|e| {
            error!(?e, "Failed to start command");
            e
        })
        .with_context(|| format!("failed to run `{}`", command_line))?;

    let mut capture = tokio::fs::File::from_std(capture);
    let mut output = Vec::new();
    capture.seek(SeekFrom::Start(0)).await?;
    capture
        .read_to_end(&mut output)
        .await
        .context("failed to read command output")?;
    Ok((status, output))
}

// Both stdio handles point at the same open file, so they share one offset
// and the child's writes land in order.
fn capture_file() -> Result<File> {
    tempfile::tempfile().context("failed to create output capture file")
}

fn log_completion(command_line: &str, elapsed: Duration) {
    info!(
        elapsed_ms = elapsed_millis(elapsed),
        "#### $ {} completed in {}",
        command_line,
        humantime::format_duration(elapsed)
    );
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn check_status(command_line: String, status: ExitStatus, output: Vec<u8>) -> Result<Vec<u8>> {
    if status.success() {
        return Ok(output);
    }

    debug!(%status, output_len = output.len(), "Command exited unsuccessfully");
    Err(CommandFailed {
        command_line,
        status,
        output,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_millis() {
        assert_eq!(elapsed_millis(Duration::from_micros(1_500)), 1);
        assert_eq!(elapsed_millis(Duration::from_secs(90)), 90_000);
    }

    #[test]
    fn test_elapsed_millis_saturates() {
        assert_eq!(elapsed_millis(Duration::MAX), u64::MAX);
    }
}
