use anyhow::Result;
use tokio::process::Command;

mod common;
use common::init_test_logging;

use e2e_util::{run_and_log_command_async, CommandFailed};

#[tokio::test]
async fn test_async_run_success() -> Result<()> {
    init_test_logging();

    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo out; echo err >&2"]);
    let output = run_and_log_command_async(&mut cmd).await?;
    assert_eq!(output, b"out\nerr\n");

    Ok(())
}

#[tokio::test]
async fn test_async_run_failure() {
    init_test_logging();

    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo partial; exit 42"]);
    let err = run_and_log_command_async(&mut cmd).await.unwrap_err();
    let failed = err.downcast_ref::<CommandFailed>().unwrap();

    assert_eq!(failed.code(), Some(42));
    assert_eq!(failed.output, b"partial\n");
}

#[tokio::test]
async fn test_async_run_missing_executable() {
    init_test_logging();

    let mut cmd = Command::new("e2e-util-no-such-program");
    let err = run_and_log_command_async(&mut cmd).await.unwrap_err();
    assert!(err.downcast_ref::<CommandFailed>().is_none());
}

#[tokio::test]
async fn test_async_runs_concurrently() -> Result<()> {
    init_test_logging();

    let mut first = Command::new("echo");
    first.arg("one");
    let mut second = Command::new("echo");
    second.arg("two");

    let (a, b) = tokio::join!(
        run_and_log_command_async(&mut first),
        run_and_log_command_async(&mut second)
    );
    assert_eq!(a?, b"one\n");
    assert_eq!(b?, b"two\n");

    Ok(())
}

#[tokio::test]
async fn test_async_run_child_reads_empty_stdin() -> Result<()> {
    init_test_logging();

    let output = run_and_log_command_async(&mut Command::new("cat")).await?;
    assert_eq!(output, Vec::<u8>::new());

    Ok(())
}
