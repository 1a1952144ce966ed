use anyhow::Result;
use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{self, Command};
use tracing::{debug, error};

use e2e_util::errors::{is_broken_pipe, CommandFailed};
use e2e_util::{print_command, run_and_log_command};

const USAGE: &str = "usage: e2e-run <program> [args...]";

const EXIT_USAGE: i32 = 2;
const EXIT_SIGNALED: i32 = 1;
const EXIT_NOT_STARTED: i32 = 127;

fn main() {
    if let Err(e) = e2e_util::log::init_logging() {
        eprintln!("{:#}", e);
    }

    let mut args = env::args_os().skip(1);
    let Some(program) = args.next() else {
        eprintln!("{}", USAGE);
        process::exit(EXIT_USAGE);
    };

    process::exit(run(program, args.collect()));
}

fn run(program: OsString, args: Vec<OsString>) -> i32 {
    let mut cmd = Command::new(program);
    cmd.args(args);

    print_command(&cmd);

    let (output, code) = match run_and_log_command(&mut cmd) {
        Ok(output) => (output, 0),
        Err(e) => match e.downcast::<CommandFailed>() {
            Ok(failed) => {
                let code = failed.code().unwrap_or(EXIT_SIGNALED);
                (failed.output, code)
            }
            Err(e) => {
                error!("{:#}", e);
                return EXIT_NOT_STARTED;
            }
        },
    };

    if let Err(e) = forward_output(&output) {
        if is_broken_pipe(&e) {
            debug!("stdout closed before output was written");
            return 0;
        }
        error!("{:#}", e);
    }
    code
}

fn forward_output(output: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output)?;
    stdout.flush()?;
    Ok(())
}
