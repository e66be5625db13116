use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// What a finished external tool left behind.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub status: String,
    pub stderr: String,
}

/// Seam for every external program the pipelines shell out to.
pub trait ProcessRunner {
    /// Run `program` to completion and capture its exit status and stderr.
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput>;

    /// Whether `program` can be started at all.
    fn probe(&self, program: &str, version_arg: &str) -> bool;
}

/// Runs tools through `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
        log::debug!("Running {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ToolOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn probe(&self, program: &str, version_arg: &str) -> bool {
        Command::new(program)
            .arg(version_arg)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// Run a tool and turn a spawn failure or non-zero exit into an [`Error`].
pub fn run_checked<R: ProcessRunner + ?Sized>(
    runner: &R,
    program: &str,
    args: &[String],
) -> Result<()> {
    let output = runner.run(program, args).map_err(|source| Error::Spawn {
        program: program.to_string(),
        source,
    })?;

    if !output.success {
        return Err(Error::ToolFailed {
            program: program.to_string(),
            status: output.status,
            stderr: output.stderr,
        });
    }
    Ok(())
}
