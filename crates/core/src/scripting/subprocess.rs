//! Shared subprocess management utilities.
//!
//! Provides [`run_command`], the spawn + capture logic used by the
//! executors. Each executor builds a [`std::process::Command`] for its
//! runtime and delegates the actual spawn and I/O here.

use std::process::{Command, Stdio};
use std::time::Instant;

use super::executor::{ScriptError, ScriptInput, ScriptOutput};

/// Spawn `cmd` as a child process, capture stdout/stderr in full, and block
/// until it exits.
///
/// The caller is responsible for setting the command program and arguments
/// before calling this function. Environment variables and working directory
/// from [`ScriptInput`] are applied here. No timeout is enforced.
pub fn run_command(cmd: &mut Command, input: ScriptInput) -> Result<ScriptOutput, ScriptError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    for (key, value) in &input.env_vars {
        cmd.env(key, value);
    }

    if let Some(dir) = &input.working_directory {
        cmd.current_dir(dir);
    }

    let start = Instant::now();

    // `output()` drains both pipes concurrently, so a chatty JVM cannot
    // deadlock on a full stderr buffer.
    let output = cmd.output().map_err(ScriptError::IoError)?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    Ok(ScriptOutput {
        stdout,
        stderr,
        exit_code,
        duration_ms,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
