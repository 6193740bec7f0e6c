//! Script execution interface and shared types.
//!
//! Defines [`ScriptExecutor`], the seam between the k-point orchestrator and
//! the process that actually runs the generator script, along with
//! [`ScriptInput`], [`ScriptOutput`], and [`ScriptError`].

use std::fmt;
use std::path::{Path, PathBuf};

/// Input passed to a script executor.
#[derive(Debug, Clone, Default)]
pub struct ScriptInput {
    /// Additional environment variables set for the child process.
    pub env_vars: Vec<(String, String)>,
    /// Working directory for the child process (uses current dir if `None`).
    pub working_directory: Option<PathBuf>,
}

impl ScriptInput {
    /// Input that runs the script inside `dir` with the inherited environment.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            env_vars: Vec::new(),
            working_directory: Some(dir.into()),
        }
    }
}

/// Captured output from a script execution.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ScriptOutput {
    /// Whether the process exited with status zero.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors that prevent a script from being run at all.
///
/// A script that runs and exits non-zero is not an error at this layer; the
/// exit code is reported in [`ScriptOutput`] and judged by the caller.
#[derive(Debug)]
pub enum ScriptError {
    /// The script file was not found at the specified path.
    NotFound(String),
    /// The script file exists but lacks execute permissions.
    PermissionDenied(String),
    /// An I/O error occurred while spawning or communicating with the process.
    IoError(std::io::Error),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Script not found: {path}"),
            Self::PermissionDenied(path) => write!(f, "Permission denied: {path}"),
            Self::IoError(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

/// Trait implemented by anything that can run the generator script.
///
/// The production implementation is [`ShellExecutor`](super::shell::ShellExecutor);
/// tests substitute fakes that inspect the working directory and fabricate
/// output.
pub trait ScriptExecutor: Send + Sync {
    /// Run the script at `script_path` with the given `input`, blocking
    /// until it exits.
    fn execute(&self, script_path: &Path, input: ScriptInput)
        -> Result<ScriptOutput, ScriptError>;
}

impl<E: ScriptExecutor + ?Sized> ScriptExecutor for &E {
    fn execute(
        &self,
        script_path: &Path,
        input: ScriptInput,
    ) -> Result<ScriptOutput, ScriptError> {
        (**self).execute(script_path, input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
