//! Shell script executor.
//!
//! Spawns `bash` with the script path as its argument and captures
//! stdout/stderr. Running through the interpreter sidesteps `ETXTBSY` when a
//! freshly written script is exec'd while another thread is forking.

use std::path::Path;

use super::executor::{ScriptError, ScriptExecutor, ScriptInput, ScriptOutput};
use super::subprocess;

/// Executor for shell (bash) scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ScriptExecutor for ShellExecutor {
    fn execute(
        &self,
        script_path: &Path,
        input: ScriptInput,
    ) -> Result<ScriptOutput, ScriptError> {
        if !script_path.is_file() {
            return Err(ScriptError::NotFound(script_path.display().to_string()));
        }

        let mut cmd = std::process::Command::new("bash");
        cmd.arg(script_path);
        subprocess::run_command(&mut cmd, input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
