//! K-point grid generation orchestrator.
//!
//! Coordinates one end-to-end run of the external generator:
//! 1. Create a private working area (deleted on every exit path).
//! 2. Stage `POSCAR` / `INCAR` from the source directory when present.
//! 3. Write `PRECALC`.
//! 4. Write the `getKPoints` script.
//! 5. Run it through the configured [`ScriptExecutor`].
//! 6. Verify `KPOINTS` exists and copy it to the destination.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::config::GeneratorConfig;
use crate::control::ControlParameters;
use crate::error::{GenerationError, GenerationFailure, KpointsError};
use crate::script::InvocationScript;
use crate::scripting::executor::{ScriptExecutor, ScriptInput};
use crate::scripting::shell::ShellExecutor;
use crate::staging;

/// Prefix of the per-run temporary directory.
const WORK_DIR_PREFIX: &str = "kpoints-";

/// One generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub control: ControlParameters,
    /// Directory holding `POSCAR`/`INCAR` and receiving the output.
    /// `None` means the current working directory.
    pub source_directory: Option<PathBuf>,
    pub output_filename: String,
}

impl GenerateRequest {
    pub fn new(min_distance: f64) -> Self {
        Self {
            control: ControlParameters::new(min_distance),
            source_directory: None,
            output_filename: staging::OUTPUT_FILE_NAME.to_string(),
        }
    }

    pub fn source_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_directory = Some(dir.into());
        self
    }

    /// Append a `PRECALC` directive after `MINDISTANCE`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.control.extra.insert(key.into(), value.into());
        self
    }

    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.control
            .extra
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = name.into();
        self
    }

    fn resolve_source_directory(&self) -> Result<PathBuf, KpointsError> {
        match &self.source_directory {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir()
                .map_err(KpointsError::io("resolving the current directory")),
        }
    }
}

/// Runs the external grid generator for [`GenerateRequest`]s.
#[derive(Debug, Clone)]
pub struct KpointsGenerator<E = ShellExecutor> {
    config: GeneratorConfig,
    executor: E,
}

impl KpointsGenerator<ShellExecutor> {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_executor(config, ShellExecutor)
    }
}

impl<E: ScriptExecutor> KpointsGenerator<E> {
    pub fn with_executor(config: GeneratorConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a `KPOINTS` file and return the path it was copied to.
    ///
    /// The script's exit status is not trusted on its own: a zero exit with
    /// no `KPOINTS` in the working area is still a
    /// [`GenerationError`]. Nothing is written to the destination unless the
    /// whole run succeeds.
    pub fn generate(&self, request: &GenerateRequest) -> Result<PathBuf, KpointsError> {
        request.control.validate()?;
        let source_dir = request.resolve_source_directory()?;

        let work_dir = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir()
            .map_err(KpointsError::io("creating the working directory"))?;
        let work = work_dir.path();

        let staged = staging::stage_inputs(&source_dir, work)?;
        tracing::debug!(working_dir = %work.display(), ?staged, "Inputs staged");

        request.control.write_to(work)?;
        tracing::debug!(working_dir = %work.display(), "Control file written");

        let script_path = InvocationScript::from_config(&self.config).write_to(work)?;
        tracing::debug!(script = %script_path.display(), "Invocation script ready");

        let output = self
            .executor
            .execute(&script_path, ScriptInput::in_dir(work))?;
        tracing::debug!(
            exit_code = output.exit_code,
            duration_ms = output.duration_ms,
            "Generator script exited",
        );

        if !output.succeeded() {
            tracing::warn!(exit_code = output.exit_code, "K-points generation failed");
            return Err(GenerationError {
                kind: GenerationFailure::NonZeroExit {
                    exit_code: output.exit_code,
                },
                stdout: output.stdout,
                stderr: output.stderr,
            }
            .into());
        }

        let Some(artifact) = staging::find_output(work) else {
            tracing::warn!("Generator exited cleanly but produced no KPOINTS file");
            return Err(GenerationError {
                kind: GenerationFailure::MissingOutput,
                stdout: output.stdout,
                stderr: output.stderr,
            }
            .into());
        };

        let destination = source_dir.join(&request.output_filename);
        staging::deliver_output(&artifact, &destination)?;
        tracing::info!(
            destination = %destination.display(),
            duration_ms = output.duration_ms,
            "K-points file generated",
        );

        // `work_dir` is dropped here (and on every early return above),
        // removing the working area recursively.
        Ok(destination)
    }
}

/// Generate a `KPOINTS` file using configuration from the environment.
///
/// `vasp_directory` defaults to the current directory and `output_file` to
/// `KPOINTS`. `precalc_params` are written after `MINDISTANCE` in iteration
/// order.
pub fn generate_kpoints(
    min_distance: f64,
    vasp_directory: Option<&Path>,
    precalc_params: Option<&IndexMap<String, String>>,
    output_file: Option<&str>,
) -> Result<PathBuf, KpointsError> {
    let request = request_from_options(min_distance, vasp_directory, precalc_params, output_file);
    KpointsGenerator::new(GeneratorConfig::from_env()).generate(&request)
}

fn request_from_options(
    min_distance: f64,
    vasp_directory: Option<&Path>,
    precalc_params: Option<&IndexMap<String, String>>,
    output_file: Option<&str>,
) -> GenerateRequest {
    let mut request = GenerateRequest::new(min_distance);
    if let Some(dir) = vasp_directory {
        request = request.source_directory(dir);
    }
    if let Some(params) = precalc_params {
        request = request.params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    if let Some(name) = output_file {
        request = request.output_filename(name);
    }
    request
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
