//! The `getKPoints` invocation script.
//!
//! The generator is driven through a small bash script written into the
//! working area. Its contract with the orchestrator:
//!
//! - `POSCAR` must exist in the working directory, otherwise the script
//!   prints `POSCAR file not found` and exits 1.
//! - A missing `PRECALC` is replaced by an empty one for the run and removed
//!   afterwards.
//! - The Java launcher and `GridGenerator.jar` must both be found, otherwise
//!   the script exits 1 with a diagnostic.
//! - On success the generator writes `KPOINTS`. The JVM's own exit status is
//!   not propagated, so exit 0 does not guarantee that file exists.
//! - `WRITE_LATTICE_VECTORS=true` in `PRECALC` (case-insensitive) echoes
//!   `KPOINTS` to stdout.

use std::path::{Path, PathBuf};

use crate::config::{GeneratorConfig, JAR_FILE_NAME};
use crate::error::KpointsError;

/// File name of the script inside the working area.
pub const SCRIPT_FILE_NAME: &str = "getKPoints";

const SCRIPT_MODE: u32 = 0o755;

const TEMPLATE: &str = r#"#!/bin/bash
# getKPoints driver, regenerated for every run.

JAR_PATH=@@JAR_PATH@@
LATTICE_COLLECTIONS=@@LATTICE_COLLECTIONS@@
JAVA_CMD=@@JAVA_CMD@@
JVM_MIN_HEAP=@@JVM_MIN_HEAP@@
JVM_MAX_HEAP=@@JVM_MAX_HEAP@@

version=@@VERSION@@
echo "Running getKPoints script version ${version}."

warning_message()
{
  echo "*** WARNING: $1 ***"
}

error_message()
{
  echo "*** ERROR: $1 ***"
}

precalc_default="FALSE"
check_precalc()
{
  if [ -f PRECALC ]; then
    precalc_default="FALSE"
  else
    warning_message "No PRECALC file detected. Using default values."
    touch PRECALC
    precalc_default="TRUE"
  fi
}

generate_grid_with_jar()
{
  if ! "${JAVA_CMD}" -version > /dev/null 2>&1; then
    error_message "Local installation of JAVA is not found."
    return 1
  fi

  if [ -z "${JAR_PATH}" ] || [ ! -e "${JAR_PATH}/@@JAR_FILE@@" ]; then
    error_message "Local installation of k-pointGridGenerator is not found."
    return 1
  fi

  echo "Generating grid using local installation at ${JAR_PATH} ..."
  if [ ! -f INCAR ]; then
    warning_message "No INCAR file detected. Using only symmetry information from structure file."
  fi

  "${JAVA_CMD}" -DLATTICE_COLLECTIONS="${LATTICE_COLLECTIONS}" \
    -Xms"${JVM_MIN_HEAP}" -Xmx"${JVM_MAX_HEAP}" \
    -jar "${JAR_PATH}/@@JAR_FILE@@" ./
  return 0
}

output_to_stdout()
{
  if [ -e KPOINTS ]; then
    echo "=============== CONTENT OF KPOINTS ==============="
    cat KPOINTS
  fi
}

check_precalc

if [ ! -f POSCAR ]; then
  error_message "POSCAR file not found! Exit."
  exit 1
fi

if ! generate_grid_with_jar; then
  error_message "Failed to generate k-points grid."
  exit 1
fi

if [ "${precalc_default}" == "TRUE" ]; then
  rm -f PRECALC
elif [ -e PRECALC ]; then
  write_vectors=$(grep -iE "^[ ]*WRITE_LATTICE_VECTORS" ./PRECALC 2> /dev/null \
    | awk -F "[=#]" '{ print tolower($2) }' | tr -d '[:space:]')
  if [ "${write_vectors}" == "true" ]; then
    output_to_stdout
  fi
fi

echo "Finished."
exit 0
"#;

/// Launcher settings baked into one rendered script.
#[derive(Debug, Clone)]
pub struct InvocationScript {
    pub jar_dir: PathBuf,
    pub collections_dir: PathBuf,
    pub java_command: String,
    pub jvm_min_heap: String,
    pub jvm_max_heap: String,
}

impl InvocationScript {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            jar_dir: config.jar_dir().to_path_buf(),
            collections_dir: config.collections_dir(),
            java_command: config.java_command.clone(),
            jvm_min_heap: config.jvm_min_heap.clone(),
            jvm_max_heap: config.jvm_max_heap.clone(),
        }
    }

    /// Script text with every configured value shell-quoted.
    pub fn render(&self) -> String {
        let version = format!("kpgen {}", env!("CARGO_PKG_VERSION"));
        TEMPLATE
            .replace("@@JAR_PATH@@", &shell_quote(&self.jar_dir.to_string_lossy()))
            .replace(
                "@@LATTICE_COLLECTIONS@@",
                &shell_quote(&self.collections_dir.to_string_lossy()),
            )
            .replace("@@JAVA_CMD@@", &shell_quote(&self.java_command))
            .replace("@@JVM_MIN_HEAP@@", &shell_quote(&self.jvm_min_heap))
            .replace("@@JVM_MAX_HEAP@@", &shell_quote(&self.jvm_max_heap))
            .replace("@@VERSION@@", &shell_quote(&version))
            .replace("@@JAR_FILE@@", JAR_FILE_NAME)
    }

    /// Write the script into `dir`, mark it executable, and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, KpointsError> {
        let path = dir.join(SCRIPT_FILE_NAME);
        std::fs::write(&path, self.render())
            .map_err(KpointsError::io(format!("writing {SCRIPT_FILE_NAME}")))?;
        set_executable(&path)?;
        Ok(path)
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), KpointsError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(SCRIPT_MODE))
        .map_err(KpointsError::io(format!("marking {SCRIPT_FILE_NAME} executable")))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), KpointsError> {
    Ok(())
}

/// Single-quote `value` for bash, closing and reopening around embedded quotes.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
