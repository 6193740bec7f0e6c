use std::fmt;

use crate::scripting::executor::ScriptError;

/// Why the external generator did not produce a usable `KPOINTS` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The generator script exited with a non-zero status.
    NonZeroExit { exit_code: i32 },
    /// The script exited zero but left no output artifact behind.
    MissingOutput,
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonZeroExit { exit_code } => {
                write!(f, "getKPoints exited with code {exit_code}")
            }
            Self::MissingOutput => write!(f, "KPOINTS file was not generated"),
        }
    }
}

/// The external generator ran but failed; carries its captured output verbatim.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}. Output: {stdout}\nError: {stderr}")]
pub struct GenerationError {
    pub kind: GenerationFailure,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, thiserror::Error)]
pub enum KpointsError {
    #[error("K-points generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not run generator script: {0}")]
    Script(#[from] ScriptError),
}

impl KpointsError {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io { context, source }
    }

    /// The generation failure, if this error came from the generator itself.
    pub fn as_generation(&self) -> Option<&GenerationError> {
        match self {
            Self::Generation(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_embeds_streams_verbatim() {
        let err = GenerationError {
            kind: GenerationFailure::NonZeroExit { exit_code: 1 },
            stdout: "*** ERROR: POSCAR file not found! Exit. ***\n".to_string(),
            stderr: "java: warning".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("getKPoints exited with code 1. Output: "));
        assert!(text.contains("POSCAR file not found! Exit."));
        assert!(text.ends_with("Error: java: warning"));
    }

    #[test]
    fn missing_output_display() {
        let err = KpointsError::from(GenerationError {
            kind: GenerationFailure::MissingOutput,
            stdout: "Finished.".to_string(),
            stderr: String::new(),
        });
        assert_eq!(
            err.to_string(),
            "K-points generation failed: KPOINTS file was not generated. Output: Finished.\nError: "
        );
        assert!(err.as_generation().is_some());
    }

    #[test]
    fn io_context_is_reported() {
        let err = KpointsError::io("copying POSCAR")(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "I/O error while copying POSCAR: disk full");
        assert!(err.as_generation().is_none());
    }
}
