//! `PRECALC` control file serialization.
//!
//! The control file is plain `KEY=VALUE` text read by the grid generator.
//! `MINDISTANCE` is always the first line; caller-supplied directives follow
//! in insertion order and are written verbatim.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::KpointsError;

/// File name the generator reads its directives from.
pub const CONTROL_FILE_NAME: &str = "PRECALC";

/// Key of the mandatory first directive.
pub const MIN_DISTANCE_KEY: &str = "MINDISTANCE";

/// Directives for one generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlParameters {
    pub min_distance: f64,
    pub extra: IndexMap<String, String>,
}

impl ControlParameters {
    pub fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            extra: IndexMap::new(),
        }
    }

    /// Reject values that would print as `NaN` or `inf`.
    pub fn validate(&self) -> Result<(), KpointsError> {
        if !self.min_distance.is_finite() {
            return Err(KpointsError::Validation(format!(
                "{MIN_DISTANCE_KEY} must be a finite number, got {}",
                self.min_distance
            )));
        }
        Ok(())
    }

    /// Render the file contents, one newline-terminated line per directive.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{MIN_DISTANCE_KEY}={}", self.min_distance);
        for (key, value) in &self.extra {
            let _ = writeln!(out, "{key}={value}");
        }
        out
    }

    /// Write `PRECALC` into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, KpointsError> {
        let path = dir.join(CONTROL_FILE_NAME);
        std::fs::write(&path, self.render())
            .map_err(KpointsError::io(format!("writing {CONTROL_FILE_NAME}")))?;
        Ok(path)
    }
}
