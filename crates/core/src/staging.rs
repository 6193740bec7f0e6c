//! Moving files into and out of the working area.

use std::path::{Path, PathBuf};

use crate::error::KpointsError;

/// VASP inputs copied into the working area when present.
pub const INPUT_FILES: [&str; 2] = ["POSCAR", "INCAR"];

/// File the generator writes inside the working area.
pub const OUTPUT_FILE_NAME: &str = "KPOINTS";

/// Copy each of [`INPUT_FILES`] from `source_dir` into `work_dir` if it exists.
///
/// Returns the names that were copied. A missing file is skipped; the
/// generator script decides whether that is fatal. A path that exists but
/// is not a regular file fails the copy.
pub fn stage_inputs(
    source_dir: &Path,
    work_dir: &Path,
) -> Result<Vec<&'static str>, KpointsError> {
    let mut staged = Vec::with_capacity(INPUT_FILES.len());
    for name in INPUT_FILES {
        let src = source_dir.join(name);
        if !src.exists() {
            tracing::debug!(
                file = name,
                source = %source_dir.display(),
                "Input not present, skipping",
            );
            continue;
        }
        std::fs::copy(&src, work_dir.join(name))
            .map_err(KpointsError::io(format!("copying {}", src.display())))?;
        staged.push(name);
    }
    Ok(staged)
}

/// Path of the generator's output inside `work_dir`, if it was produced.
pub fn find_output(work_dir: &Path) -> Option<PathBuf> {
    let path = work_dir.join(OUTPUT_FILE_NAME);
    path.is_file().then_some(path)
}

/// Copy the produced artifact to `destination`, replacing any existing file.
pub fn deliver_output(artifact: &Path, destination: &Path) -> Result<(), KpointsError> {
    std::fs::copy(artifact, destination)
        .map_err(KpointsError::io(format!("copying output to {}", destination.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_only_present_inputs() {
        let src = tempfile::tempdir().expect("source dir");
        let work = tempfile::tempdir().expect("work dir");
        std::fs::write(src.path().join("POSCAR"), "Si\n").expect("write POSCAR");

        let staged = stage_inputs(src.path(), work.path()).expect("stage");
        assert_eq!(staged, ["POSCAR"]);
        assert_eq!(
            std::fs::read_to_string(work.path().join("POSCAR")).expect("read"),
            "Si\n"
        );
        assert!(!work.path().join("INCAR").exists());
    }

    #[test]
    fn empty_source_is_not_an_error() {
        let src = tempfile::tempdir().expect("source dir");
        let work = tempfile::tempdir().expect("work dir");
        let staged = stage_inputs(src.path(), work.path()).expect("stage");
        assert!(staged.is_empty());
    }

    #[test]
    fn nonexistent_source_is_not_an_error() {
        let work = tempfile::tempdir().expect("work dir");
        let staged =
            stage_inputs(&work.path().join("no-such-dir"), work.path()).expect("stage");
        assert!(staged.is_empty());
    }

    #[test]
    fn directory_in_place_of_input_is_an_error() {
        let src = tempfile::tempdir().expect("source dir");
        let work = tempfile::tempdir().expect("work dir");
        std::fs::create_dir(src.path().join("POSCAR")).expect("mkdir POSCAR");

        let err = stage_inputs(src.path(), work.path()).expect_err("should fail");
        assert!(matches!(err, KpointsError::Io { .. }), "{err:?}");
        assert!(err.to_string().contains("POSCAR"));
    }

    #[test]
    fn find_output_requires_a_file() {
        let work = tempfile::tempdir().expect("work dir");
        assert_eq!(find_output(work.path()), None);

        std::fs::create_dir(work.path().join("KPOINTS")).expect("mkdir");
        assert_eq!(find_output(work.path()), None);
    }

    #[test]
    fn deliver_overwrites_destination() {
        let work = tempfile::tempdir().expect("work dir");
        let artifact = work.path().join("KPOINTS");
        std::fs::write(&artifact, "new grid\n").expect("write artifact");
        let dest = work.path().join("KPOINTS.out");
        std::fs::write(&dest, "old grid, much longer than the new one\n").expect("write old");

        deliver_output(&artifact, &dest).expect("deliver");
        assert_eq!(std::fs::read_to_string(dest).expect("read"), "new grid\n");
    }
}
