//! Advisory check that the generator can run on this machine.
//!
//! Nothing here is consulted by [`KpointsGenerator`](crate::generator::KpointsGenerator);
//! the generator script detects the same conditions itself. This exists to
//! give a friendlier diagnostic before a run.

use std::process::{Command, Stdio};

use serde::Serialize;

use crate::config::{GeneratorConfig, COLLECTIONS_DIR_NAME, JAR_FILE_NAME};

/// Outcome of [`PrerequisiteCheck::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteReport {
    pub ok: bool,
    pub message: String,
    /// First line of `java -version` output, when Java was found.
    pub java_version: Option<String>,
    pub issues: Vec<String>,
}

impl PrerequisiteReport {
    fn from_issues(java_version: Option<String>, issues: Vec<String>) -> Self {
        let ok = issues.is_empty();
        let message = if ok {
            "All prerequisites met.".to_string()
        } else {
            format!("Missing prerequisites: {}", issues.join("; "))
        };
        Self {
            ok,
            message,
            java_version,
            issues,
        }
    }

    /// The `(ok, message)` pair.
    pub fn into_pair(self) -> (bool, String) {
        (self.ok, self.message)
    }
}

/// Probes the Java runtime and the bundled generator resources.
pub struct PrerequisiteCheck;

impl PrerequisiteCheck {
    pub fn run(config: &GeneratorConfig) -> PrerequisiteReport {
        let mut issues = Vec::new();

        let java_version = probe_java(&config.java_command);
        match &java_version {
            Some(version) => tracing::info!(java = %version, "Found Java"),
            None => issues.push("Java is not installed or not in the PATH.".to_string()),
        }

        let jar_path = config.jar_path();
        if jar_path.exists() {
            tracing::info!(path = %jar_path.display(), "Found {JAR_FILE_NAME}");
        } else {
            issues.push(format!("{JAR_FILE_NAME} not found at {}", jar_path.display()));
        }

        let collections = config.collections_dir();
        if collections.is_dir() {
            tracing::info!(path = %collections.display(), "Found {COLLECTIONS_DIR_NAME}");
        } else {
            issues.push(format!(
                "{COLLECTIONS_DIR_NAME} directory not found at {}",
                collections.display()
            ));
        }

        PrerequisiteReport::from_issues(java_version, issues)
    }
}

/// Check prerequisites using configuration from the environment.
pub fn check_prerequisites() -> (bool, String) {
    PrerequisiteCheck::run(&GeneratorConfig::from_env()).into_pair()
}

/// Run `<java> -version`; `Some(first line)` when it exits zero.
///
/// Java prints its version banner to stderr, so that stream is preferred.
fn probe_java(java_command: &str) -> Option<String> {
    let output = Command::new(java_command)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let banner = [&output.stderr, &output.stdout]
        .into_iter()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .find_map(|text| text.lines().next().map(str::to_owned).filter(|l| !l.is_empty()));
    Some(banner.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_resources() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("resource dir");
        std::fs::write(dir.path().join("GridGenerator.jar"), b"").expect("write jar");
        std::fs::create_dir(dir.path().join("minDistanceCollections")).expect("mkdir");
        dir
    }

    #[test]
    fn message_when_everything_is_missing() {
        let dir = tempfile::tempdir().expect("resource dir");
        let mut config = GeneratorConfig::new(dir.path());
        config.java_command = "/nonexistent/kpgen-java".to_string();

        let report = PrerequisiteCheck::run(&config);

        assert!(!report.ok);
        assert_eq!(report.java_version, None);
        assert_eq!(report.issues.len(), 3);
        assert!(report
            .message
            .starts_with("Missing prerequisites: Java is not installed or not in the PATH.; "));
        assert!(report.message.contains(&format!(
            "GridGenerator.jar not found at {}",
            dir.path().join("GridGenerator.jar").display()
        )));
        assert!(report
            .message
            .contains("minDistanceCollections directory not found at"));
    }

    #[cfg(unix)]
    #[test]
    fn all_met_with_working_runtime() {
        let dir = complete_resources();
        let mut config = GeneratorConfig::new(dir.path());
        // `true` ignores its arguments and exits zero.
        config.java_command = "true".to_string();

        let report = PrerequisiteCheck::run(&config);

        assert!(report.ok, "unexpected issues: {:?}", report.issues);
        assert_eq!(report.java_version.as_deref(), Some(""));
        assert_eq!(report.clone().into_pair(), (true, "All prerequisites met.".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn failing_runtime_is_reported() {
        let dir = complete_resources();
        let mut config = GeneratorConfig::new(dir.path());
        config.java_command = "false".to_string();

        let (ok, message) = PrerequisiteCheck::run(&config).into_pair();

        assert!(!ok);
        assert_eq!(
            message,
            "Missing prerequisites: Java is not installed or not in the PATH."
        );
    }

    #[test]
    fn collections_must_be_a_directory() {
        let dir = tempfile::tempdir().expect("resource dir");
        std::fs::write(dir.path().join("minDistanceCollections"), b"").expect("write file");
        let config = GeneratorConfig::new(dir.path());

        let report = PrerequisiteCheck::run(&config);
        assert!(report
            .issues
            .iter()
            .any(|i| i.starts_with("minDistanceCollections directory not found")));
    }

    #[test]
    fn report_serializes_for_cli_output() {
        let report = PrerequisiteReport::from_issues(Some("openjdk 17".into()), vec![]);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["ok"], true);
        assert_eq!(json["message"], "All prerequisites met.");
        assert_eq!(json["java_version"], "openjdk 17");
        assert!(json["issues"].as_array().is_some_and(|a| a.is_empty()));
    }
}
