use std::path::{Path, PathBuf};

/// File name of the generator program inside the resource directory.
pub const JAR_FILE_NAME: &str = "GridGenerator.jar";

/// Directory holding the generator's precomputed lattice collections.
pub const COLLECTIONS_DIR_NAME: &str = "minDistanceCollections";

/// Resource directory name looked up next to the running executable.
const DEFAULT_RESOURCE_DIR_NAME: &str = "java_resources";

const DEFAULT_JAVA_COMMAND: &str = "java";
const DEFAULT_JVM_MIN_HEAP: &str = "512m";
const DEFAULT_JVM_MAX_HEAP: &str = "2048m";

/// Where the external generator lives and how to launch it.
///
/// All fields have defaults matching a stock installation where
/// `java_resources/` sits next to the binary and `java` is on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory containing `GridGenerator.jar` and `minDistanceCollections/`.
    pub resource_dir: PathBuf,
    /// Name or path of the Java launcher.
    pub java_command: String,
    /// Initial JVM heap (`-Xms`).
    pub jvm_min_heap: String,
    /// Maximum JVM heap (`-Xmx`).
    pub jvm_max_heap: String,
}

impl GeneratorConfig {
    /// Config rooted at `resource_dir` with default launcher settings.
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            java_command: DEFAULT_JAVA_COMMAND.to_string(),
            jvm_min_heap: DEFAULT_JVM_MIN_HEAP.to_string(),
            jvm_max_heap: DEFAULT_JVM_MAX_HEAP.to_string(),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `KPOINTS_RESOURCE_DIR` | `java_resources` next to the executable   |
    /// | `KPOINTS_JAVA`         | `java`                                    |
    /// | `KPOINTS_JVM_MIN_HEAP` | `512m`                                    |
    /// | `KPOINTS_JVM_MAX_HEAP` | `2048m`                                   |
    pub fn from_env() -> Self {
        let resource_dir = non_empty_env("KPOINTS_RESOURCE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_resource_dir);

        let java_command =
            non_empty_env("KPOINTS_JAVA").unwrap_or_else(|| DEFAULT_JAVA_COMMAND.into());

        let jvm_min_heap =
            non_empty_env("KPOINTS_JVM_MIN_HEAP").unwrap_or_else(|| DEFAULT_JVM_MIN_HEAP.into());

        let jvm_max_heap =
            non_empty_env("KPOINTS_JVM_MAX_HEAP").unwrap_or_else(|| DEFAULT_JVM_MAX_HEAP.into());

        Self {
            resource_dir,
            java_command,
            jvm_min_heap,
            jvm_max_heap,
        }
    }

    /// Expected location of `GridGenerator.jar`.
    pub fn jar_path(&self) -> PathBuf {
        self.resource_dir.join(JAR_FILE_NAME)
    }

    /// Expected location of the lattice collections directory.
    pub fn collections_dir(&self) -> PathBuf {
        self.resource_dir.join(COLLECTIONS_DIR_NAME)
    }

    /// Directory passed to the script as the JAR folder.
    pub fn jar_dir(&self) -> &Path {
        &self.resource_dir
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(default_resource_dir())
    }
}

fn default_resource_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_RESOURCE_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_DIR_NAME))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
