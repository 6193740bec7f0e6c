//! `kpgen-core` -- wrapper around the Java k-point grid generator.
//!
//! Stages VASP inputs into a private working directory, writes the `PRECALC`
//! control file, runs `GridGenerator.jar` through a generated `getKPoints`
//! script, and copies the resulting `KPOINTS` back to the caller.
//!
//! ```no_run
//! use kpgen_core::{GenerateRequest, GeneratorConfig, KpointsGenerator};
//!
//! let generator = KpointsGenerator::new(GeneratorConfig::from_env());
//! let request = GenerateRequest::new(55.0)
//!     .source_directory("example_05")
//!     .param("INCLUDEGAMMA", "AUTO");
//! let kpoints = generator.generate(&request)?;
//! println!("wrote {}", kpoints.display());
//! # Ok::<(), kpgen_core::KpointsError>(())
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod generator;
pub mod prerequisites;
pub mod script;
pub mod scripting;
pub mod staging;

pub use config::GeneratorConfig;
pub use control::ControlParameters;
pub use error::{GenerationError, GenerationFailure, KpointsError};
pub use generator::{generate_kpoints, GenerateRequest, KpointsGenerator};
pub use prerequisites::{check_prerequisites, PrerequisiteCheck, PrerequisiteReport};
