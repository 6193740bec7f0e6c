//! External command execution for the grid generator script.
//!
//! Provides the [`ScriptExecutor`](executor::ScriptExecutor) seam and its
//! process-spawning implementations. Everything here is free of k-point
//! knowledge so the orchestrator can be tested against a fake executor.

pub mod executor;
pub mod shell;
pub mod subprocess;
