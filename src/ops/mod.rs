//! High-level operations.
//!
//! This module contains the implementation of modgraph commands.

pub mod check;
pub mod compile;

pub use check::{check_project, CheckReport, Problem, Subject};
pub use compile::{compile_targets, CompileOptions, CompileReport, TargetOutcome};
