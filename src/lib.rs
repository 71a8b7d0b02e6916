//! modgraph - module dependency resolution for multi-target game builds
//!
//! This crate loads module and target declarations into an immutable
//! registry, resolves per-module dependency views, and compiles targets into
//! ordered, duplicate-free build graphs.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test fixtures for modgraph unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// builds projects in memory without touching the filesystem.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{BuildGraph, BuildUnit, CompileError, TargetCompiler};
pub use crate::core::{
    ModuleDefinition, ModuleRegistry, PchMode, Project, RegistryBuilder, TargetDefinition,
    TargetType, Visibility,
};
pub use crate::resolver::{ModuleResolver, ResolveError};
pub use crate::util::context::GlobalContext;
