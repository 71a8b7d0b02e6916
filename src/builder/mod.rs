//! Target compilation.
//!
//! This module turns target definitions into ordered build graphs.

pub mod compile;
pub mod plan;

pub use compile::{ChainStep, CompileError, TargetCompiler};
pub use plan::{BuildGraph, BuildUnit, UnitOrigin};
