//! Module resolution.
//!
//! The resolver answers questions about single modules (what does a module
//! depend on, what can its compilation units see) and builds the module
//! graph the target compiler orders. Everything here is a pure read over a
//! frozen [`ModuleRegistry`](crate::core::ModuleRegistry).

pub mod errors;
pub mod graph;
pub mod resolve;

pub use errors::{similar_names, ErrorKind, ResolveError};
pub use graph::{ModuleGraph, UnknownPolicy};
pub use resolve::ModuleResolver;
