//! Core data structures for modgraph.
//!
//! This module contains the foundational types used throughout modgraph:
//! - Module and target declarations
//! - Declaration file parsing
//! - The module registry and its load phase
//! - Project loading

pub mod manifest;
pub mod module;
pub mod project;
pub mod registry;
pub mod target;

pub use manifest::{DeclarationFile, Manifest, MANIFEST_NAME};
pub use module::{ModuleDefinition, PchMode, Visibility};
pub use project::{find_manifest, ManifestError, Project};
pub use registry::{ModuleEntry, ModuleRegistry, RegistryBuilder};
pub use target::{TargetDefinition, TargetType, VersionTag};
