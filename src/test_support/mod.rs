//! Test utilities for modgraph unit tests.
//!
//! [`ProjectBuilder`] assembles a [`Project`] in memory, going through the
//! same load path as files on disk, so tests can describe a registry in a
//! few lines.
//!
//! # Example
//!
//! ```rust,ignore
//! use modgraph::test_support::ProjectBuilder;
//!
//! let project = ProjectBuilder::new("Game")
//!     .externals(&["Core"])
//!     .module("Game", &["Core"], &[])
//!     .target("Game", TargetType::Game, &["Game"])
//!     .build();
//! ```

use std::path::PathBuf;

use crate::core::manifest::{DeclarationFile, ProjectMetadata};
use crate::core::{Manifest, ModuleDefinition, Project, TargetDefinition, TargetType};

/// Builds an in-memory project.
///
/// Declarations go into the manifest until [`ProjectBuilder::include`] is
/// called; after that they go into the most recently opened include file.
#[derive(Debug)]
pub struct ProjectBuilder {
    name: String,
    manifest: DeclarationFile,
    includes: Vec<(PathBuf, DeclarationFile)>,
}

impl ProjectBuilder {
    /// Start a project.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectBuilder {
            name: name.into(),
            manifest: DeclarationFile::default(),
            includes: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut DeclarationFile {
        match self.includes.last_mut() {
            Some((_, file)) => file,
            None => &mut self.manifest,
        }
    }

    /// Start a new included file; later declarations land in it.
    pub fn include(mut self, path: impl Into<PathBuf>) -> Self {
        self.includes.push((path.into(), DeclarationFile::default()));
        self
    }

    /// Declare external modules.
    pub fn externals(mut self, names: &[&str]) -> Self {
        self.current()
            .external
            .modules
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Declare a module with default PCH mode.
    pub fn module(mut self, name: &str, public: &[&str], private: &[&str]) -> Self {
        let module = ModuleDefinition::new(name)
            .with_public(public.iter().copied())
            .with_private(private.iter().copied());
        self.current().modules.push(module);
        self
    }

    /// Declare a fully built module.
    pub fn module_def(mut self, module: ModuleDefinition) -> Self {
        self.current().modules.push(module);
        self
    }

    /// Declare a target.
    pub fn target(mut self, name: &str, target_type: TargetType, modules: &[&str]) -> Self {
        let target = modules
            .iter()
            .fold(TargetDefinition::new(name, target_type), |t, m| t.with_module(*m));
        self.current().targets.push(target);
        self
    }

    /// Load everything into a project.
    pub fn build(self) -> Project {
        let manifest = Manifest {
            project: ProjectMetadata {
                name: self.name,
                include: Vec::new(),
            },
            declarations: self.manifest,
            path: PathBuf::from("/project/Modgraph.toml"),
        };
        Project::assemble(manifest, self.includes)
    }
}

/// The PaperUnreal project: a game and a dedicated server sharing one
/// module that is declared three times.
pub fn paper_unreal() -> Project {
    ProjectBuilder::new("PaperUnreal")
        .externals(&["Core", "CoreUObject", "Engine", "InputCore", "NavigationSystem"])
        .target("PaperUnreal", TargetType::Game, &["PaperUnreal"])
        .target("PaperUnrealServer", TargetType::Server, &["PaperUnreal"])
        .include("/project/Source/PaperUnreal/0.modgraph.toml")
        .module("PaperUnreal", &["Core", "CoreUObject", "Engine"], &[])
        .include("/project/Source/PaperUnreal/1.modgraph.toml")
        .module("PaperUnreal", &["Core", "CoreUObject", "Engine", "InputCore"], &[])
        .include("/project/Source/PaperUnreal/2.modgraph.toml")
        .module_def(
            ModuleDefinition::new("PaperUnreal")
                .with_pch(crate::core::PchMode::UseExplicitOrShared)
                .with_public(["Core", "CoreUObject", "Engine", "InputCore", "NavigationSystem"]),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PchMode;

    #[test]
    fn test_paper_unreal_fixture() {
        let project = paper_unreal();
        let entry = project.registry().entry("PaperUnreal").unwrap();

        assert_eq!(entry.declarations, 3);
        assert_eq!(entry.definition.pch, PchMode::UseExplicitOrShared);
        assert_eq!(entry.definition.public.len(), 5);
        assert_eq!(project.sources().len(), 4);
        assert_eq!(project.target_names().collect::<Vec<_>>(), vec!["PaperUnreal", "PaperUnrealServer"]);
    }
}
