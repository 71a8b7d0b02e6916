//! Modgraph.toml and included declaration files.
//!
//! The root manifest carries a `[project]` section and may pull in further
//! declaration files through glob patterns. Every file can declare external
//! modules, modules and targets; tables are kept in the order they appear
//! because the registry applies them in load order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::module::ModuleDefinition;
use crate::core::target::TargetDefinition;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Modgraph.toml";

/// Project metadata from the `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMetadata {
    /// Project name
    pub name: String,

    /// Glob patterns, relative to the manifest directory, of extra
    /// declaration files
    #[serde(default)]
    pub include: Vec<String>,
}

/// The `[external]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalModules {
    /// Modules provided by the engine or a third party
    #[serde(default)]
    pub modules: Vec<String>,
}

/// One parsed declaration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectMetadata>,

    #[serde(default)]
    pub external: ExternalModules,

    /// Module declarations, in file order
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleDefinition>,

    /// Target declarations, in file order
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetDefinition>,
}

impl DeclarationFile {
    /// Parse declaration file content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| format!("failed to parse declarations in {}", path.display()))
    }

    /// Read and parse an included declaration file.
    ///
    /// Included files may not carry their own `[project]` section.
    pub fn load_include(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read declaration file: {}", path.display()))?;

        let file = Self::parse(&content, path)?;
        if file.project.is_some() {
            anyhow::bail!(
                "{} is an included declaration file and cannot have a [project] section",
                path.display()
            );
        }
        Ok(file)
    }

    /// Check if the file declares nothing.
    pub fn is_empty(&self) -> bool {
        self.external.modules.is_empty() && self.modules.is_empty() && self.targets.is_empty()
    }
}

/// The parsed root manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project metadata
    pub project: ProjectMetadata,

    /// Declarations made directly in the manifest
    pub declarations: DeclarationFile,

    /// Path to the manifest file
    pub path: PathBuf,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut declarations = DeclarationFile::parse(content, path)?;

        let project = declarations.project.take().with_context(|| {
            format!("manifest at {} must have a [project] section", path.display())
        })?;

        Ok(Manifest {
            project,
            declarations,
            path: path.to_path_buf(),
        })
    }

    /// The directory containing this manifest.
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Expand the include patterns into a sorted, duplicate-free file list.
    ///
    /// The manifest itself is never part of the list.
    pub fn include_paths(&self) -> Result<Vec<PathBuf>> {
        // glob metacharacters in the project's own location are literal
        let root = glob::Pattern::escape(&self.root().to_string_lossy());
        let mut paths = Vec::new();

        for pattern in &self.project.include {
            let full = if root.is_empty() || Path::new(pattern).is_absolute() {
                pattern.clone()
            } else {
                format!("{}/{}", root.trim_end_matches('/'), pattern)
            };
            let entries = glob::glob(&full)
                .with_context(|| format!("invalid include pattern `{}`", pattern))?;

            let mut matched = 0;
            for entry in entries {
                let path = entry.with_context(|| format!("failed to expand `{}`", pattern))?;
                if path.is_file() && path != self.path {
                    paths.push(path);
                    matched += 1;
                }
            }

            if matched == 0 {
                tracing::warn!("include pattern `{}` matched no files", pattern);
            }
        }

        paths.sort();
        paths.dedup();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::module::PchMode;
    use crate::core::target::TargetType;
    use tempfile::TempDir;

    const PAPER_UNREAL: &str = r#"
[project]
name = "PaperUnreal"

[external]
modules = ["Core", "CoreUObject", "Engine", "InputCore"]

[[module]]
name = "PaperUnreal"
pch = "use-explicit-or-shared"
public = ["Core", "CoreUObject", "Engine", "InputCore"]

[[target]]
name = "PaperUnreal"
type = "game"
build-settings = "V4"
include-order = "Unreal5_3"
extra-modules = ["PaperUnreal"]

[[target]]
name = "PaperUnrealServer"
type = "server"
build-settings = "V4"
include-order = "Unreal5_3"
extra-modules = ["PaperUnreal"]
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(PAPER_UNREAL, Path::new("/tmp/Modgraph.toml")).unwrap();

        assert_eq!(manifest.project.name, "PaperUnreal");
        assert_eq!(manifest.declarations.external.modules.len(), 4);

        let module = &manifest.declarations.modules[0];
        assert_eq!(module.pch, PchMode::UseExplicitOrShared);
        assert_eq!(module.public.len(), 4);
        assert!(module.private.is_empty());

        let targets = &manifest.declarations.targets;
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].target_type, TargetType::Game);
        assert_eq!(targets[1].target_type, TargetType::Server);
        assert_eq!(targets[1].build_settings.as_str(), "V4");
        assert_eq!(targets[1].include_order.as_str(), "Unreal5_3");
        assert_eq!(targets[1].extra_modules, vec!["PaperUnreal"]);
    }

    #[test]
    fn test_manifest_requires_project() {
        let result = Manifest::parse("[[module]]\nname = \"X\"\n", Path::new("Modgraph.toml"));
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("[project]"));
    }

    #[test]
    fn test_repeated_module_tables_keep_order() {
        let content = r#"
[project]
name = "p"

[[module]]
name = "X"
public = ["A"]

[[module]]
name = "X"
public = ["A", "B"]
"#;
        let manifest = Manifest::parse(content, Path::new("Modgraph.toml")).unwrap();
        let modules = &manifest.declarations.modules;
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].public, vec!["A"]);
        assert_eq!(modules[1].public, vec!["A", "B"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let content = r#"
[project]
name = "p"

[[module]]
name = "X"
publc = ["A"]
"#;
        assert!(Manifest::parse(content, Path::new("Modgraph.toml")).is_err());
    }

    #[test]
    fn test_include_paths_sorted() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("Source");
        std::fs::create_dir_all(source.join("b")).unwrap();
        std::fs::create_dir_all(source.join("a")).unwrap();
        std::fs::write(source.join("b/B.modgraph.toml"), "").unwrap();
        std::fs::write(source.join("a/A.modgraph.toml"), "").unwrap();

        let manifest_path = tmp.path().join(MANIFEST_NAME);
        let content = "[project]\nname = \"p\"\ninclude = [\"Source/**/*.modgraph.toml\"]\n";
        std::fs::write(&manifest_path, content).unwrap();

        let manifest = Manifest::load(&manifest_path).unwrap();
        let paths = manifest.include_paths().unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a/A.modgraph.toml"));
        assert!(paths[1].ends_with("b/B.modgraph.toml"));
    }

    #[test]
    fn test_include_paths_under_bracketed_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Game [Main]");
        std::fs::create_dir_all(root.join("Source")).unwrap();
        std::fs::write(root.join("Source/Game.modgraph.toml"), "").unwrap();

        let manifest_path = root.join(MANIFEST_NAME);
        let content = "[project]\nname = \"p\"\ninclude = [\"Source/*.modgraph.toml\"]\n";
        std::fs::write(&manifest_path, content).unwrap();

        let manifest = Manifest::load(&manifest_path).unwrap();
        let paths = manifest.include_paths().unwrap();

        assert_eq!(paths, vec![root.join("Source/Game.modgraph.toml")]);
    }

    #[test]
    fn test_include_cannot_declare_project() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Extra.modgraph.toml");
        std::fs::write(&path, "[project]\nname = \"nested\"\n").unwrap();

        let err = DeclarationFile::load_include(&path).unwrap_err();
        assert!(err.to_string().contains("cannot have a [project] section"));
    }
}
