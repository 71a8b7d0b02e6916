//! Project - the loaded declaration set.
//!
//! A Project owns the frozen module registry and the target table. Loading
//! is the only phase that touches the filesystem: the manifest is read, its
//! include patterns are expanded, and every declaration is applied in load
//! order (manifest first, then included files sorted by path).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::core::manifest::{DeclarationFile, Manifest, MANIFEST_NAME};
use crate::core::registry::{ModuleRegistry, RegistryBuilder};
use crate::core::target::TargetDefinition;

/// Error when searching for a manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Nothing in the directory itself
    #[error("could not find {} in {}", MANIFEST_NAME, .dir.display())]
    NotInDir { dir: PathBuf },

    /// Nothing in the directory or any of its ancestors
    #[error("could not find {} in {} or any parent directory", MANIFEST_NAME, .dir.display())]
    NotFound { dir: PathBuf },

    /// An explicitly requested manifest does not exist
    #[error("manifest `{}` does not exist", .path.display())]
    Missing { path: PathBuf },
}

/// Find the manifest in a directory (no upward search).
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let path = dir.join(MANIFEST_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ManifestError::NotInDir {
            dir: dir.to_path_buf(),
        })
    }
}

/// A loaded project.
#[derive(Debug)]
pub struct Project {
    name: String,
    manifest_path: PathBuf,
    sources: Vec<PathBuf>,
    registry: ModuleRegistry,
    targets: BTreeMap<String, TargetDefinition>,
}

impl Project {
    /// Load a project from its manifest path.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;

        let mut includes = Vec::new();
        for path in manifest.include_paths()? {
            let file = DeclarationFile::load_include(&path)?;
            if file.is_empty() {
                tracing::warn!("{} declares nothing", path.display());
            }
            includes.push((path, file));
        }

        Ok(Self::assemble(manifest, includes))
    }

    /// Apply the manifest and the included files in load order.
    pub fn assemble(manifest: Manifest, includes: Vec<(PathBuf, DeclarationFile)>) -> Self {
        let root = manifest.root().to_path_buf();
        let mut loader = Loader::default();

        loader.apply(&manifest.path, manifest.declarations);
        let mut sources = vec![manifest.path.clone()];

        for (path, file) in includes {
            tracing::debug!("loading declarations from {}", display_relative(&path, &root));
            loader.apply(&path, file);
            sources.push(path);
        }

        let Loader { registry, targets } = loader;
        let registry = registry.build();

        tracing::debug!(
            "loaded {} modules, {} externals, {} targets from {} files",
            registry.len(),
            registry.externals().count(),
            targets.len(),
            sources.len()
        );

        Project {
            name: manifest.project.name,
            manifest_path: manifest.path,
            sources,
            registry,
            targets,
        }
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to the root manifest.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new("."))
    }

    /// Every declaration file in load order, manifest first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// The frozen module registry.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Look up a target by name.
    pub fn target(&self, name: &str) -> Option<&TargetDefinition> {
        self.targets.get(name)
    }

    /// Targets in name order.
    pub fn targets(&self) -> impl Iterator<Item = &TargetDefinition> {
        self.targets.values()
    }

    /// Target names in name order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Display a path relative to the project root when possible.
    pub fn display_path(&self, path: &Path) -> String {
        display_relative(path, self.root())
    }
}

#[derive(Default)]
struct Loader {
    registry: RegistryBuilder,
    targets: BTreeMap<String, TargetDefinition>,
}

impl Loader {
    fn apply(&mut self, path: &Path, file: DeclarationFile) {
        self.registry.add_externals(file.external.modules);

        for module in file.modules {
            self.registry.declare_in(module, path);
        }

        for target in file.targets {
            if let Some(previous) = self.targets.insert(target.name.clone(), target) {
                tracing::debug!("target `{}` redeclared in {}", previous.name, path.display());
            }
        }
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_with_includes_last_wins() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            MANIFEST_NAME,
            r#"
[project]
name = "PaperUnreal"
include = ["Source/**/*.modgraph.toml"]

[external]
modules = ["Core", "CoreUObject", "Engine", "InputCore", "NavigationSystem"]

[[module]]
name = "PaperUnreal"
public = ["Core"]

[[target]]
name = "PaperUnreal"
type = "game"
extra-modules = ["PaperUnreal"]
"#,
        );
        write(
            tmp.path(),
            "Source/PaperUnreal/a.modgraph.toml",
            "[[module]]\nname = \"PaperUnreal\"\npublic = [\"Core\", \"CoreUObject\", \"Engine\"]\n",
        );
        write(
            tmp.path(),
            "Source/PaperUnreal/b.modgraph.toml",
            "[[module]]\nname = \"PaperUnreal\"\npch = \"use-explicit-or-shared\"\npublic = [\"Core\", \"CoreUObject\", \"Engine\", \"InputCore\", \"NavigationSystem\"]\n",
        );

        let project = Project::load(&manifest).unwrap();
        assert_eq!(project.name(), "PaperUnreal");
        assert_eq!(project.sources().len(), 3);

        let entry = project.registry().entry("PaperUnreal").unwrap();
        assert_eq!(entry.declarations, 3);
        assert_eq!(entry.definition.public.len(), 5);
        assert!(entry.declared_in.as_ref().unwrap().ends_with("b.modgraph.toml"));
        assert_eq!(
            project.display_path(entry.declared_in.as_ref().unwrap()),
            Path::new("Source/PaperUnreal/b.modgraph.toml").display().to_string()
        );
    }

    #[test]
    fn test_target_redeclaration_last_wins() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            MANIFEST_NAME,
            r#"
[project]
name = "p"

[[target]]
name = "Game"
type = "game"
extra-modules = ["A"]

[[target]]
name = "Game"
type = "client"
extra-modules = ["B"]
"#,
        );

        let project = Project::load(&manifest).unwrap();
        let target = project.target("Game").unwrap();
        assert_eq!(target.extra_modules, vec!["B"]);
        assert_eq!(project.target_names().count(), 1);
    }

    #[test]
    fn test_find_manifest() {
        let tmp = TempDir::new().unwrap();
        let err = find_manifest(tmp.path()).unwrap_err();
        assert!(matches!(err, ManifestError::NotInDir { .. }));
        assert!(!err.to_string().contains("parent directory"));

        let manifest = write(tmp.path(), MANIFEST_NAME, "[project]\nname = \"p\"\n");
        assert_eq!(find_manifest(tmp.path()).unwrap(), manifest);
    }
}
