//! Module registry - the load phase and the frozen query snapshot.
//!
//! Declarations are fed to a [`RegistryBuilder`] in load order. A later
//! declaration of a module name replaces the earlier one outright; the
//! dependency lists are never merged. Once loading is finished the builder is
//! frozen into an immutable [`ModuleRegistry`] that every resolver and
//! compiler call reads from.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::core::module::{ModuleDefinition, PchMode};

/// A module as it sits in the registry, with where it came from.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    /// The winning declaration
    pub definition: ModuleDefinition,

    /// File that held the winning declaration, if it came from disk
    pub declared_in: Option<PathBuf>,

    /// How many declarations of this name were loaded
    pub declarations: usize,
}

/// Accumulates declarations in order.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    modules: BTreeMap<String, ModuleEntry>,
    externals: BTreeSet<String>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// Declare a module that did not come from a file.
    ///
    /// Returns the declaration it superseded, if any.
    pub fn declare(&mut self, module: ModuleDefinition) -> Option<ModuleDefinition> {
        self.insert(module, None)
    }

    /// Declare a module read from `path`.
    pub fn declare_in(&mut self, module: ModuleDefinition, path: &Path) -> Option<ModuleDefinition> {
        self.insert(module, Some(path.to_path_buf()))
    }

    fn insert(
        &mut self,
        module: ModuleDefinition,
        declared_in: Option<PathBuf>,
    ) -> Option<ModuleDefinition> {
        let module = module.normalized();
        let name = module.name.clone();
        let declarations = self.modules.get(&name).map_or(0, |e| e.declarations) + 1;

        let previous = self.modules.insert(
            name.clone(),
            ModuleEntry {
                definition: module,
                declared_in,
                declarations,
            },
        );

        let previous = previous.map(|e| e.definition);
        if let Some(ref prev) = previous {
            tracing::debug!(
                "module `{}` redeclared ({} declarations so far); dropping {} public / {} private dependencies from the earlier one",
                name,
                declarations,
                prev.public.len(),
                prev.private.len()
            );
        }
        previous
    }

    /// Register a module the project depends on but does not declare.
    pub fn add_external(&mut self, name: impl Into<String>) {
        self.externals.insert(name.into());
    }

    /// Register several external modules.
    pub fn add_externals<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_external(name);
        }
    }

    /// Finish loading.
    pub fn build(self) -> ModuleRegistry {
        let shadowed: Vec<_> = self
            .externals
            .iter()
            .filter(|name| self.modules.contains_key(*name))
            .collect();
        for name in shadowed {
            tracing::debug!("project module `{}` shadows the external module of the same name", name);
        }

        ModuleRegistry {
            modules: self.modules,
            externals: self.externals,
        }
    }
}

/// Immutable snapshot of every declared module.
///
/// All queries take `&self`, so one registry can be shared by any number of
/// concurrent target compilations.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleEntry>,
    externals: BTreeSet<String>,
}

impl ModuleRegistry {
    /// Start a new load phase.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a declared module.
    pub fn get(&self, name: &str) -> Option<&ModuleDefinition> {
        self.modules.get(name).map(|e| &e.definition)
    }

    /// Look up a declared module along with its load metadata.
    pub fn entry(&self, name: &str) -> Option<&ModuleEntry> {
        self.modules.get(name)
    }

    /// True for external names that no project module shadows.
    pub fn is_external(&self, name: &str) -> bool {
        self.externals.contains(name) && !self.modules.contains_key(name)
    }

    /// True if the name resolves to a declared or external module.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name) || self.externals.contains(name)
    }

    /// Precompiled-header mode a unit of this module is built with.
    pub fn pch_mode(&self, name: &str) -> Option<PchMode> {
        match self.get(name) {
            Some(module) => Some(module.pch),
            None if self.externals.contains(name) => Some(PchMode::Default),
            None => None,
        }
    }

    /// Declared modules in name order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules.values()
    }

    /// Declared module names in name order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// External module names in name order.
    pub fn externals(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().map(String::as_str)
    }

    /// Every known name, for "did you mean" hints.
    pub fn known_names(&self) -> impl Iterator<Item = &str> {
        self.module_names().chain(self.externals())
    }

    /// Number of declared modules (externals not counted).
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if no modules are declared.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
