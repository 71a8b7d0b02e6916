//! Build graph - the compiled form of a target.
//!
//! A BuildGraph lists every module a target needs as a build unit, ordered
//! so that each unit comes after everything it depends on. It is what gets
//! handed to the compiler/linker driver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{PchMode, TargetType, VersionTag};
use crate::util::hash::Fingerprint;

/// Where a build unit comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOrigin {
    /// Declared by the project
    Project,
    /// Provided by the engine or another external
    External,
}

impl fmt::Display for UnitOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitOrigin::Project => write!(f, "project"),
            UnitOrigin::External => write!(f, "external"),
        }
    }
}

/// One module to compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildUnit {
    /// Module name
    pub name: String,
    /// Precompiled-header strategy
    pub pch: PchMode,
    /// Project or external
    pub origin: UnitOrigin,
}

/// The ordered, duplicate-free unit list for a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildGraph {
    /// Target name
    pub target: String,

    /// Target type
    #[serde(rename = "type")]
    pub target_type: TargetType,

    /// Default build settings version
    pub build_settings: VersionTag,

    /// Header inclusion compatibility version
    pub include_order: VersionTag,

    /// Type defines followed by the target's own defines
    pub defines: Vec<String>,

    /// Units, dependencies first
    pub units: Vec<BuildUnit>,
}

impl BuildGraph {
    /// Unit names in build order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name.as_str())
    }

    /// Check if a module is part of the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.units.iter().any(|u| u.name == name)
    }

    /// Position of a module in build order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.units.iter().position(|u| u.name == name)
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the graph has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// SHA-256 over the ordered graph content.
    ///
    /// Two graphs have the same fingerprint exactly when they would drive
    /// the same build.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.target)
            .update_str(&self.target_type.to_string())
            .update_str(self.build_settings.as_str())
            .update_str(self.include_order.as_str())
            .update_list(self.defines.iter().map(String::as_str));

        fp.update_str(&self.units.len().to_string());
        for unit in &self.units {
            fp.update_str(&unit.name)
                .update_str(unit.pch.as_str())
                .update_str(&unit.origin.to_string());
        }
        fp.finish()
    }
}
