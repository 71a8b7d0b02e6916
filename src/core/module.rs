//! Module definitions - what a target is assembled from.
//!
//! A module is a named compilation unit with a precompiled-header strategy
//! and two dependency lists. Public dependencies propagate to anything that
//! depends on the module; private dependencies are seen only by the module's
//! own compilation units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Precompiled-header strategy for a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchMode {
    /// Let the orchestrator pick (also used for external modules)
    #[default]
    Default,
    /// Never use precompiled headers
    #[serde(alias = "no-pchs")]
    None,
    /// Only private PCHs, no shared ones
    #[serde(alias = "no-shared-pchs")]
    NoShared,
    /// Use shared PCHs
    #[serde(alias = "use-shared-pchs")]
    UseShared,
    /// Use the module's explicit PCH when present, shared PCHs otherwise
    #[serde(alias = "use-explicit-or-shared-pchs")]
    UseExplicitOrShared,
}

impl PchMode {
    /// The canonical manifest spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            PchMode::Default => "default",
            PchMode::None => "none",
            PchMode::NoShared => "no-shared",
            PchMode::UseShared => "use-shared",
            PchMode::UseExplicitOrShared => "use-explicit-or-shared",
        }
    }
}

impl fmt::Display for PchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(PchMode::Default),
            "none" | "no-pchs" => Ok(PchMode::None),
            "no-shared" | "no-shared-pchs" => Ok(PchMode::NoShared),
            "use-shared" | "use-shared-pchs" => Ok(PchMode::UseShared),
            "use-explicit-or-shared" | "use-explicit-or-shared-pchs" => {
                Ok(PchMode::UseExplicitOrShared)
            }
            other => Err(format!("unknown pch mode `{}`", other)),
        }
    }
}

/// Which side of a module's dependency lists is being asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// As seen by a dependent: public dependencies only
    Public,
    /// As seen by the module's own compilation units: public and private
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A declared module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDefinition {
    /// Module name, unique within the project
    pub name: String,

    /// Precompiled-header strategy
    #[serde(default)]
    pub pch: PchMode,

    /// Dependencies re-exported to dependents
    #[serde(default)]
    pub public: Vec<String>,

    /// Dependencies used only by this module
    #[serde(default)]
    pub private: Vec<String>,
}

impl ModuleDefinition {
    /// Create a module with no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDefinition {
            name: name.into(),
            pch: PchMode::Default,
            public: Vec::new(),
            private: Vec::new(),
        }
    }

    /// Set the precompiled-header mode.
    pub fn with_pch(mut self, pch: PchMode) -> Self {
        self.pch = pch;
        self
    }

    /// Append public dependencies.
    pub fn with_public<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Append private dependencies.
    pub fn with_private<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.private.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Drop repeated names inside each list, keeping first occurrences.
    ///
    /// Names that appear in both lists are left alone so the conflict can be
    /// reported when the module is resolved.
    pub fn normalized(mut self) -> Self {
        dedup_in_order(&mut self.public);
        dedup_in_order(&mut self.private);
        self
    }

    /// Dependencies visible under the given visibility, public first.
    pub fn dependencies(&self, visibility: Visibility) -> impl Iterator<Item = &str> {
        let private: &[String] = match visibility {
            Visibility::Public => &[],
            Visibility::Private => &self.private,
        };
        self.public.iter().chain(private.iter()).map(String::as_str)
    }

    /// Dependency edges in declaration order, tagged with their visibility.
    pub fn edges(&self) -> impl Iterator<Item = (&str, Visibility)> {
        self.public
            .iter()
            .map(|d| (d.as_str(), Visibility::Public))
            .chain(self.private.iter().map(|d| (d.as_str(), Visibility::Private)))
    }

    /// First dependency listed as both public and private, if any.
    pub fn visibility_conflict(&self) -> Option<&str> {
        self.public
            .iter()
            .find(|d| self.private.contains(d))
            .map(String::as_str)
    }
}

fn dedup_in_order(names: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    names.retain(|n| seen.insert(n.clone()));
}
