//! Target definitions - what gets built.
//!
//! A target is a named, buildable artifact (a game client, a headless
//! server, ...) that pulls in an ordered list of modules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of target being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Standalone game with client and server code
    Game,
    /// Headless dedicated server
    #[serde(alias = "dedicated-server")]
    Server,
    /// Editor build
    Editor,
    /// Client without server code
    Client,
}

impl TargetType {
    /// Defines the orchestrator passes to every unit of a target of this type.
    pub fn defines(&self) -> Vec<String> {
        let (game, server, client, editor) = match self {
            TargetType::Game => (true, true, true, false),
            TargetType::Server => (false, true, false, false),
            TargetType::Client => (false, false, true, false),
            TargetType::Editor => (false, true, true, true),
        };
        vec![
            format!("BUILD_TARGET_GAME={}", game as u8),
            format!("WITH_SERVER_CODE={}", server as u8),
            format!("WITH_CLIENT_CODE={}", client as u8),
            format!("WITH_EDITOR={}", editor as u8),
        ]
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Game => write!(f, "game"),
            TargetType::Server => write!(f, "server"),
            TargetType::Editor => write!(f, "editor"),
            TargetType::Client => write!(f, "client"),
        }
    }
}

/// An opaque version tag such as `V4` or `Unreal5_3`.
///
/// modgraph never interprets these; they are carried through to the build
/// graph so the orchestrator can pick compiler defaults from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        VersionTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VersionTag {
    fn default() -> Self {
        VersionTag::new("Latest")
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A declared build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TargetDefinition {
    /// Target name
    pub name: String,

    /// Link/runtime shape of the target
    #[serde(rename = "type")]
    pub target_type: TargetType,

    /// Default build settings version
    #[serde(default)]
    pub build_settings: VersionTag,

    /// Header inclusion compatibility version
    #[serde(default)]
    pub include_order: VersionTag,

    /// Modules this target pulls in, in order
    #[serde(default)]
    pub extra_modules: Vec<String>,

    /// Extra target-wide preprocessor defines
    #[serde(default)]
    pub defines: Vec<String>,
}

impl TargetDefinition {
    /// Create a target with default version tags and no modules.
    pub fn new(name: impl Into<String>, target_type: TargetType) -> Self {
        TargetDefinition {
            name: name.into(),
            target_type,
            build_settings: VersionTag::default(),
            include_order: VersionTag::default(),
            extra_modules: Vec::new(),
            defines: Vec::new(),
        }
    }

    /// Add a module to the target.
    pub fn with_module(mut self, name: impl Into<String>) -> Self {
        self.extra_modules.push(name.into());
        self
    }

    /// Set both version tags.
    pub fn with_versions(
        mut self,
        build_settings: impl Into<String>,
        include_order: impl Into<String>,
    ) -> Self {
        self.build_settings = VersionTag::new(build_settings);
        self.include_order = VersionTag::new(include_order);
        self
    }

    /// Add a target-wide define.
    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    /// A target needs at least one module to be buildable.
    pub fn is_buildable(&self) -> bool {
        !self.extra_modules.is_empty()
    }

    /// Type defines followed by the target's own defines.
    pub fn effective_defines(&self) -> Vec<String> {
        let mut defines = self.target_type.defines();
        defines.extend(self.defines.iter().cloned());
        defines
    }
}
