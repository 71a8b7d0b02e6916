//! Global context for modgraph operations.
//!
//! Provides centralized access to configuration, paths, and the manifest
//! lookup used by every command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::project::{find_manifest as dir_find_manifest, ManifestError};
use crate::util::config::{self, Config};

/// Where a command runs and how it reports.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Explicit manifest path, overriding the upward search
    manifest_path: Option<PathBuf>,

    /// `--no-color` clears this
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Context rooted at `cwd`, colors on, no explicit manifest.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            manifest_path: None,
            color: true,
        }
    }

    /// Use an explicit manifest instead of searching for one.
    pub fn with_manifest_path(mut self, path: Option<PathBuf>) -> Self {
        self.manifest_path = path.map(|p| if p.is_absolute() { p } else { self.cwd.join(p) });
        self
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Find Modgraph.toml: the explicit path if one was given, otherwise
    /// the nearest one from cwd upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        if let Some(ref path) = self.manifest_path {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(ManifestError::Missing { path: path.clone() })
            };
        }

        let mut current = self.cwd.clone();
        loop {
            match dir_find_manifest(&current) {
                Ok(path) => return Ok(path),
                Err(_) => {
                    if !current.pop() {
                        return Err(ManifestError::NotFound {
                            dir: self.cwd.clone(),
                        });
                    }
                }
            }
        }
    }

    /// Load the merged global and project configuration for a project root.
    ///
    /// The context's color setting is folded in: `--no-color` always wins.
    pub fn load_config(&self, project_root: &Path) -> Config {
        let global = config::global_config_path();
        let mut config = config::load_config(
            global.as_deref(),
            &config::project_config_path(project_root),
        );
        if !self.color {
            config.output.color = Some(false);
        }
        config
    }
}
