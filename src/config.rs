//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/genealogy/genealogy.toml`
//! 3. Local config: `<dir>/.genealogy.toml`
//! 4. Environment variables: `GENEALOGY_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::view::RenderOptions;
use crate::application::ApplicationError;

/// Unified configuration for genealogy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON export of the constituents table
    pub snapshot: Option<PathBuf>,
    /// Recruit count above which a node gets the influence badge
    pub badge_threshold: usize,
    /// Whether tree nodes start expanded
    pub expanded_by_default: bool,
    /// Default length of the recruiter ranking
    pub top: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot: None,
            badge_threshold: 3,
            expanded_by_default: true,
            top: 10,
        }
    }
}

/// Get the XDG config directory for genealogy.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "genealogy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("genealogy.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".genealogy.toml")
}

/// Expand environment variables and `~` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.genealogy.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("badge_threshold", defaults.badge_threshold as i64)
            .map_err(config_err)?
            .set_default("expanded_by_default", defaults.expanded_by_default)
            .map_err(config_err)?
            .set_default("top", defaults.top as i64)
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            debug!("global config: {}", global_path.display());
            builder = builder.add_source(File::from(global_path).required(false));
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            debug!("local config: {}", local_path.display());
            builder = builder.add_source(File::from(local_path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("GENEALOGY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            let expanded = expand_env_vars(snapshot.to_string_lossy().as_ref());
            self.snapshot = Some(PathBuf::from(expanded));
        }
    }

    pub fn render_options(&self, max_depth: Option<usize>) -> RenderOptions {
        RenderOptions {
            badge_threshold: self.badge_threshold,
            max_depth,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# genealogy configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/genealogy/genealogy.toml
#   Local:  ./.genealogy.toml
#   Env:    GENEALOGY_* environment variables

# JSON export of the constituents table (array of rows, or {"data": [...]})
# snapshot = "~/exports/constituents.json"

# Recruit count above which a constituent is flagged as influential
# badge_threshold = 3

# Start with every tree node expanded
# expanded_by_default = true

# Number of recruiters listed by `genealogy rank`
# top = 10
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
