//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, else `config.toml` in the platform config dir)
//! 3. `NAMEDUPE_*` environment variables
//! 4. Command-line flags
//!
//! ```toml
//! max_depth = 6
//! search_mode = "full"
//! skip_hidden = true
//! ignore_patterns = ["node_modules", "*.tmp"]
//! output = "json"
//! ```

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{ModeArg, OutputFormat, WalkArgs};
use crate::duplicates::SearchMode;
use crate::scanner::{WalkerConfig, DEFAULT_MAX_DEPTH};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "NAMEDUPE_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A config file named on the command line does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has a wrongly typed value.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deepest level reported by walks (direct children are 0)
    pub max_depth: usize,
    /// Matching strictness for `find` and `compare`
    pub search_mode: SearchMode,
    /// Skip names starting with `.`
    pub skip_hidden: bool,
    /// Gitignore-style patterns to skip
    pub ignore_patterns: Vec<String>,
    /// Output format
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            search_mode: SearchMode::default(),
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// With `explicit` set, that file must exist. Otherwise the default
    /// platform path is used when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing or any layer
    /// fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_path(path)
            }
            None => match Self::default_path() {
                Some(path) => Self::load_from_path(&path),
                None => {
                    log::debug!("No platform config directory, skipping config file");
                    Ok(Self::figment(None)
                        .extract::<Self>()
                        .map_err(Box::new)?
                        .validated())
                }
            },
        }
    }

    /// Load defaults, then `path` (skipped if missing), then the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the file or an environment
    /// variable does not parse.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::debug!("Loading config from {}", path.display());
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        Ok(Self::figment(Some(path))
            .extract::<Self>()
            .map_err(Box::new)?
            .validated())
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn validated(mut self) -> Self {
        self.ignore_patterns.retain(|p| !p.trim().is_empty());
        self
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "namedupe", "namedupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply walk flags from the command line.
    ///
    /// Boolean flags can only switch a setting on; ignore patterns are
    /// appended to those from lower layers.
    pub fn merge_walk_args(&mut self, args: &WalkArgs) {
        if let Some(max_depth) = args.max_depth {
            self.max_depth = max_depth;
        }
        if args.skip_hidden {
            self.skip_hidden = true;
        }
        self.ignore_patterns
            .extend(args.ignore_patterns.iter().cloned());
        if let Some(output) = args.output {
            self.output = output;
        }
    }

    /// Apply `--mode` from the command line.
    pub fn merge_mode(&mut self, mode: Option<ModeArg>) {
        if let Some(mode) = mode {
            self.search_mode = mode.into();
        }
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_max_depth(self.max_depth)
            .with_skip_hidden(self.skip_hidden)
            .with_ignore_patterns(self.ignore_patterns.clone())
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Render` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
