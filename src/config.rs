//! Configuration files for the standard backend, and the environment-driven bootstrap that turns
//! them into the registered backend.
//!
//! A configuration file is TOML:
//!
//! ```toml
//! min_level = "info"
//! output = { file = "/var/log/app.log" }
//! format = "[{timestamp}] [{level}] {message}"
//! ```
//!
//! All keys are optional. Level names are lower case, and `"critical"` is used for
//! [`Level::Fatal`].

use serde::Deserialize;
use std::error::Error;
use std::ffi::OsString;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::backend::Backend;
use crate::builder::{LoggerBuilder, OutputTarget, SetTargetError};
use crate::level::Level;
use crate::logger::{StandardBackend, DEFAULT_FORMAT};
use crate::target::OutputTargetImpl;

/// The environment variable containing the path to a configuration file.
pub const CONFIG_ENV: &str = "GATELOG_CONFIG";

/// The standard backend's settings. [`Config::default()`] is the configuration used when no
/// configuration file is supplied: synchronous writes of every level to STDERR.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The minimum level's name, see [`level_from_name()`].
    pub min_level: String,
    pub output: OutputTarget,
    /// The record template, see [`LoggerBuilder::with_format()`].
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_level: level_name(Level::Trace).to_owned(),
            output: OutputTarget::Stderr,
            format: DEFAULT_FORMAT.to_owned(),
        }
    }
}

/// An error raised when a configuration could not be loaded or applied.
#[derive(Debug)]
pub enum ConfigError {
    /// The [`CONFIG_ENV`] environment variable is not set.
    NotSet,
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
    Parse(toml::de::Error),
    /// The configured minimum level is not a level name.
    UnknownLevel(String),
    /// The configured output file could not be opened.
    FileOpenError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::NotSet | ConfigError::UnknownLevel(_) => None,
            ConfigError::Io { error, .. } | ConfigError::FileOpenError { error, .. } => {
                Some(error)
            }
            ConfigError::Parse(error) => Some(error),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotSet => write!(f, "'{CONFIG_ENV}' is not set"),
            ConfigError::Io { path, error } => {
                write!(f, "Could not read '{}' ({})", path.display(), error)
            }
            ConfigError::Parse(error) => write!(f, "Invalid configuration ({error})"),
            ConfigError::UnknownLevel(name) => write!(f, "'{name}' is not a valid log level"),
            ConfigError::FileOpenError { path, error } => {
                write!(f, "Could not open '{}' ({})", path.display(), error)
            }
        }
    }
}

impl From<SetTargetError> for ConfigError {
    fn from(value: SetTargetError) -> Self {
        match value {
            SetTargetError::FileOpenError { path, error, .. } => {
                ConfigError::FileOpenError { path, error }
            }
        }
    }
}

impl Config {
    /// Parse a configuration file's contents. The minimum level is validated as well.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.min_level()?;

        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;

        Self::from_toml_str(&contents)
    }

    /// The configured minimum level. Unrecognized names are an error, they are never replaced by
    /// some other level.
    pub fn min_level(&self) -> Result<Level, ConfigError> {
        match level_from_name(&self.min_level) {
            Level::Unknown => Err(ConfigError::UnknownLevel(self.min_level.clone())),
            level => Ok(level),
        }
    }

    /// A builder with these settings applied. Opens the output file, if there is one.
    pub fn builder(&self) -> Result<LoggerBuilder, ConfigError> {
        Ok(LoggerBuilder::new(self.min_level()?)
            .with_output_target(self.output.clone())?
            .with_format(self.format.clone()))
    }

    /// Build a standard backend with these settings.
    pub fn build(&self) -> Result<StandardBackend, ConfigError> {
        self.builder()?
            .build()
            .map_err(|_| ConfigError::UnknownLevel(self.min_level.clone()))
    }
}

/// The standard backend's name for a level. Returns `"unknown"` for [`Level::Unknown`].
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Trace => "trace",
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
        Level::Error => "error",
        Level::Fatal => "critical",
        Level::Unknown => "unknown",
    }
}

/// The inverse of [`level_name()`]. Anything that isn't a level name results in
/// [`Level::Unknown`].
pub fn level_from_name(name: &str) -> Level {
    Level::ALL
        .into_iter()
        .find(|&level| level_name(level) == name)
        .unwrap_or(Level::Unknown)
}

/// Load the configuration file named by the [`CONFIG_ENV`] environment variable.
pub fn from_environment() -> Result<Config, ConfigError> {
    resolve(std::env::var_os(CONFIG_ENV))
}

fn resolve(value: Option<OsString>) -> Result<Config, ConfigError> {
    match value {
        Some(path) if !path.is_empty() => Config::from_file(PathBuf::from(path)),
        _ => Err(ConfigError::NotSet),
    }
}

/// A backend with the default configuration. Unlike going through [`Config::build()`] this cannot
/// fail.
pub fn default_backend() -> StandardBackend {
    StandardBackend::new(
        Level::Trace,
        OutputTarget::Stderr,
        OutputTargetImpl::new_stderr(),
        DEFAULT_FORMAT,
    )
}

/// Configure the facade from the environment. This builds a backend from the configuration file
/// named by [`CONFIG_ENV`] and registers it. If the variable is unset or the file cannot be read,
/// parsed, or applied, then a warning is logged and a backend with the default configuration is
/// registered instead. Either way exactly one backend is registered.
///
/// # Panics
///
/// Panics if a backend has already been registered. See [`crate::register()`].
pub fn init_from_env() {
    let backend = from_environment()
        .and_then(|config| config.build())
        .unwrap_or_else(|err| {
            let backend = default_backend();
            backend.warn(format_args!(
                "Could not load the logging configuration, falling back to the defaults: {err}"
            ));

            backend
        });

    crate::register(Some(Box::new(backend)));
}
