//! A builder interface for the standard backend.

use serde::Deserialize;
use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;

use crate::level::Level;
use crate::logger::{StandardBackend, DEFAULT_FORMAT};
use crate::target::{CaptureBuffer, OutputTargetImpl};

/// Constructs a [`StandardBackend`].
#[derive(Debug)]
pub struct LoggerBuilder {
    /// The minimum level for the constructed backend.
    min_level: Level,
    /// An explicitly set output target. When writing to a file this already contains the writer for
    /// the file to ensure that it can actually be written to when the logger is created.
    output_target: Option<(OutputTarget, OutputTargetImpl)>,
    /// The record template, see [`LoggerBuilder::with_format()`].
    format: String,
}

/// Determines where the logger should write its output. If no explicit target is chosen, then
/// STDERR is used.
///
/// In a configuration file this is written as `output = "stderr"`, `output = "stdout"`, or
/// `output = { file = "/path/to/file.log" }`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    /// Write directly to STDERR.
    #[default]
    Stderr,
    /// Write directly to STDOUT.
    Stdout,
    /// Append the log output to a file.
    File(PathBuf),
    /// Write to an in-memory buffer. Not available from configuration files.
    #[serde(skip)]
    Capture(CaptureBuffer),
}

/// An error raised when setting the logger's output target. This can be converted back to the
/// builder using `Into<Builder>`.
#[derive(Debug)]
pub enum SetTargetError {
    FileOpenError {
        builder: LoggerBuilder,
        path: PathBuf,
        error: std::io::Error,
    },
}

impl From<SetTargetError> for LoggerBuilder {
    fn from(value: SetTargetError) -> Self {
        match value {
            SetTargetError::FileOpenError { builder, .. } => builder,
        }
    }
}

impl Error for SetTargetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SetTargetError::FileOpenError { error, .. } => Some(error),
        }
    }
}

impl Display for SetTargetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetTargetError::FileOpenError {
                builder: _,
                path,
                error,
            } => {
                write!(f, "Could not open '{}' ({})", path.display(), error)
            }
        }
    }
}

/// An error raised when building a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The builder's minimum level was [`Level::Unknown`].
    UnknownLevel,
}

impl Error for BuildError {}

impl Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnknownLevel => write!(f, "Cannot use an unknown level as the minimum"),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl LoggerBuilder {
    /// Start building a backend that emits messages at `min_level` and above.
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            output_target: None,
            format: DEFAULT_FORMAT.to_owned(),
        }
    }

    /// Build the backend.
    pub fn build(self) -> Result<StandardBackend, BuildError> {
        if !self.min_level.is_known() {
            return Err(BuildError::UnknownLevel);
        }

        let (target, target_impl) = self
            .output_target
            .unwrap_or_else(|| (OutputTarget::Stderr, OutputTargetImpl::new_stderr()));

        Ok(StandardBackend::new(
            self.min_level,
            target,
            target_impl,
            &self.format,
        ))
    }

    /// Build the backend and register it with the facade.
    ///
    /// # Panics
    ///
    /// Panics if a backend has already been registered. See [`crate::register()`].
    pub fn build_global(self) -> Result<(), BuildError> {
        crate::register(Some(Box::new(self.build()?)));

        Ok(())
    }

    /// Explicitly set the output target for the logger. File targets are opened immediately.
    /// Returns an error if the target could not be set.
    pub fn with_output_target(mut self, target: OutputTarget) -> Result<Self, SetTargetError> {
        match OutputTargetImpl::open(&target) {
            Ok(target_impl) => {
                self.output_target = Some((target, target_impl));
                Ok(self)
            }
            Err(error) => {
                let path = match target {
                    OutputTarget::File(path) => path,
                    _ => PathBuf::new(),
                };

                Err(SetTargetError::FileOpenError {
                    builder: self,
                    path,
                    error,
                })
            }
        }
    }

    /// Set the template used for every record. `{timestamp}`, `{level}`, and `{message}` are
    /// replaced with the record's values, everything else is written verbatim.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;

    #[test]
    fn builds_with_requested_level() {
        let backend = LoggerBuilder::new(Level::Warn).build().unwrap();
        assert_eq!(backend.level(), Level::Warn);
        assert_eq!(backend.output_target(), OutputTarget::Stderr);
        assert!(!backend.is_info_enabled());
        assert!(backend.is_warn_enabled());
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert_eq!(
            LoggerBuilder::new(Level::Unknown).build().unwrap_err(),
            BuildError::UnknownLevel
        );
    }

    #[test]
    fn unopenable_file_returns_the_builder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.log");

        let err = LoggerBuilder::new(Level::Debug)
            .with_output_target(OutputTarget::File(path.clone()))
            .unwrap_err();
        assert!(err.to_string().contains("out.log"));

        let SetTargetError::FileOpenError { path: failed, .. } = &err;
        assert_eq!(failed, &path);

        // The builder can still be used with another target
        let builder: LoggerBuilder = err.into();
        let backend = builder.build().unwrap();
        assert_eq!(backend.level(), Level::Debug);
    }

    #[test]
    fn custom_format_is_used() {
        let buffer = CaptureBuffer::new();
        let backend = LoggerBuilder::new(Level::Trace)
            .with_output_target(OutputTarget::Capture(buffer.clone()))
            .unwrap()
            .with_format("{level}|{message}")
            .build()
            .unwrap();

        backend.warn(format_args!("careful"));
        assert_eq!(buffer.lines(), vec!["WARN|careful"]);
    }
}
