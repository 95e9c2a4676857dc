//! Log levels and the ordering used for gating.

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The severity of a log message. Levels are totally ordered from [`Level::Trace`] to
/// [`Level::Fatal`], and a message is emitted if and only if its level is at least the backend's
/// minimum level.
///
/// [`Level::Unknown`] is what parsing an unrecognized level name results in. It sorts below
/// `Trace`, and it must never be used as a threshold.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// The result of a failed parse. Not an operable level.
    Unknown = 0,
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
}

/// Returned from [`Level::from_str()`] when the input does not name one of the six levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl Error for ParseLevelError {}

impl Display for ParseLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a valid log level", self.input)
    }
}

impl Level {
    /// The six operable levels, from least to most severe.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Whether a message at this level passes a `threshold` minimum level.
    pub fn enabled(self, threshold: Level) -> bool {
        self >= threshold
    }

    /// The canonical upper case name. Returns `"unknown"` for [`Level::Unknown`].
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Unknown => "unknown",
        }
    }

    /// Parse a canonical level name, ignoring case. Anything else results in
    /// [`Level::Unknown`], which the caller needs to check for before using the level.
    pub fn parse(name: &str) -> Level {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Level::Unknown)
    }

    /// Whether this is one of the six operable levels.
    pub fn is_known(self) -> bool {
        self != Level::Unknown
    }

    /// The position of this level in a gate array. `None` for [`Level::Unknown`].
    pub(crate) fn gate_index(self) -> Option<usize> {
        match self {
            Level::Unknown => None,
            level => Some(level as usize - 1),
        }
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        match value {
            1 => Level::Trace,
            2 => Level::Debug,
            3 => Level::Info,
            4 => Level::Warn,
            5 => Level::Error,
            6 => Level::Fatal,
            _ => Level::Unknown,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Level::parse(s) {
            Level::Unknown => Err(ParseLevelError {
                input: s.to_owned(),
            }),
            level => Ok(level),
        }
    }
}
