//! The standard backend. This is the backend that gets registered in practice, writing timestamped
//! records to STDERR, STDOUT, or a file.

use std::fmt::Arguments;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, RwLock};
use termcolor::{Color, ColorSpec, WriteColor};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::backend::{Backend, SetLevelError};
use crate::builder::OutputTarget;
use crate::level::Level;
use crate::target::OutputTargetImpl;

/// The record template used when none is configured.
pub const DEFAULT_FORMAT: &str = "[{timestamp}] [{level}] {message}";

/// The standard backend. Construct one using the [`LoggerBuilder`][crate::LoggerBuilder].
///
/// The minimum level is the source of truth for gating. The per-level gate is derived from it
/// whenever it changes, and the output target is only ever written to.
#[derive(Debug)]
pub struct StandardBackend {
    /// Read on every log call, written when the level changes.
    gate: RwLock<Gate>,
    /// The output target, and the description it was opened from so it can be reopened when the
    /// configuration changes. Lock this before `gate` when both are needed.
    output: Mutex<Output>,
    /// The parsed record template.
    template: Template,
    /// The local UTC offset, resolved once when the backend is created since it cannot be reliably
    /// queried once other threads have been spawned.
    utc_offset: UtcOffset,
}

/// The minimum level together with the enabled state for each level derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gate {
    min_level: Level,
    enabled: [bool; 6],
}

#[derive(Debug)]
struct Output {
    target: OutputTarget,
    target_impl: OutputTargetImpl,
}

/// A record template split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Template(Vec<Segment>);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Timestamp,
    Level,
    Message,
}

impl Gate {
    fn new(min_level: Level) -> Self {
        Self {
            min_level,
            enabled: Level::ALL.map(|level| level.enabled(min_level)),
        }
    }

    fn allows(&self, level: Level) -> bool {
        level
            .gate_index()
            .map_or(false, |index| self.enabled[index])
    }
}

impl Template {
    fn parse(format: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = format;
        while let Some(start) = rest.find('{') {
            literal.push_str(&rest[..start]);
            rest = &rest[start..];

            let placeholder = [
                ("{timestamp}", Segment::Timestamp),
                ("{level}", Segment::Level),
                ("{message}", Segment::Message),
            ]
            .into_iter()
            .find(|(name, _)| rest.starts_with(name));
            match placeholder {
                Some((name, segment)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &rest[name.len()..];
                }
                None => {
                    literal.push('{');
                    rest = &rest[1..];
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self(segments)
    }
}

impl StandardBackend {
    /// Called by the builder. `min_level` has already been checked to be a known level.
    pub(crate) fn new(
        min_level: Level,
        target: OutputTarget,
        target_impl: OutputTargetImpl,
        format: &str,
    ) -> Self {
        Self {
            gate: RwLock::new(Gate::new(min_level)),
            output: Mutex::new(Output {
                target,
                target_impl,
            }),
            template: Template::parse(format),
            utc_offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }

    /// The current minimum level.
    pub fn level(&self) -> Level {
        self.read_gate().min_level
    }

    /// The output target this backend writes to.
    pub fn output_target(&self) -> OutputTarget {
        self.lock_output().target.clone()
    }

    fn read_gate(&self) -> Gate {
        // The gate is `Copy` and only ever replaced as a whole, so a poisoned lock still holds a
        // consistent value
        *self
            .gate
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_output(&self) -> MutexGuard<'_, Output> {
        self.output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_record(
        &self,
        target_impl: &mut OutputTargetImpl,
        timestamp: OffsetDateTime,
        level: Level,
        message: &str,
    ) -> std::io::Result<()> {
        for segment in &self.template.0 {
            match segment {
                Segment::Literal(literal) => target_impl.writer().write_all(literal.as_bytes())?,
                Segment::Timestamp => {
                    let mut writer = target_impl.writer();
                    timestamp
                        .format_into(
                            &mut writer,
                            format_description!(
                                "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond digits:3]"
                            ),
                        )
                        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
                }
                Segment::Level => match target_impl.color_writer() {
                    Some(color_writer) => {
                        color_writer.set_color(&level_color(level))?;
                        write!(color_writer, "{level}")?;
                        color_writer.reset()?;
                    }
                    None => write!(target_impl.writer(), "{level}")?,
                },
                Segment::Message => target_impl.writer().write_all(message.as_bytes())?,
            }
        }
        writeln!(target_impl.writer())?;

        // Delivery is synchronous, every record is on its way once the call returns
        target_impl.writer().flush()
    }
}

impl Backend for StandardBackend {
    fn enabled(&self, level: Level) -> bool {
        self.read_gate().allows(level)
    }

    fn log(&self, level: Level, args: Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        // Formatting runs user code that may log through this backend again, so it must happen
        // before the output lock is taken
        let message = args.to_string();
        let timestamp = OffsetDateTime::now_utc().to_offset(self.utc_offset);

        let mut output = self.lock_output();
        // `set_level()` swaps the gate while holding the output lock, so this sees any level change
        // that completed since the first check
        if !self.enabled(level) {
            return;
        }

        // There is nowhere left to report a failure to write the log output to
        let _ = self.write_record(&mut output.target_impl, timestamp, level, &message);
    }

    fn set_level(&self, level: Level) -> Result<(), SetLevelError> {
        if !level.is_known() {
            return Err(SetLevelError::UnknownLevel);
        }

        // The target is reopened from its description with the new settings applied. If that
        // fails, nothing has been changed yet.
        let mut output = self.lock_output();
        let target_impl = OutputTargetImpl::open(&output.target).map_err(|error| {
            SetLevelError::FileOpenError {
                path: match &output.target {
                    OutputTarget::File(path) => path.clone(),
                    _ => Default::default(),
                },
                error,
            }
        })?;

        let _ = output.target_impl.writer().flush();
        output.target_impl = target_impl;
        *self
            .gate
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Gate::new(level);

        Ok(())
    }

    fn flush(&self) {
        let _ = self.lock_output().target_impl.writer().flush();
    }
}

/// The color used for a level's name on terminals.
fn level_color(level: Level) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match level {
        Level::Trace | Level::Unknown => spec.set_dimmed(true),
        Level::Debug => spec.set_fg(Some(Color::Blue)),
        Level::Info => spec.set_fg(Some(Color::Green)),
        Level::Warn => spec.set_fg(Some(Color::Yellow)),
        Level::Error => spec.set_fg(Some(Color::Red)),
        Level::Fatal => spec.set_fg(Some(Color::Red)).set_bold(true),
    };

    spec
}
