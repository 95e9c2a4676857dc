//! The logger's output targets.

use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use termcolor::{BufferedStandardStream, ColorChoice, WriteColor};

use crate::builder::OutputTarget;

/// Similar to [`crate::builder::OutputTarget`], but contains the actual data needed to write to the
/// target.
pub enum OutputTargetImpl {
    /// Writes to STDERR. May use colors depending on the environment.
    Stderr(BufferedStandardStream),
    /// Writes to STDOUT. May use colors depending on the environment.
    Stdout(BufferedStandardStream),
    /// Appends to a file. The path is kept around so the file can be reopened.
    File(PathBuf, BufWriter<File>),
    /// Writes to a shared in-memory buffer.
    Capture(CaptureBuffer),
}

impl Debug for OutputTargetImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTargetImpl::Stderr(stderr) => f
                .debug_tuple("Stderr")
                .field(if stderr.supports_color() {
                    &"<stderr stream with color support>"
                } else {
                    &"<stderr stream>"
                })
                .finish(),
            OutputTargetImpl::Stdout(stdout) => f
                .debug_tuple("Stdout")
                .field(if stdout.supports_color() {
                    &"<stdout stream with color support>"
                } else {
                    &"<stdout stream>"
                })
                .finish(),
            OutputTargetImpl::File(path, file) => {
                f.debug_tuple("File").field(path).field(file).finish()
            }
            OutputTargetImpl::Capture(buffer) => f.debug_tuple("Capture").field(buffer).finish(),
        }
    }
}

impl OutputTargetImpl {
    /// Open the target described by `target`. Only file targets can fail to open.
    pub fn open(target: &OutputTarget) -> Result<Self, std::io::Error> {
        Ok(match target {
            OutputTarget::Stderr => Self::new_stderr(),
            OutputTarget::Stdout => Self::new_stdout(),
            OutputTarget::File(path) => Self::new_file_path(path)?,
            OutputTarget::Capture(buffer) => Self::Capture(buffer.clone()),
        })
    }

    /// Construct an [`OutputTargetImpl`] that writes to STDERR with optional color support
    /// determined by the environment.
    pub fn new_stderr() -> Self {
        OutputTargetImpl::Stderr(BufferedStandardStream::stderr(color_support(
            atty::Stream::Stderr,
        )))
    }

    /// Construct an [`OutputTargetImpl`] that writes to STDOUT with optional color support
    /// determined by the environment.
    pub fn new_stdout() -> Self {
        OutputTargetImpl::Stdout(BufferedStandardStream::stdout(color_support(
            atty::Stream::Stdout,
        )))
    }

    /// Construct an [`OutputTargetImpl`] for doing buffered writes to a file. The file is created
    /// if it does not yet exist, and appended to otherwise.
    pub fn new_file_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let path = path.as_ref();
        let file = File::options().create(true).append(true).open(path)?;

        Ok(Self::File(
            path.to_path_buf(),
            BufWriter::with_capacity(1024, file),
        ))
    }

    /// A writer that can be written to using the [`write!()`] and [`writeln!()`] macros.
    pub fn writer(&mut self) -> &mut dyn Write {
        match self {
            OutputTargetImpl::Stderr(ref mut stderr) => stderr,
            OutputTargetImpl::Stdout(ref mut stdout) => stdout,
            OutputTargetImpl::File(_, ref mut file) => file,
            OutputTargetImpl::Capture(ref mut buffer) => buffer,
        }
    }

    /// The color writer for writing terminal colors. Returns `None` if the target is not a
    /// terminal stream that supports colors, in which case [`writer()`][Self::writer()] should be
    /// used instead.
    pub fn color_writer(&mut self) -> Option<&mut dyn WriteColor> {
        match self {
            OutputTargetImpl::Stderr(ref mut stream) | OutputTargetImpl::Stdout(ref mut stream)
                if stream.supports_color() =>
            {
                Some(stream)
            }
            _ => None,
        }
    }
}

/// A cloneable in-memory output target. Every clone refers to the same buffer, so a clone can be
/// handed to the logger while the original is used to inspect what was written.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl Debug for CaptureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("len", &self.lock().len())
            .finish()
    }
}

impl PartialEq for CaptureBuffer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl Eq for CaptureBuffer {}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// The written output split into lines, without line terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        // A panic while holding the lock cannot leave the byte buffer in an invalid state
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.lock().extend_from_slice(buf);

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Whether to use colors when outputting to `stream`. Considers the `CLICOLOR`, `CLICOLOR_FORCE`,
/// and `NO_COLOR` environment variables, and whether or not the stream is attached to a real TTY.
fn color_support(stream: atty::Stream) -> ColorChoice {
    if let Ok(value) = std::env::var("CLICOLOR_FORCE") {
        if value.trim() != "0" {
            return ColorChoice::Always;
        }
    }

    if let Ok(value) = std::env::var("NO_COLOR") {
        if value.trim() != "0" {
            return ColorChoice::Never;
        }
    }

    if let Ok(value) = std::env::var("CLICOLOR") {
        if value.trim() == "0" {
            return ColorChoice::Never;
        }
    }

    // If `CLICOLOR` is unset or set to a truthy value, and colors aren't forced, then terminal
    // support determines whether or not colors are used
    if atty::is(stream) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
