use std::fmt::Debug;
use std::io::{self, Write};
use std::path::PathBuf;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use crate::config::Config;
use crate::line_buffer::{Entry, LineBuffer};
use crate::renderer::{self, Markers};
use crate::source::Locator;

/// Destination for rendered trace output.
pub type Sink = Box<dyn Write + Send>;

/// Buffers trace entries and writes them to a sink.
///
/// Entries are recorded with the caller's source location. By default they
/// are held until [`flush`](Tracer::flush), which writes them as one block
/// with their messages aligned in a single column:
///
/// ```text
/// -----
/// src/main.rs:10  - A
/// src/main.rs:12  - B
/// src/worker.rs:7 - C
/// =====
/// ```
///
/// With autoflush enabled every entry is written as soon as it is recorded.
///
/// # Thread Safety
///
/// A `Tracer` can be shared freely between threads. The pending entries are
/// guarded by one lock and the configuration and sink by their own, so
/// changing settings never corrupts the buffer. Entries from racing threads
/// appear in the order they acquired the buffer lock.
///
/// Locks are always taken in the order configuration, then buffer or sink.
/// Recording appends while holding the configuration read lock, and switching
/// autoflush on claims the sink before releasing the configuration, so a line
/// written in the new mode always follows the backlog it replaces.
///
/// # Function Names
///
/// Rust call-site locations carry no function name, so the methods here
/// record an empty [`Source::function`](crate::Source::function). The crate's
/// macros ([`here!`](crate::here!), [`msg!`](crate::msg!), [`objs!`](crate::objs!),
/// [`check!`](crate::check!)) fill it in; use them with `to: tracer` when the
/// function matters.
///
/// # Output Failures
///
/// [`flush`](Tracer::flush) and autoflush writes never fail: a sink error is
/// reported through `tracing` and the output is dropped. Use
/// [`try_flush`](Tracer::try_flush) to observe the error instead.
///
/// # Examples
///
/// ```
/// # use dabug::{Config, Tracer};
/// # use std::sync::{Arc, Mutex};
/// # use std::io::Write;
/// # #[derive(Clone, Default)]
/// # struct Shared(Arc<Mutex<Vec<u8>>>);
/// # impl Write for Shared {
/// #     fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.0.lock().unwrap().write(buf) }
/// #     fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
/// # }
/// let out = Shared::default();
/// let tracer = Tracer::new(Config::default(), out.clone());
///
/// tracer.msg("loading");
/// tracer.here();
/// assert_eq!(tracer.pending(), 2);
///
/// tracer.flush();
/// let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
/// assert_eq!(text.lines().count(), 4);
/// ```
pub struct Tracer {
    buffer: LineBuffer,
    config: RwLock<Config>,
    locator: RwLock<Locator>,
    sink: Mutex<Sink>,
}

impl Tracer {
    /// Creates a tracer writing to `sink`.
    pub fn new(mut config: Config, sink: impl Write + Send + 'static) -> Self {
        let locator = Locator::new(config.base_dir.take());
        Self {
            buffer: LineBuffer::new(),
            config: RwLock::new(config),
            locator: RwLock::new(locator),
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Creates a tracer writing to standard output.
    pub fn stdout(config: Config) -> Self {
        Self::new(config, io::stdout())
    }

    /// Creates a tracer writing to standard output, configured from the
    /// environment (see [`Config::from_env`]).
    pub fn from_env() -> Self {
        Self::stdout(Config::from_env())
    }

    /// Replaces the output sink.
    pub fn set_sink(&self, sink: impl Write + Send + 'static) {
        *self.sink.lock() = Box::new(sink);
    }

    /// Sets the global prefix.
    ///
    /// Entries already pending keep the prefix they were recorded with; the
    /// block markers use the prefix in effect when the block is flushed.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.config.write().prefix = prefix.into();
    }

    /// Turns autoflush on or off.
    ///
    /// Pending entries are flushed first, so nothing recorded before the
    /// switch is lost and no immediate line can overtake them.
    pub fn set_autoflush(&self, autoflush: bool) {
        let mut config = self.config.write();
        config.autoflush = autoflush;

        let entries = self.buffer.drain_all();
        if entries.is_empty() {
            return;
        }

        let block = renderer::render_block(&entries, &config.prefix, &config.markers);
        // Claim the sink before other recorders can observe the new mode.
        let mut sink = self.sink.lock();
        drop(config);

        tracing::trace!(entries = entries.len(), "flushing backlog before autoflush switch");
        if let Err(err) = write_to(&mut sink, block.as_bytes()) {
            tracing::warn!(error = %err, "failed to write trace block");
        }
    }

    pub fn set_markers(&self, markers: Markers) {
        self.config.write().markers = markers;
    }

    /// Sets the directory source paths are reported relative to.
    pub fn set_base_dir(&self, base_dir: Option<PathBuf>) {
        *self.locator.write() = Locator::new(base_dir);
    }

    pub fn prefix(&self) -> String {
        self.config.read().prefix.clone()
    }

    pub fn autoflush(&self) -> bool {
        self.config.read().autoflush
    }

    pub fn markers(&self) -> Markers {
        self.config.read().markers.clone()
    }

    pub fn base_dir(&self) -> Option<PathBuf> {
        self.locator.read().base_dir().map(PathBuf::from)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        let mut config = self.config.read().clone();
        config.base_dir = self.base_dir();
        config
    }

    /// Number of entries waiting for a flush.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Records that the calling line ran, with no message.
    ///
    /// Leaves the function name empty; [`here!`](crate::here!) records it.
    #[track_caller]
    pub fn here(&self) {
        self.record("", String::new());
    }

    /// Records a message.
    ///
    /// Leaves the function name empty; [`msg!`](crate::msg!) records it.
    #[track_caller]
    pub fn msg(&self, message: impl Into<String>) {
        self.record("", message);
    }

    /// Records the `Debug` form of each value, tagged with its index.
    ///
    /// `tracer.objs(&[&42, &"x"])` records `[0] 42, [1] "x"`.
    #[track_caller]
    pub fn objs(&self, values: &[&dyn Debug]) {
        self.record("", renderer::dump_values(values));
    }

    /// Records a value serialized as JSON, as `CHECK - {json}`.
    #[track_caller]
    pub fn check<T: Serialize + ?Sized>(&self, value: &T) {
        self.record("", renderer::check_message(value));
    }

    /// Records a message attributed to `function`.
    ///
    /// This is what the crate's macros expand to; the source file and line
    /// are those of the caller.
    #[track_caller]
    pub fn record(&self, function: &str, message: impl Into<String>) {
        let source = self.locator.read().capture(function);

        let config = self.config.read();
        let entry = Entry::new(message, source, &config.prefix);
        if config.autoflush {
            drop(config);
            self.write_line(&entry);
        } else {
            // Lock order is config, then buffer or sink.
            self.buffer.append(entry);
        }
    }

    /// Removes and returns the pending entries without writing them.
    pub fn drain(&self) -> Vec<Entry> {
        self.buffer.drain_all()
    }

    /// Writes all pending entries as one block, ignoring sink errors.
    ///
    /// Does nothing when no entries are pending.
    pub fn flush(&self) {
        if let Err(err) = self.try_flush() {
            tracing::warn!(error = %err, "failed to write trace block");
        }
    }

    /// Writes all pending entries as one block.
    ///
    /// The entries are removed from the buffer even if the write fails.
    pub fn try_flush(&self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let (prefix, markers) = {
            let config = self.config.read();
            (config.prefix.clone(), config.markers.clone())
        };

        let entries = self.buffer.drain_all();
        if entries.is_empty() {
            return Ok(());
        }

        tracing::trace!(entries = entries.len(), "flushing trace block");
        let block = renderer::render_block(&entries, &prefix, &markers);
        self.write_out(block.as_bytes())
    }

    fn write_line(&self, entry: &Entry) {
        let mut line = renderer::render_single(entry);
        line.push('\n');
        if let Err(err) = self.write_out(line.as_bytes()) {
            tracing::warn!(error = %err, "failed to write trace line");
        }
    }

    fn write_out(&self, bytes: &[u8]) -> io::Result<()> {
        write_to(&mut self.sink.lock(), bytes)
    }
}

fn write_to(sink: &mut Sink, bytes: &[u8]) -> io::Result<()> {
    sink.write_all(bytes)?;
    sink.flush()
}

impl Drop for Tracer {
    fn drop(&mut self) {
        // Don't lose entries recorded since the last flush
        self.flush();
    }
}

impl Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("config", &*self.config.read())
            .field("locator", &*self.locator.read())
            .field("pending", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
