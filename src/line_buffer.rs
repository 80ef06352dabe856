use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use crate::source::Source;

/// A single trace record waiting to be rendered.
///
/// The display prefix is computed when the entry is created, so changing the
/// global prefix afterwards does not affect entries that are already pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    message: String,
    source: Source,
    prefix: String,
}

impl Entry {
    /// Creates an entry, rendering its prefix as `"{global_prefix}{file}:{line} "`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dabug::{Entry, Source};
    /// let source = Source { file: "src/main.rs".into(), function: "app::main".into(), line: 4 };
    /// let entry = Entry::new("started", source, "[app] ");
    /// assert_eq!(entry.prefix(), "[app] src/main.rs:4 ");
    /// ```
    pub fn new(message: impl Into<String>, source: Source, global_prefix: &str) -> Self {
        let prefix = format!("{global_prefix}{source} ");
        Self {
            message: message.into(),
            source,
            prefix,
        }
    }

    /// The message text, empty for bare "this ran" markers.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether this entry only marks that a line ran.
    pub fn is_bare(&self) -> bool {
        self.message.is_empty()
    }
}

/// Ordered, thread-safe sequence of pending entries.
///
/// All mutation happens under one mutex. A separate atomic counter mirrors the
/// length so emptiness checks never wait on the lock; it is only written while
/// the lock is held.
#[derive(Debug, Default)]
pub struct LineBuffer {
    lines: Mutex<Vec<Entry>>,
    pending: AtomicUsize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the tail of the buffer.
    pub fn append(&self, entry: Entry) {
        let mut lines = self.lines.lock();
        lines.push(entry);
        self.pending.store(lines.len(), Ordering::Release);
    }

    /// Takes every pending entry, leaving the buffer empty.
    ///
    /// Entries come back in the order they were appended.
    pub fn drain_all(&self) -> Vec<Entry> {
        let mut lines = self.lines.lock();
        self.pending.store(0, Ordering::Release);
        std::mem::take(&mut *lines)
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
