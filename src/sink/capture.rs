use crate::level::{Level, Severity};
use crate::record::{DisplayCauses, Record};
use crate::sink::Sink;
use parking_lot::Mutex;
use std::sync::Arc;

/// A single call made to a [`Capture`] sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Captured<L = Level> {
    /// A branch header was committed.
    Branch(CapturedRecord<L>),
    /// An entry was logged.
    Entry(CapturedRecord<L>),
}

/// The parts of a [`Record`] kept by a [`Capture`] sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedRecord<L = Level> {
    /// How many branches deep the record sits. Entries directly beneath the
    /// root have depth 0, as do the headers of the root's branches.
    pub depth: usize,
    pub index: usize,
    pub level: L,
    pub message: String,
    /// The cause chain, joined by `": "`.
    pub cause: Option<String>,
}

impl<L: Severity> Captured<L> {
    pub fn is_branch(&self) -> bool {
        matches!(self, Captured::Branch(_))
    }

    pub fn record(&self) -> &CapturedRecord<L> {
        match self {
            Captured::Branch(record) | Captured::Entry(record) => record,
        }
    }

    pub fn message(&self) -> &str {
        &self.record().message
    }

    pub fn level(&self) -> L {
        self.record().level
    }

    pub fn depth(&self) -> usize {
        self.record().depth
    }

    pub fn index(&self) -> usize {
        self.record().index
    }
}

/// A [`Sink`] that stores every call in memory.
///
/// Clones share the same storage, so a clone can be kept around to inspect
/// what a tree committed.
///
/// # Examples
///
/// ```
/// use tree_logger::sink::Capture;
/// use tree_logger::{Level, LogNode};
///
/// let capture: Capture = Capture::new();
/// let root = LogNode::root(capture.clone());
///
/// let child = root.branch(Level::DEBUG, Some("parsing"), None);
/// child.log(Level::ERROR, Some("unexpected token"), None);
///
/// let logs = capture.logs();
/// assert!(logs[0].is_branch());
/// assert_eq!(logs[0].message(), "parsing");
/// assert_eq!(logs[1].message(), "unexpected token");
/// assert_eq!(logs[1].depth(), 1);
/// ```
#[derive(Debug)]
pub struct Capture<L = Level> {
    depth: usize,
    logs: Arc<Mutex<Vec<Captured<L>>>>,
}

impl<L: Severity> Capture<L> {
    pub fn new() -> Self {
        Capture {
            depth: 0,
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a copy of everything captured so far, in the order the calls
    /// were made.
    pub fn logs(&self) -> Vec<Captured<L>> {
        self.logs.lock().clone()
    }

    /// Removes and returns everything captured so far.
    pub fn take(&self) -> Vec<Captured<L>> {
        std::mem::take(&mut *self.logs.lock())
    }

    fn capture(&self, depth: usize, index: usize, record: &Record<L>) -> CapturedRecord<L> {
        let cause = match record.cause() {
            Some(_) => Some(DisplayCauses(record).to_string()),
            None => None,
        };

        CapturedRecord {
            depth,
            index,
            level: record.level(),
            message: record.message().to_owned(),
            cause,
        }
    }
}

impl<L: Severity> Clone for Capture<L> {
    fn clone(&self) -> Self {
        Capture {
            depth: self.depth,
            logs: Arc::clone(&self.logs),
        }
    }
}

impl<L: Severity> Default for Capture<L> {
    fn default() -> Self {
        Capture::new()
    }
}

impl<L: Severity> Sink<L> for Capture<L> {
    fn branch(&self) -> Box<dyn Sink<L>> {
        Box::new(Capture {
            depth: self.depth + 1,
            logs: Arc::clone(&self.logs),
        })
    }

    fn commit_branch(&self, index: usize, record: &Record<L>) {
        let captured = self.capture(self.depth.saturating_sub(1), index, record);
        self.logs.lock().push(Captured::Branch(captured));
    }

    fn log_entry(&self, index: usize, record: &Record<L>) {
        let captured = self.capture(self.depth, index, record);
        self.logs.lock().push(Captured::Entry(captured));
    }
}
