use crate::level::{Level, Severity};
use crate::record::Record;
use crate::sink::Sink;
use std::fmt;

/// A [`Sink`] that fans out to many sinks.
///
/// Each branch of a `Composite` is a `Composite` of the inner sinks'
/// branches, so nesting is tracked independently by every inner sink.
///
/// # Examples
///
/// ```
/// use tree_logger::sink::{Capture, Composite};
/// use tree_logger::{Level, LogNode};
///
/// let first: Capture = Capture::new();
/// let second: Capture = Capture::new();
/// let root = LogNode::root(Composite::new().with(first.clone()).with(second.clone()));
///
/// root.branch(Level::INFO, Some("loading"), None)
///     .log(Level::WARN, Some("slow disk"), None);
///
/// assert_eq!(first.logs(), second.logs());
/// assert_eq!(first.logs().len(), 2);
/// ```
pub struct Composite<L: Severity = Level> {
    sinks: Vec<Box<dyn Sink<L>>>,
}

impl<L: Severity> Composite<L> {
    /// Returns a `Composite` with no inner sinks.
    pub fn new() -> Self {
        Composite { sinks: Vec::new() }
    }

    /// Adds a sink to forward to.
    pub fn with<S: Sink<L>>(mut self, sink: S) -> Self {
        self.push(sink);
        self
    }

    /// Adds a sink to forward to.
    pub fn push<S: Sink<L>>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl<L: Severity> Default for Composite<L> {
    fn default() -> Self {
        Composite::new()
    }
}

impl<L: Severity> Sink<L> for Composite<L> {
    fn branch(&self) -> Box<dyn Sink<L>> {
        Box::new(Composite {
            sinks: self.sinks.iter().map(|sink| sink.branch()).collect(),
        })
    }

    fn commit_branch(&self, index: usize, record: &Record<L>) {
        for sink in self.sinks.iter() {
            sink.commit_branch(index, record);
        }
    }

    fn log_entry(&self, index: usize, record: &Record<L>) {
        for sink in self.sinks.iter() {
            sink.log_entry(index, record);
        }
    }
}

impl<L: Severity> fmt::Debug for Composite<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
