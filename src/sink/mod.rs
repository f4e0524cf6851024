//! The contract between the tree and whatever renders it.
//!
//! See [`Sink`] for more details.
use crate::level::{Level, Severity};
use crate::record::Record;
use std::sync::Arc;

mod capture;
pub use capture::{Capture, Captured, CapturedRecord};

mod composite;
pub use composite::Composite;

mod host;
pub use host::TracingSink;

/// A type that renders committed branches and entries.
///
/// Every [`LogNode`] owns one sink handle. The root's handle is whatever the
/// tree was created with, and each branch gets its handle from its parent's
/// by calling [`branch`]. Sinks with no notion of nesting can return a copy
/// of themselves; sinks that do nest (indentation, tree widgets, ...) can
/// keep per-branch state in the returned handle.
///
/// The tree only calls [`commit_branch`] and [`log_entry`] once it knows the
/// output matters, and always commits a branch before any of its
/// descendants. Indices are unique and increasing within a parent, but not
/// contiguous: indices spent on discarded entries are never handed out again.
///
/// Sinks are shared across threads, so implementors are responsible for
/// synchronizing any state they mutate.
///
/// [`LogNode`]: crate::LogNode
/// [`branch`]: Sink::branch
/// [`commit_branch`]: Sink::commit_branch
/// [`log_entry`]: Sink::log_entry
pub trait Sink<L: Severity = Level>: 'static + Send + Sync {
    /// Returns the handle for a new branch beneath this one.
    ///
    /// Called for every branch, whether or not it's ever committed.
    fn branch(&self) -> Box<dyn Sink<L>>;

    /// Renders the header of the branch this handle belongs to.
    ///
    /// `index` is the branch's position among its parent's children and
    /// entries. Called at most once per handle, after the parent's header.
    fn commit_branch(&self, index: usize, record: &Record<L>);

    /// Renders an entry directly beneath the branch this handle belongs to.
    ///
    /// The branch itself has already been committed when this is called.
    fn log_entry(&self, index: usize, record: &Record<L>);

    /// Returns a sink that forwards to both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tree_logger::sink::{Capture, Sink, TracingSink};
    /// use tree_logger::{Level, LogNode};
    ///
    /// let capture: Capture = Capture::new();
    /// let root = LogNode::root(capture.clone().and(TracingSink::new()));
    /// root.log(Level::INFO, Some("to both"), None);
    ///
    /// assert_eq!(capture.logs().len(), 1);
    /// ```
    fn and<S>(self, other: S) -> Composite<L>
    where
        Self: Sized,
        S: Sink<L>,
    {
        Composite::new().with(self).with(other)
    }
}

/// A [`Sink`] that ignores everything it's given.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl<L: Severity> Sink<L> for NullSink {
    fn branch(&self) -> Box<dyn Sink<L>> {
        Box::new(NullSink)
    }

    fn commit_branch(&self, _index: usize, _record: &Record<L>) {}

    fn log_entry(&self, _index: usize, _record: &Record<L>) {}
}

impl<L: Severity> Sink<L> for Box<dyn Sink<L>> {
    fn branch(&self) -> Box<dyn Sink<L>> {
        self.as_ref().branch()
    }

    fn commit_branch(&self, index: usize, record: &Record<L>) {
        self.as_ref().commit_branch(index, record)
    }

    fn log_entry(&self, index: usize, record: &Record<L>) {
        self.as_ref().log_entry(index, record)
    }
}

impl<L: Severity, S: Sink<L>> Sink<L> for Arc<S> {
    fn branch(&self) -> Box<dyn Sink<L>> {
        self.as_ref().branch()
    }

    fn commit_branch(&self, index: usize, record: &Record<L>) {
        self.as_ref().commit_branch(index, record)
    }

    fn log_entry(&self, index: usize, record: &Record<L>) {
        self.as_ref().log_entry(index, record)
    }
}
