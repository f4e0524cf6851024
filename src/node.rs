//! The lazily committed logging tree.
//!
//! See [`LogNode`] for more details.
use crate::cfg_uuid;
use crate::level::{self, Level, Severity};
use crate::record::{Cause, HelpInfo, Record, NULL_BRANCH_MESSAGE, NULL_LOG_MESSAGE};
use crate::sink::{NullSink, Sink};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
#[cfg(feature = "uuid")]
use uuid::Uuid;

/// A node in a logging tree.
///
/// Nodes are created either as a root, with [`LogNode::root`], or by calling
/// [`branch`] on an existing node. Branching always succeeds and is cheap:
/// a branch whose severity isn't loggable is held back, and only handed to
/// the [`Sink`] once something logged beneath it turns out to matter. When
/// that happens, every held back ancestor is committed first, from the top
/// down, so entries never show up without the headers that explain them.
///
/// Branches and entries of a node share one index sequence, so sinks can
/// order a node's own entries relative to its sub-branches.
///
/// `LogNode` is cheap to clone; clones refer to the same node. Nodes can be
/// shared freely across threads.
///
/// # Examples
///
/// ```
/// use tree_logger::sink::Capture;
/// use tree_logger::{Level, LogNode};
///
/// let capture: Capture = Capture::new();
/// let root = LogNode::root(capture.clone());
/// root.set_max_detail(Level::INFO);
///
/// // Too detailed to show on its own, so nothing is rendered yet.
/// let unit = root.branch(Level::TRACE, Some("compiling unit `main`"), None);
/// let method = unit.branch(Level::TRACE, Some("compiling `main::run`"), None);
/// assert!(capture.logs().is_empty());
///
/// // Now both headers are rendered, in order, before the error.
/// method.log(Level::ERROR, Some("unresolved symbol `frobnicate`"), None);
///
/// let messages: Vec<String> = capture
///     .logs()
///     .iter()
///     .map(|log| log.message().to_owned())
///     .collect();
/// assert_eq!(
///     messages,
///     [
///         "compiling unit `main`",
///         "compiling `main::run`",
///         "unresolved symbol `frobnicate`",
///     ]
/// );
/// ```
///
/// [`branch`]: LogNode::branch
pub struct LogNode<L: Severity = Level> {
    node: Arc<Node<L>>,
}

struct Node<L: Severity> {
    parent: Option<Arc<Node<L>>>,

    /// Position among the parent's children and entries. Zero for the root.
    index: usize,

    /// Hands out indices to children and entries. Kept apart from `state`
    /// so that allocating never waits behind a commit.
    next_child_index: AtomicUsize,

    state: Mutex<State<L>>,

    sink: Box<dyn Sink<L>>,

    #[cfg(feature = "uuid")]
    uuid: Uuid,
}

struct State<L: Severity> {
    max_detail: L,

    /// The branch header, until it's committed. Never set again afterwards.
    pending: Option<Record<L>>,
}

impl<L: Severity> LogNode<L> {
    /// Returns the root of a new tree rendering to `sink`.
    ///
    /// The root renders everything, down to [`Severity::ALL`], until
    /// configured otherwise with [`set_max_detail`].
    ///
    /// [`set_max_detail`]: LogNode::set_max_detail
    pub fn root<S: Sink<L>>(sink: S) -> Self {
        LogNode::from_boxed(Box::new(sink))
    }

    /// Same as [`LogNode::root`], for sinks that are already boxed.
    pub fn from_boxed(sink: Box<dyn Sink<L>>) -> Self {
        let node = Node {
            parent: None,
            index: 0,
            next_child_index: AtomicUsize::new(0),
            state: Mutex::new(State {
                max_detail: L::ALL,
                pending: None,
            }),
            sink,
            #[cfg(feature = "uuid")]
            uuid: Uuid::new_v4(),
        };

        LogNode {
            node: Arc::new(node),
        }
    }

    /// Returns the root of a tree that discards everything.
    pub fn null() -> Self {
        LogNode::root(NullSink)
    }

    /// Returns `true` if entries at `level` would be rendered by this node.
    ///
    /// This walks the parent chain of this node's max detail, so `level` is
    /// loggable iff it is the max detail or any less detailed severity.
    pub fn is_loggable(&self, level: L) -> bool {
        let max_detail = self.node.state.lock().max_detail;
        level::permits(max_detail, level)
    }

    /// Returns the most detailed severity this node renders.
    pub fn max_detail(&self) -> L {
        self.node.state.lock().max_detail
    }

    /// Sets the most detailed severity this node renders.
    ///
    /// Only affects this node and branches created from it afterwards;
    /// existing branches keep the value they were created with. Passing
    /// `None` resets to [`Severity::DEFAULT`].
    pub fn set_max_detail(&self, level: impl Into<Option<L>>) {
        let level = level.into().unwrap_or(L::DEFAULT);
        self.node.state.lock().max_detail = level;
    }

    /// Creates a branch beneath this node.
    ///
    /// Always returns a new node, whether or not `level` is loggable. If it
    /// is, the branch is committed right away; otherwise it is committed the
    /// first time something beneath it is logged, or never.
    ///
    /// A `None` message is replaced by [`NULL_BRANCH_MESSAGE`].
    pub fn branch(&self, level: L, message: Option<&str>, cause: Option<Cause>) -> LogNode<L> {
        self.branch_with_help(level, message, cause, None)
    }

    /// Same as [`branch`], attaching a [`HelpInfo`] to the branch header.
    ///
    /// [`branch`]: LogNode::branch
    pub fn branch_with_help(
        &self,
        level: L,
        message: Option<&str>,
        cause: Option<Cause>,
        help: Option<HelpInfo>,
    ) -> LogNode<L> {
        let index = self.node.allocate_index();
        let max_detail = self.node.state.lock().max_detail;

        let record = self
            .node
            .record(level, message.unwrap_or(NULL_BRANCH_MESSAGE), cause, help);

        let child = Node {
            parent: Some(Arc::clone(&self.node)),
            index,
            next_child_index: AtomicUsize::new(0),
            state: Mutex::new(State {
                max_detail,
                pending: Some(record),
            }),
            sink: self.node.sink.branch(),
            #[cfg(feature = "uuid")]
            uuid: self.node.uuid,
        };

        let child = LogNode {
            node: Arc::new(child),
        };

        if child.is_loggable(level) {
            child.node.commit();
        }

        child
    }

    /// Logs an entry at this node.
    ///
    /// If `level` isn't loggable the entry is dropped, but it still uses up
    /// an index. Otherwise this node and all of its uncommitted ancestors
    /// are committed before the entry is handed to the sink.
    ///
    /// A `None` message is replaced by [`NULL_LOG_MESSAGE`].
    pub fn log(&self, level: L, message: Option<&str>, cause: Option<Cause>) {
        self.log_with_help(level, message, cause, None)
    }

    /// Same as [`log`], attaching a [`HelpInfo`] to the entry.
    ///
    /// [`log`]: LogNode::log
    pub fn log_with_help(
        &self,
        level: L,
        message: Option<&str>,
        cause: Option<Cause>,
        help: Option<HelpInfo>,
    ) {
        let index = self.node.allocate_index();

        let mut state = self.node.state.lock();
        if !level::permits(state.max_detail, level) {
            return;
        }

        self.node.commit_locked(&mut state);

        let record = self
            .node
            .record(level, message.unwrap_or(NULL_LOG_MESSAGE), cause, help);

        self.node.sink.log_entry(index, &record);
    }

    /// Returns this node's position among its parent's children and entries,
    /// or `None` for the root.
    pub fn index(&self) -> Option<usize> {
        self.node.parent.as_ref().map(|_| self.node.index)
    }

    /// Returns the node this one was branched from.
    pub fn parent(&self) -> Option<LogNode<L>> {
        self.node.parent.as_ref().map(|parent| LogNode {
            node: Arc::clone(parent),
        })
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    /// Returns `true` once the node's header has been handed to its sink.
    /// The root is always committed.
    pub fn is_committed(&self) -> bool {
        self.node.state.lock().pending.is_none()
    }

    /// Returns a path-like identifier for this node.
    ///
    /// The root is `"#"`. Other nodes join the indices leading to them with
    /// dots, e.g. `"2.0.5"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tree_logger::{Level, LogNode};
    ///
    /// let root: LogNode = LogNode::null();
    /// root.log(Level::INFO, Some("first"), None);
    /// let child = root.branch(Level::INFO, Some("second"), None);
    /// let grandchild = child.branch(Level::INFO, Some("third"), None);
    ///
    /// assert_eq!(root.id(), "#");
    /// assert_eq!(child.id(), "1");
    /// assert_eq!(grandchild.id(), "1.0");
    /// ```
    pub fn id(&self) -> String {
        self.to_string()
    }

    cfg_uuid! {
        /// Returns the [`Uuid`] shared by every node of this tree.
        pub fn uuid(&self) -> Uuid {
            self.node.uuid
        }
    }

    /// Commits this node's header, and those of its ancestors, if they
    /// haven't been already.
    #[cfg(test)]
    pub(crate) fn commit(&self) {
        self.node.commit()
    }
}

impl<L: Severity> Node<L> {
    fn allocate_index(&self) -> usize {
        self.next_child_index.fetch_add(1, Ordering::Relaxed)
    }

    fn record(
        &self,
        level: L,
        message: &str,
        cause: Option<Cause>,
        help: Option<HelpInfo>,
    ) -> Record<L> {
        let record = Record::new(level, message, cause, help);
        #[cfg(feature = "uuid")]
        let record = record.with_uuid(self.uuid);
        record
    }

    fn commit(&self) {
        let mut state = self.state.lock();
        self.commit_locked(&mut state);
    }

    // Locks are only ever taken from a node toward its ancestors, so holding
    // every uncommitted ancestor's lock at once can't deadlock.
    fn commit_locked(&self, state: &mut State<L>) {
        if state.pending.is_none() {
            return;
        }

        let mut held = Vec::new();
        let mut next = self.parent.as_deref();
        while let Some(node) = next {
            let guard = node.state.lock();
            if guard.pending.is_none() {
                break;
            }
            next = node.parent.as_deref();
            held.push((node, guard));
        }

        // Top down.
        while let Some((node, mut guard)) = held.pop() {
            if let Some(record) = guard.pending.take() {
                node.sink.commit_branch(node.index, &record);
            }
        }

        if let Some(record) = state.pending.take() {
            self.sink.commit_branch(self.index, &record);
        }
    }

    fn fmt_id(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "smallvec")]
        let mut path = smallvec::SmallVec::<[usize; 16]>::new();
        #[cfg(not(feature = "smallvec"))]
        let mut path = Vec::with_capacity(16);

        let mut current = self;
        while let Some(parent) = &current.parent {
            path.push(current.index);
            current = &**parent;
        }

        if path.is_empty() {
            return f.write_str("#");
        }

        for (i, index) in path.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
        }

        Ok(())
    }
}

// Unlinks the parent chain one node at a time, so dropping a deep tree
// doesn't recurse once per level.
impl<L: Severity> Drop for Node<L> {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Arc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl<L: Severity> Clone for LogNode<L> {
    fn clone(&self) -> Self {
        LogNode {
            node: Arc::clone(&self.node),
        }
    }
}

impl<L: Severity> fmt::Display for LogNode<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.fmt_id(f)
    }
}

impl<L: Severity> fmt::Debug for LogNode<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.node.state.lock();
        f.debug_struct("LogNode")
            .field("id", &self.to_string())
            .field("max_detail", &state.max_detail)
            .field("committed", &state.pending.is_none())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Capture, Captured};

    fn capture_root() -> (Capture, LogNode) {
        let capture = Capture::new();
        let root = LogNode::root(capture.clone());
        (capture, root)
    }

    fn messages(logs: &[Captured]) -> Vec<&str> {
        logs.iter().map(|log| log.message()).collect()
    }

    #[test]
    fn root_is_committed_and_commit_is_a_no_op() {
        let (capture, root) = capture_root();
        assert!(root.is_root());
        assert!(root.is_committed());
        assert_eq!(root.index(), None);

        root.commit();
        assert!(capture.logs().is_empty());
    }

    #[test]
    fn loggable_branch_commits_eagerly() {
        let (capture, root) = capture_root();
        let child = root.branch(Level::INFO, Some("eager"), None);

        assert!(child.is_committed());
        let logs = capture.logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].is_branch());
        assert_eq!(logs[0].index(), 0);
    }

    #[test]
    fn unloggable_branch_stays_pending() {
        let (capture, root) = capture_root();
        root.set_max_detail(Level::WARN);
        let child = root.branch(Level::DEBUG, Some("lazy"), None);

        assert!(!child.is_committed());
        assert!(capture.logs().is_empty());

        child.commit();
        assert!(child.is_committed());
        assert_eq!(messages(&capture.logs()), ["lazy"]);
    }

    #[test]
    fn explicit_commit_twice_renders_once() {
        let (capture, root) = capture_root();
        root.set_max_detail(Level::ERROR);
        let child = root.branch(Level::INFO, None, None);

        child.commit();
        child.commit();

        assert_eq!(messages(&capture.logs()), [NULL_BRANCH_MESSAGE]);
    }

    #[test]
    fn set_max_detail_none_resets_to_default() {
        let root = LogNode::<Level>::null();
        assert_eq!(root.max_detail(), Level::ALL);

        root.set_max_detail(Level::ERROR);
        assert_eq!(root.max_detail(), Level::ERROR);

        root.set_max_detail(None);
        assert_eq!(root.max_detail(), Level::INFO);
    }

    #[test]
    fn children_inherit_max_detail_at_creation() {
        let root = LogNode::<Level>::null();
        root.set_max_detail(Level::WARN);
        let before = root.branch(Level::ERROR, Some("before"), None);

        root.set_max_detail(Level::SPAM);
        let after = root.branch(Level::ERROR, Some("after"), None);

        assert_eq!(before.max_detail(), Level::WARN);
        assert_eq!(after.max_detail(), Level::SPAM);
    }

    #[test]
    fn ids_follow_indices() {
        let root = LogNode::<Level>::null();
        let a = root.branch(Level::INFO, None, None);
        let b = root.branch(Level::INFO, None, None);
        let b0 = b.branch(Level::INFO, None, None);
        b.log(Level::INFO, None, None);
        let b2 = b.branch(Level::INFO, None, None);

        assert_eq!(a.id(), "0");
        assert_eq!(b0.id(), "1.0");
        assert_eq!(b2.id(), "1.2");
        assert_eq!(b2.parent().map(|parent| parent.id()), Some("1".to_owned()));
        assert_eq!(format!("{}", root), "#");
    }
}
