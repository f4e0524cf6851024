//! A per-thread current node, so code deep in a call stack can log without
//! having a [`LogNode`] threaded through to it.
//!
//! [`set_default`] pushes a node for the current thread until the returned
//! guard is dropped. The free functions in this module, and the [`log!`]
//! family of macros, forward to whichever node is on top.
//!
//! When no node has been set, [`branch`] returns a node that discards
//! everything, so callers never need to check.
//!
//! # Examples
//!
//! ```
//! use tree_logger::sink::Capture;
//! use tree_logger::{local, Level, LogNode};
//!
//! fn parse() {
//!     tree_logger::warn!("unterminated string at {}:{}", 3, 14);
//! }
//!
//! let capture: Capture = Capture::new();
//! let root = LogNode::root(capture.clone());
//!
//! let _guard = local::set_default(root.branch(Level::INFO, Some("parsing"), None));
//! parse();
//!
//! let logs = capture.logs();
//! assert_eq!(logs[1].message(), "unterminated string at 3:14");
//! assert_eq!(logs[1].depth(), 1);
//! ```
//!
//! [`log!`]: crate::log
use crate::level::Level;
use crate::node::LogNode;
use crate::record::{Cause, HelpInfo};
use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

thread_local! {
    static CURRENT: RefCell<Vec<LogNode>> = RefCell::new(Vec::new());
}

/// Restores the previous current node of the thread when dropped.
///
/// Returned by [`set_default`]. Guards must be dropped on the thread that
/// created them, in reverse order of creation.
#[must_use = "the node is only current until the guard is dropped"]
#[derive(Debug)]
pub struct DefaultGuard {
    // Guards pop the stack of the thread they were made on.
    _not_send: PhantomData<*const ()>,
}

/// Makes `node` the current node of this thread until the returned guard is
/// dropped.
pub fn set_default(node: LogNode) -> DefaultGuard {
    CURRENT.with(|current| current.borrow_mut().push(node));
    DefaultGuard {
        _not_send: PhantomData,
    }
}

impl Drop for DefaultGuard {
    fn drop(&mut self) {
        // The stack may already be gone during thread teardown.
        let _ = CURRENT.try_with(|current| current.borrow_mut().pop());
    }
}

/// Returns the current node of this thread, if one was set.
pub fn current() -> Option<LogNode> {
    CURRENT
        .try_with(|current| current.borrow().last().cloned())
        .ok()
        .flatten()
}

/// Returns `true` if the current node would render `level`, and `false` if
/// there is no current node.
pub fn is_loggable(level: Level) -> bool {
    match current() {
        Some(node) => node.is_loggable(level),
        None => false,
    }
}

/// Logs an entry at the current node, if there is one.
pub fn log(level: Level, message: Option<&str>, cause: Option<Cause>, help: Option<HelpInfo>) {
    if let Some(node) = current() {
        node.log_with_help(level, message, cause, help);
    }
}

/// Creates a branch beneath the current node.
///
/// Returns a node that discards everything if there is no current node.
pub fn branch(
    level: Level,
    message: Option<&str>,
    cause: Option<Cause>,
    help: Option<HelpInfo>,
) -> LogNode {
    match current() {
        Some(node) => node.branch_with_help(level, message, cause, help),
        None => LogNode::null(),
    }
}

/// Runs `f` with `node` as the current node of this thread.
pub fn in_scope<F, R>(node: LogNode, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = set_default(node);
    f()
}

/// Wraps `future` so that `node` is the current node of whichever thread
/// polls it, for the duration of each poll.
///
/// Unlike holding a [`DefaultGuard`] across an `.await`, this keeps nodes
/// of futures interleaved on one thread apart, and the wrapper is [`Send`]
/// whenever `future` is.
///
/// # Examples
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use tree_logger::sink::Capture;
/// use tree_logger::{local, LogNode};
///
/// let capture: Capture = Capture::new();
/// let root = LogNode::root(capture.clone());
///
/// local::with_current(root, async {
///     tree_logger::info!("inside");
/// })
/// .await;
///
/// assert_eq!(capture.logs()[0].message(), "inside");
/// # }
/// ```
pub fn with_current<Fut: Future>(node: LogNode, future: Fut) -> WithCurrent<Fut> {
    WithCurrent {
        node,
        future: Box::pin(future),
    }
}

/// A future with its own current node. Returned by [`with_current`].
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct WithCurrent<Fut> {
    node: LogNode,
    future: Pin<Box<Fut>>,
}

impl<Fut: Future> Future for WithCurrent<Fut> {
    type Output = Fut::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Fut::Output> {
        let this = &mut *self;
        let _guard = set_default(this.node.clone());
        this.future.as_mut().poll(cx)
    }
}
