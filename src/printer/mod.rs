//! Utilities for formatting and writing committed branches and entries.
use crate::level::{Level, Severity};
use crate::record::Record;
use crate::sink::Sink;
use crate::{cfg_json, cfg_sync};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

mod pretty;
pub use pretty::Pretty;

cfg_json! {
    pub mod json;
    pub use json::Json;
}

cfg_sync! {
    mod sync;
    pub use sync::AsyncPrinter;
}

/// Whether a [`Line`] is a branch header or an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum LineKind {
    Branch,
    Entry,
}

/// A single committed branch header or entry, along with where it sits in
/// the tree.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(bound(serialize = "L: Severity")))]
pub struct Line<'a, L = Level> {
    pub(crate) kind: LineKind,

    /// How many branches deep the line sits.
    pub(crate) depth: usize,

    /// Position among the siblings of the line.
    pub(crate) index: usize,

    #[cfg_attr(feature = "serde", serde(flatten))]
    pub(crate) record: &'a Record<L>,
}

impl<'a, L: Severity> Line<'a, L> {
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Returns how many branches deep the line sits. Headers of the root's
    /// branches and entries logged at the root have depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn record(&self) -> &'a Record<L> {
        self.record
    }
}

/// Format a [`Line`] into a `String`.
///
/// The returned string should include its trailing newline.
///
/// This trait is implemented for all `Fn(&Line<'_, L>) -> Result<String, E>`
/// types, where `E: Error + Send + Sync`.
///
/// # Examples
///
/// ```
/// use std::fmt;
/// use tree_logger::printer::{Line, Printer};
/// use tree_logger::{Level, LogNode};
///
/// fn terse(line: &Line<'_, Level>) -> Result<String, fmt::Error> {
///     Ok(format!("{}{}\n", "-".repeat(line.depth()), line.record().message()))
/// }
///
/// let root = LogNode::root(Printer::new().formatter(terse));
/// root.branch(Level::INFO, Some("outer"), None)
///     .log(Level::INFO, Some("inner"), None);
/// ```
/// Produces the following result:
/// ```txt
/// outer
/// -inner
/// ```
pub trait Formatter<L: Severity = Level> {
    /// The error type if the `Line` cannot be stringified.
    type Error: Error + Send + Sync;

    /// Stringifies the `Line`, or returns an error.
    ///
    /// # Errors
    ///
    /// If the `Line` cannot be formatted to a string, an error is returned.
    fn fmt(&self, line: &Line<'_, L>) -> Result<String, Self::Error>;
}

impl<F, E, L> Formatter<L> for F
where
    F: Fn(&Line<'_, L>) -> Result<String, E>,
    E: Error + Send + Sync,
    L: Severity,
{
    type Error = E;

    #[inline]
    fn fmt(&self, line: &Line<'_, L>) -> Result<String, E> {
        self(line)
    }
}

/// Formats a line, reporting failures instead of returning them since sinks
/// have no way to.
pub(crate) fn render<L, F>(formatter: &F, line: &Line<'_, L>) -> Option<String>
where
    L: Severity,
    F: Formatter<L>,
{
    match formatter.fmt(line) {
        Ok(string) => Some(string),
        Err(err) => {
            tracing::warn!(target: "tree_logger", error = %err, "failed to format log line, dropping it");
            None
        }
    }
}

/// A [`Sink`] that formats and writes lines as soon as they're committed.
///
/// Each branch of a `Printer` writes one level deeper than its parent. The
/// formatter and writer are shared by every branch.
pub struct Printer<F, W> {
    formatter: Arc<F>,
    make_writer: Arc<W>,
    depth: usize,
}

/// A [`MakeWriter`] that writes to stdout.
///
/// This is functionally the same as using [`std::io::stdout`] as a `MakeWriter`,
/// except it has a named type and can therefore be used in type signatures.
#[derive(Debug)]
pub struct MakeStdout;

/// A [`MakeWriter`] that writes to stderr.
///
/// This is functionally the same as using [`std::io::stderr`] as a `MakeWriter`,
/// except it has a named type and can therefore be used in type signatures.
#[derive(Debug)]
pub struct MakeStderr;

impl<'a> MakeWriter<'a> for MakeStdout {
    type Writer = io::Stdout;

    fn make_writer(&self) -> Self::Writer {
        io::stdout()
    }
}

impl<'a> MakeWriter<'a> for MakeStderr {
    type Writer = io::Stderr;

    fn make_writer(&self) -> Self::Writer {
        io::stderr()
    }
}

/// A [`Sink`] that pretty-prints to stdout.
pub type PrettyPrinter = Printer<Pretty, MakeStdout>;

impl PrettyPrinter {
    /// Returns a new [`PrettyPrinter`] that pretty-prints to stdout.
    ///
    /// Use [`Printer::formatter`] and [`Printer::writer`] for custom configuration.
    pub fn new() -> Self {
        Printer {
            formatter: Arc::new(Pretty::new()),
            make_writer: Arc::new(MakeStdout),
            depth: 0,
        }
    }
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        PrettyPrinter::new()
    }
}

impl<F, W> Printer<F, W> {
    /// Set the formatter.
    ///
    /// See the [`Formatter`] trait for details on possible inputs.
    pub fn formatter<F2>(self, formatter: F2) -> Printer<F2, W> {
        Printer {
            formatter: Arc::new(formatter),
            make_writer: self.make_writer,
            depth: self.depth,
        }
    }

    /// Set the writer.
    pub fn writer<W2>(self, make_writer: W2) -> Printer<F, W2>
    where
        W2: for<'a> MakeWriter<'a>,
    {
        Printer {
            formatter: self.formatter,
            make_writer: Arc::new(make_writer),
            depth: self.depth,
        }
    }

    fn write<L>(&self, line: &Line<'_, L>)
    where
        L: Severity,
        F: Formatter<L>,
        W: for<'a> MakeWriter<'a>,
    {
        let string = match render(&*self.formatter, line) {
            Some(string) => string,
            None => return,
        };

        if let Err(err) = self.make_writer.make_writer().write_all(string.as_bytes()) {
            tracing::warn!(target: "tree_logger", error = %err, "failed to write log line, dropping it");
        }
    }
}

impl<F, W> Clone for Printer<F, W> {
    fn clone(&self) -> Self {
        Printer {
            formatter: Arc::clone(&self.formatter),
            make_writer: Arc::clone(&self.make_writer),
            depth: self.depth,
        }
    }
}

impl<F, W> fmt::Debug for Printer<F, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl<L, F, W> Sink<L> for Printer<F, W>
where
    L: Severity,
    F: 'static + Formatter<L> + Send + Sync,
    W: 'static + for<'a> MakeWriter<'a> + Send + Sync,
{
    fn branch(&self) -> Box<dyn Sink<L>> {
        Box::new(Printer {
            formatter: Arc::clone(&self.formatter),
            make_writer: Arc::clone(&self.make_writer),
            depth: self.depth + 1,
        })
    }

    fn commit_branch(&self, index: usize, record: &Record<L>) {
        self.write(&Line {
            kind: LineKind::Branch,
            depth: self.depth.saturating_sub(1),
            index,
            record,
        });
    }

    fn log_entry(&self, index: usize, record: &Record<L>) {
        self.write(&Line {
            kind: LineKind::Entry,
            depth: self.depth,
            index,
            record,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::LogNode;
    use parking_lot::Mutex;

    /// A writer that appends to a shared buffer.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuf(pub(crate) Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuf {
        type Writer = SharedBuf;

        fn make_writer(&self) -> Self::Writer {
            self.clone()
        }
    }

    fn depth_and_message(line: &Line<'_, Level>) -> Result<String, fmt::Error> {
        Ok(format!(
            "{:?} {} {} {}\n",
            line.kind(),
            line.depth(),
            line.index(),
            line.record().message()
        ))
    }

    #[test]
    fn headers_sit_one_level_above_their_entries() {
        let buf = SharedBuf::default();
        let root = LogNode::root(Printer::new().formatter(depth_and_message).writer(buf.clone()));

        root.log(Level::INFO, Some("top"), None);
        let outer = root.branch(Level::INFO, Some("outer"), None);
        let inner = outer.branch(Level::INFO, Some("inner"), None);
        inner.log(Level::WARN, Some("deep"), None);

        assert_eq!(
            buf.contents(),
            "Entry 0 0 top\nBranch 0 1 outer\nBranch 1 0 inner\nEntry 2 0 deep\n"
        );
    }

    #[test]
    fn formatting_failures_drop_the_line() {
        fn failing(_: &Line<'_, Level>) -> Result<String, fmt::Error> {
            Err(fmt::Error)
        }

        let buf = SharedBuf::default();
        let root = LogNode::root(Printer::new().formatter(failing).writer(buf.clone()));
        root.log(Level::ERROR, Some("lost"), None);

        assert_eq!(buf.contents(), "");
    }
}
