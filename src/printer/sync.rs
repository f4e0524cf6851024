//! A [`Sink`] that hands formatted lines to another task to be written.
//!
//! See [`AsyncPrinter`] for more details.
use crate::level::Severity;
use crate::printer::{render, Formatter, Line, LineKind};
use crate::record::Record;
use crate::sink::Sink;
use std::fmt;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::MakeWriter;

/// A [`Sink`] that formats lines on the calling thread, then sends them to
/// another [`tokio`] task for writing.
///
/// Lines are written in the order they were committed. The writing task
/// finishes once every clone and branch of the printer has been dropped.
///
/// This type is usually created and used by the [`Builder`] type.
///
/// [`Builder`]: crate::builder::Builder
pub struct AsyncPrinter<F> {
    formatter: Arc<F>,
    tx: mpsc::UnboundedSender<String>,
    depth: usize,
}

impl<F> AsyncPrinter<F> {
    /// Create a new [`AsyncPrinter`] and the [`Future`] that writes its
    /// lines, returning both.
    ///
    /// # Examples
    ///
    /// ```
    /// use tree_logger::printer::{AsyncPrinter, Pretty};
    /// use tree_logger::{Level, LogNode};
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() {
    ///     let (printer, fut) = AsyncPrinter::spawn(Pretty::new(), std::io::stdout);
    ///     let handle = tokio::spawn(fut);
    ///
    ///     let root: LogNode = LogNode::root(printer);
    ///     root.log(Level::INFO, Some("it works!"), None);
    ///
    ///     // drop the tree to close all senders
    ///     drop(root);
    ///     handle.await.unwrap();
    /// }
    /// ```
    pub fn spawn<W>(formatter: F, make_writer: W) -> (Self, impl Future<Output = ()>)
    where
        W: 'static + for<'a> MakeWriter<'a> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let handle = async move {
            while let Some(line) = rx.recv().await {
                if let Err(err) = make_writer.make_writer().write_all(line.as_bytes()) {
                    tracing::warn!(target: "tree_logger", error = %err, "failed to write log line, dropping it");
                }
            }
        };

        let printer = AsyncPrinter {
            formatter: Arc::new(formatter),
            tx,
            depth: 0,
        };

        (printer, handle)
    }

    fn send<L>(&self, line: &Line<'_, L>)
    where
        L: Severity,
        F: Formatter<L>,
    {
        if let Some(string) = render(&*self.formatter, line) {
            if self.tx.send(string).is_err() {
                tracing::warn!(target: "tree_logger", "writer task has shut down, dropping log line");
            }
        }
    }
}

impl<F> Clone for AsyncPrinter<F> {
    fn clone(&self) -> Self {
        AsyncPrinter {
            formatter: Arc::clone(&self.formatter),
            tx: self.tx.clone(),
            depth: self.depth,
        }
    }
}

impl<F> fmt::Debug for AsyncPrinter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncPrinter")
            .field("depth", &self.depth)
            .field("closed", &self.tx.is_closed())
            .finish_non_exhaustive()
    }
}

impl<L, F> Sink<L> for AsyncPrinter<F>
where
    L: Severity,
    F: 'static + Formatter<L> + Send + Sync,
{
    fn branch(&self) -> Box<dyn Sink<L>> {
        Box::new(AsyncPrinter {
            formatter: Arc::clone(&self.formatter),
            tx: self.tx.clone(),
            depth: self.depth + 1,
        })
    }

    fn commit_branch(&self, index: usize, record: &Record<L>) {
        self.send(&Line {
            kind: LineKind::Branch,
            depth: self.depth.saturating_sub(1),
            index,
            record,
        });
    }

    fn log_entry(&self, index: usize, record: &Record<L>) {
        self.send(&Line {
            kind: LineKind::Entry,
            depth: self.depth,
            index,
            record,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::tests::SharedBuf;
    use crate::{Level, LogNode};

    fn message(line: &Line<'_, Level>) -> Result<String, fmt::Error> {
        Ok(format!("{} {}\n", line.depth(), line.record().message()))
    }

    #[tokio::test]
    async fn writes_after_tree_is_dropped() {
        let buf = SharedBuf::default();
        let (printer, fut) = AsyncPrinter::spawn(message, buf.clone());
        let handle = tokio::spawn(fut);

        let root: LogNode = LogNode::root(printer);
        let child = root.branch(Level::INFO, Some("outer"), None);
        child.log(Level::INFO, Some("inner"), None);

        drop(child);
        drop(root);
        handle.await.unwrap();

        assert_eq!(buf.contents(), "0 outer\n1 inner\n");
    }
}
