//! Build a root [`LogNode`] with custom configuration values.
//!
//! To start, call [`builder`] to create a [`Builder`], which configures the
//! printer and detail level of the root by chaining methods.
//!
//! Finally, either call [`build`] to get the root, or run code with the
//! root as the thread's [current node] by calling [`in_scope`], or
//! [`in_future`] with the `sync` feature.
//!
//! # Note
//!
//! If you don't need advanced configuration options, see
//! `#[tree_logger::test]` and `#[tree_logger::main]`.
//!
//! # Examples
//!
//! Writing to stderr, rendering warnings and errors only:
//! ```
//! use tree_logger::Level;
//!
//! tree_logger::builder()
//!     .pretty()
//!     .with_writer(std::io::stderr)
//!     .max_detail(Level::WARN)
//!     .in_scope(|| {
//!         let unit = tree_logger::branch!(Level::INFO, "compiling `{}`", "main");
//!         unit.log(Level::DEBUG, Some("not rendered"), None);
//!         unit.log(Level::ERROR, Some("unresolved symbol"), None);
//!     })
//! ```
//! ```log
//! INFO     compiling `main`
//! ERROR       [ERROR] unresolved symbol
//! ```
//!
//! [`build`]: Builder::build
//! [`in_scope`]: Builder::in_scope
//! [`in_future`]: Builder::in_future
//! [current node]: crate::local
use crate::level::{Level, Severity};
use crate::node::LogNode;
use crate::printer::{Formatter, MakeStdout, Pretty, Printer};
use crate::{cfg_json, cfg_sync, local};
cfg_json! {
    use crate::printer::Json;
}
cfg_sync! {
    use crate::printer::AsyncPrinter;
    use std::future::Future;
}
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::fmt::{MakeWriter, TestWriter};

/// Environment variable read by [`Builder::max_detail_from_env`].
pub const ENV_VAR: &str = "TREE_LOG";

/// Creates a new [`Builder`] to configure a root [`LogNode`].
///
/// See the [module level documentation] for details on using [`builder`].
///
/// [module level documentation]: self
pub fn builder() -> Builder<Pretty, MakeStdout, Level> {
    Builder {
        formatter: Pretty::new(),
        make_writer: MakeStdout,
        max_detail: None,
    }
}

/// A type for configuring root [`LogNode`]s.
///
/// See the [module level documentation] for details on using [`Builder`].
///
/// [module level documentation]: self
pub struct Builder<F, W, L> {
    formatter: F,
    make_writer: W,
    max_detail: Option<L>,
}

impl<F, W, L> Builder<F, W, L>
where
    L: Severity,
{
    /// Sets the most detailed severity the root renders.
    ///
    /// Without this, the root renders everything.
    pub fn max_detail(self, level: L) -> Self {
        Builder {
            max_detail: Some(level),
            ..self
        }
    }

    /// Sets the most detailed severity the root renders from the `TREE_LOG`
    /// environment variable, if it's set.
    ///
    /// A value that can't be parsed is reported and otherwise ignored.
    ///
    /// # Examples
    /// ```
    /// std::env::set_var("TREE_LOG", "warn");
    ///
    /// let root = tree_logger::builder().max_detail_from_env().build();
    /// assert_eq!(root.max_detail(), tree_logger::Level::WARN);
    /// ```
    pub fn max_detail_from_env(self) -> Self
    where
        L: FromStr,
        L::Err: fmt::Display,
    {
        let value = match env::var(ENV_VAR) {
            Ok(value) => value,
            Err(_) => return self,
        };

        match value.parse::<L>() {
            Ok(level) => self.max_detail(level),
            Err(err) => {
                tracing::warn!(
                    target: "tree_logger",
                    value = %value,
                    error = %err,
                    "ignoring invalid {}",
                    ENV_VAR
                );
                self
            }
        }
    }

    /// Applies a writer that is suitable for test environments.
    ///
    /// Configuration methods can be chained on the return value.
    ///
    /// # Examples
    /// ```
    /// tree_logger::builder()
    ///     .with_test_writer()
    ///     .in_scope(|| {
    ///         tree_logger::info!("Hello, world!");
    ///     })
    /// ```
    pub fn with_test_writer(self) -> Builder<F, TestWriter, L> {
        self.with_writer(TestWriter::new())
    }

    /// Applies the specified [`MakeWriter`].
    ///
    /// Configuration methods can be chained on the return value.
    ///
    /// # Examples
    /// ```
    /// tree_logger::builder()
    ///     .with_writer(std::io::stderr)
    ///     .in_scope(|| {
    ///         tree_logger::info!("Hello, world!");
    ///     })
    /// ```
    pub fn with_writer<W2>(self, make_writer: W2) -> Builder<F, W2, L>
    where
        W2: for<'a> MakeWriter<'a>,
    {
        Builder {
            formatter: self.formatter,
            make_writer,
            max_detail: self.max_detail,
        }
    }

    cfg_json! {
        /// Applies compact JSON formatting.
        ///
        /// Configuration methods can be chained on the return value.
        ///
        /// # Examples
        /// ```
        /// tree_logger::builder()
        ///     .json()
        ///     .in_scope(|| {
        ///         tree_logger::info!("Hello, world!");
        ///     })
        /// ```
        /// ```log
        /// {"kind":"Entry","depth":0,"index":0,"level":"INFO","message":"Hello, world!","cause":[],"help":null}
        /// ```
        pub fn json(self) -> Builder<Json, W, L> {
            self.with_formatter(Json::new(true))
        }

        /// Applies pretty JSON formatting.
        ///
        /// Configuration methods can be chained on the return value.
        pub fn json_pretty(self) -> Builder<Json, W, L> {
            self.with_formatter(Json::new(false))
        }
    }

    /// Applies pretty formatting.
    ///
    /// Configuration methods can be chained on the return value.
    ///
    /// # Examples
    /// ```
    /// tree_logger::builder()
    ///     .pretty()
    ///     .in_scope(|| {
    ///         tree_logger::info!("Hello, world!");
    ///     })
    /// ```
    /// ```log
    /// INFO     Hello, world!
    /// ```
    pub fn pretty(self) -> Builder<Pretty, W, L> {
        self.with_formatter(Pretty::new())
    }

    /// Applies a custom [`Formatter`].
    ///
    /// Configuration methods can be chained on the return value.
    ///
    /// # Examples
    /// ```
    /// use std::fmt;
    /// use tree_logger::printer::Line;
    ///
    /// fn useless(_line: &Line<'_>) -> Result<String, fmt::Error> {
    ///     Ok("I am useless\n".to_owned())
    /// }
    ///
    /// tree_logger::builder()
    ///     .with_formatter(useless)
    ///     .in_scope(|| {
    ///         tree_logger::info!("Hello, world!");
    ///     })
    /// ```
    /// ```log
    /// I am useless
    /// ```
    pub fn with_formatter<F2>(self, formatter: F2) -> Builder<F2, W, L> {
        Builder {
            formatter,
            make_writer: self.make_writer,
            max_detail: self.max_detail,
        }
    }

    /// Switches to a custom [`Severity`].
    ///
    /// Any max detail set so far is discarded.
    pub fn with_severity<L2>(self) -> Builder<F, W, L2>
    where
        L2: Severity,
    {
        Builder {
            formatter: self.formatter,
            make_writer: self.make_writer,
            max_detail: None,
        }
    }

    /// Finalizes the configuration, returning a root that writes each line
    /// on the thread that commits it.
    ///
    /// # Examples
    /// ```
    /// use tree_logger::Level;
    ///
    /// let root = tree_logger::builder().max_detail(Level::INFO).build();
    /// root.log(Level::INFO, Some("Hello from the current thread"), None);
    /// ```
    pub fn build(self) -> LogNode<L>
    where
        F: 'static + Formatter<L> + Send + Sync,
        W: 'static + for<'a> MakeWriter<'a> + Send + Sync,
    {
        let printer = Printer::new()
            .formatter(self.formatter)
            .writer(self.make_writer);

        configure(LogNode::root(printer), self.max_detail)
    }

    /// Finalizes the configuration, returning a root that sends lines to a
    /// [`tokio`] task for writing, along with the future to run as that task.
    ///
    /// The future completes once the root and every node branched from it
    /// have been dropped.
    ///
    /// # Examples
    /// ```
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use tree_logger::Level;
    ///
    /// let (root, writer) = tree_logger::builder().build_async();
    /// let handle = tokio::spawn(writer);
    ///
    /// root.log(Level::INFO, Some("Hello from Tokio"), None);
    ///
    /// drop(root);
    /// handle.await.unwrap();
    /// # }
    /// ```
    #[cfg(feature = "sync")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
    pub fn build_async(self) -> (LogNode<L>, impl Future<Output = ()>)
    where
        F: 'static + Formatter<L> + Send + Sync,
        W: 'static + for<'a> MakeWriter<'a> + Send,
    {
        let (printer, handle) = AsyncPrinter::spawn(self.formatter, self.make_writer);
        let root = configure(LogNode::root(printer), self.max_detail);

        (root, handle)
    }
}

impl<F, W> Builder<F, W, Level>
where
    F: 'static + Formatter<Level> + Send + Sync,
    W: 'static + for<'a> MakeWriter<'a> + Send + Sync,
{
    /// Builds the root and runs `f` with it as the current node of this
    /// thread.
    ///
    /// # Examples
    /// ```
    /// tree_logger::builder().in_scope(|| {
    ///     tree_logger::info!("Hello from the current thread");
    /// })
    /// ```
    pub fn in_scope<R>(self, f: impl FnOnce() -> R) -> R {
        local::in_scope(self.build(), f)
    }

    /// Builds the root and awaits `future` with it as the current node
    /// whenever `future` is polled, then waits for every line to be written.
    ///
    /// Tasks spawned by `future` don't see the node. Nodes that outlive `future` keep the writer task alive, and
    /// this won't complete until they're dropped.
    ///
    /// # Examples
    /// ```
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// tree_logger::builder()
    ///     .in_future(async {
    ///         tree_logger::info!("Hello from Tokio");
    ///     })
    ///     .await
    /// # }
    /// ```
    #[cfg(feature = "sync")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
    pub async fn in_future<Fut>(self, future: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        let (root, writer) = self.build_async();
        let handle = tokio::spawn(writer);

        let output = local::with_current(root, future).await;

        if let Err(err) = handle.await {
            tracing::warn!(target: "tree_logger", error = %err, "writer task failed");
        }

        output
    }
}

fn configure<L: Severity>(root: LogNode<L>, max_detail: Option<L>) -> LogNode<L> {
    if let Some(level) = max_detail {
        root.set_max_detail(level);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::tests::SharedBuf;

    #[test]
    fn root_renders_everything_by_default() {
        let root = builder().with_writer(SharedBuf::default()).build();
        assert_eq!(root.max_detail(), Level::ALL);
    }

    #[test]
    fn max_detail_is_applied() {
        let buf = SharedBuf::default();
        let root = builder()
            .with_writer(buf.clone())
            .max_detail(Level::WARN)
            .build();

        root.log(Level::INFO, Some("hidden"), None);
        root.log(Level::WARN, Some("shown"), None);

        let contents = buf.contents();
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("shown"));
    }

    #[test]
    fn in_scope_installs_root() {
        let buf = SharedBuf::default();
        let id = builder()
            .with_writer(buf.clone())
            .in_scope(|| local::current().map(|node| node.id()));

        assert_eq!(id.as_deref(), Some("#"));
        assert!(local::current().is_none());
    }

    /// Coarse stages of a build, least to most detailed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Stage {
        Failure,
        Outline,
        Step,
    }

    impl Severity for Stage {
        const ALL: Self = Stage::Step;
        const DEFAULT: Self = Stage::Outline;

        fn parent(self) -> Option<Self> {
            match self {
                Stage::Failure => None,
                Stage::Outline => Some(Stage::Failure),
                Stage::Step => Some(Stage::Outline),
            }
        }

        fn label(self) -> &'static str {
            match self {
                Stage::Failure => "FAILURE",
                Stage::Outline => "OUTLINE",
                Stage::Step => "STEP",
            }
        }

        fn needs_attention(self) -> bool {
            self == Stage::Failure
        }
    }

    #[test]
    fn custom_severity_drives_the_root() {
        let buf = SharedBuf::default();
        let root = builder()
            .max_detail(Level::ERROR)
            .with_writer(buf.clone())
            .with_severity::<Stage>()
            .max_detail(Stage::Outline)
            .build();

        assert_eq!(root.max_detail(), Stage::Outline);

        let link = root.branch(Stage::Step, Some("linking"), None);
        link.log(Stage::Step, Some("hidden step"), None);
        link.log(Stage::Failure, Some("missing symbol"), None);

        let contents = buf.contents();
        assert!(!contents.contains("hidden step"));
        assert!(contents.contains("linking"));
        assert!(contents.contains("[FAILURE] missing symbol"));
    }

    #[test]
    fn with_severity_discards_max_detail() {
        let root = builder()
            .max_detail(Level::WARN)
            .with_writer(SharedBuf::default())
            .with_severity::<Stage>()
            .build();

        assert_eq!(root.max_detail(), Stage::ALL);
    }

    #[test]
    fn invalid_env_value_is_ignored() {
        env::set_var(ENV_VAR, "verbose");
        let root = builder()
            .with_writer(SharedBuf::default())
            .max_detail_from_env()
            .build();
        env::remove_var(ENV_VAR);

        assert_eq!(root.max_detail(), Level::ALL);
    }

    #[cfg(feature = "sync")]
    #[tokio::test]
    async fn in_future_flushes_before_returning() {
        let buf = SharedBuf::default();
        let answer = builder()
            .with_writer(buf.clone())
            .in_future(async {
                crate::info!("from the future");
                42
            })
            .await;

        assert_eq!(answer, 42);
        assert!(buf.contents().contains("from the future"));
    }

    #[cfg(feature = "sync")]
    #[tokio::test(flavor = "current_thread")]
    async fn joined_in_futures_write_to_their_own_roots() {
        let first = SharedBuf::default();
        let second = SharedBuf::default();

        let task = |name: &'static str| async move {
            for _ in 0..3 {
                crate::info!("{}", name);
                tokio::task::yield_now().await;
            }
        };

        tokio::join!(
            builder().with_writer(first.clone()).in_future(task("first")),
            builder().with_writer(second.clone()).in_future(task("second")),
        );

        let first = first.contents();
        let second = second.contents();
        assert_eq!(first.matches("first").count(), 3);
        assert!(!first.contains("second"));
        assert_eq!(second.matches("second").count(), 3);
        assert!(!second.contains("first"));
    }
}
