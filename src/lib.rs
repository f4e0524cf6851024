//! Hierarchical logging that only renders the branches that matter.
//!
//! # Overview
//!
//! Compilers, build tools, and other programs doing deeply nested work want
//! to show _where_ something happened, but printing a header for every unit
//! of work buries the few lines anyone cares about. This crate provides
//! [`LogNode`], a node in a logging tree whose branches are held back until
//! something logged beneath them turns out to be worth rendering. At that
//! point every held back ancestor is rendered first, from the top down, so
//! a message never shows up without the context that explains it.
//!
//! Nodes are cheap to create and can be shared across threads. Rendering is
//! delegated to a [`Sink`], such as the [`Printer`] returned by
//! [`builder`], or [`TracingSink`] to forward into an existing [`tracing`]
//! subscriber.
//!
//! [`Printer`]: crate::printer::Printer
//! [`TracingSink`]: crate::sink::TracingSink
//!
//! # Getting started
//!
//! The easiest way to get started is to enable all features. Do this by
//! adding the following to your `Cargo.toml` file:
//! ```toml
//! tree-logger = { version = "0.1", features = ["full"] }
//! ```
//! Then, build a root and start branching:
//! ```
//! use tree_logger::Level;
//!
//! let root = tree_logger::builder().max_detail(Level::INFO).build();
//!
//! for unit in ["lexer", "parser", "codegen"] {
//!     let branch = root.branch(Level::TRACE, Some(&format!("compiling `{}`", unit)), None);
//!     if unit == "parser" {
//!         branch.log(Level::WARN, Some("unused import `std::mem`"), None);
//!     }
//! }
//! ```
//! Only the branch with something to say is rendered:
//! ```log
//! TRACE    compiling `parser`
//! WARN        [WARN] unused import `std::mem`
//! ```
//!
//! # Detail levels
//!
//! Each node has a maximum detail. Entries and branches at that severity, or
//! any less detailed one, are loggable. Branches start with their parent's
//! maximum detail, and changing it later only affects branches created
//! afterwards. See the [`level` module documentation][crate::level] for how
//! severities are ordered, and how to define your own.
//!
//! # Logging without passing nodes around
//!
//! The [`local`] module keeps a current node per thread, which the [`log!`],
//! [`error!`], [`warn!`], [`info!`], [`trace!`], [`debug!`], [`spam!`] and
//! [`branch!`] macros write to.
//! ```
//! tree_logger::builder().in_scope(|| {
//!     tree_logger::info!("Hello, {}!", "world");
//! })
//! ```
//!
//! # Feature flags
//!
//! `tree-logger` uses feature flags to reduce dependencies in your code.
//!
//! * `full`: Enables all features listed below.
//! * `uuid`: Enables trees to carry an ID, shared by every record.
//! * `chrono`: Enables timestamps on records.
//! * `smallvec`: Enables some performance optimizations.
//! * `sync`: Enables the [`AsyncPrinter`] type.
//! * `json`: Enables JSON formatting for lines.
//! * `derive`: Enables `#[derive(Severity)]` for making custom severities.
//! * `attributes`: Enables the `#[tree_logger::test]` and
//! `#[tree_logger::main]` attributes.
//!
//! [`AsyncPrinter`]: crate::printer::AsyncPrinter
pub mod builder;
pub mod level;
pub mod local;
pub mod node;
pub mod printer;
pub mod record;
pub mod sink;
#[doc(hidden)]
#[macro_use]
mod cfg;
#[cfg(feature = "serde")]
mod ser;
#[macro_use]
mod macros;

// Items that are required for macros but not intended for public API
#[doc(hidden)]
pub mod private {
    use crate::record::Cause;
    use std::error::Error;
    use std::sync::Arc;

    pub fn into_cause<E>(cause: E) -> Cause
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Arc::from(cause.into())
    }
}

pub use crate::builder::builder;
pub use crate::level::{Level, ParseLevelError, Severity};
pub use crate::node::LogNode;
pub use crate::record::{Cause, HelpInfo, Record};
pub use crate::sink::Sink;

#[cfg(feature = "derive")]
#[cfg_attr(docsrs, doc(cfg(feature = "derive")))]
pub use tree_logger_macros::Severity;

#[cfg(feature = "attributes")]
#[cfg_attr(docsrs, doc(cfg(feature = "attributes")))]
pub use tree_logger_macros::{main, test};

/// The most commonly used items, for glob importing.
pub mod prelude {
    pub use crate::level::{Level, Severity};
    pub use crate::local;
    pub use crate::node::LogNode;
    pub use crate::record::{Cause, HelpInfo};
    pub use crate::sink::Sink;
    pub use crate::{branch, debug, error, info, log, spam, trace, warn};
}
