//! Severity chains used to decide what a node renders.
//!
//! A severity doesn't need a numeric rank. It only needs to know its
//! _parent_: the next less detailed severity in the chain. A node configured
//! with some maximum detail renders a severity iff that severity can be
//! reached by walking parents from the maximum, inclusive.
//!
//! The built-in chain is [`Level`]:
//! ```txt
//! ERROR <- WARN <- INFO <- TRACE <- DEBUG <- SPAM <- ALL
//! ```
//! where each arrow points at the parent.
//!
//! # Examples
//!
//! ```
//! use tree_logger::{Level, Severity};
//!
//! assert_eq!(Level::INFO.parent(), Some(Level::WARN));
//! assert_eq!(Level::ERROR.parent(), None);
//! assert!(Level::DEBUG.is_lower_priority_to(Level::INFO));
//! ```
use crate::cfg_serde;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// An ordered diagnostic importance with a declared parent.
///
/// Implementors form a finite chain: following [`parent`] from any value
/// must reach `None` after finitely many steps. [`ALL`] is the most detailed
/// value, and every other value must be reachable from it.
///
/// With the `derive` feature, this trait can be derived for fieldless enums
/// with `#[derive(Severity)]`.
///
/// [`parent`]: Severity::parent
/// [`ALL`]: Severity::ALL
pub trait Severity: 'static + Copy + Eq + fmt::Debug + Send + Sync {
    /// The least restrictive severity. Roots render everything down to it.
    const ALL: Self;

    /// The severity used when a node's max detail is reset with `None`.
    const DEFAULT: Self;

    /// Returns the next less detailed severity, or `None` at the top of the
    /// chain.
    fn parent(self) -> Option<Self>;

    /// A short, human readable name.
    fn label(self) -> &'static str;

    /// Whether sinks should make entries at this severity stand out.
    fn needs_attention(self) -> bool {
        false
    }

    /// Returns an iterator starting at `self` and walking the parent chain.
    fn chain(self) -> Chain<Self> {
        Chain { next: Some(self) }
    }

    /// Returns `true` if `self` is strictly more detailed than `other`.
    fn is_lower_priority_to(self, other: Self) -> bool {
        self.chain().skip(1).any(|ancestor| ancestor == other)
    }
}

/// Iterator over a severity and its ancestors.
///
/// This type is returned by [`Severity::chain`].
#[derive(Clone, Debug)]
pub struct Chain<L> {
    next: Option<L>,
}

impl<L: Severity> Iterator for Chain<L> {
    type Item = L;

    fn next(&mut self) -> Option<L> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Returns `true` if `level` is rendered under `max_detail`.
pub(crate) fn permits<L: Severity>(max_detail: L, level: L) -> bool {
    max_detail.chain().any(|allowed| allowed == level)
}

/// The built-in severity chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Level(LevelInner);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum LevelInner {
    Error,
    Warn,
    Info,
    Trace,
    Debug,
    Spam,
    All,
}

impl Level {
    /// Something went wrong and the operation likely can't complete.
    pub const ERROR: Level = Level(LevelInner::Error);
    /// Something looks wrong, but work continues.
    pub const WARN: Level = Level(LevelInner::Warn);
    /// Progress worth showing by default.
    pub const INFO: Level = Level(LevelInner::Info);
    /// Detail about what the program is doing.
    pub const TRACE: Level = Level(LevelInner::Trace);
    /// Detail for the people debugging the program.
    pub const DEBUG: Level = Level(LevelInner::Debug);
    /// Everything, including very high volume output.
    pub const SPAM: Level = Level(LevelInner::Spam);
    /// Renders every level.
    pub const ALL: Level = Level(LevelInner::All);

    /// Returns the level's label, e.g. `"WARN"`.
    pub const fn as_str(&self) -> &'static str {
        match self.0 {
            LevelInner::Error => "ERROR",
            LevelInner::Warn => "WARN",
            LevelInner::Info => "INFO",
            LevelInner::Trace => "TRACE",
            LevelInner::Debug => "DEBUG",
            LevelInner::Spam => "SPAM",
            LevelInner::All => "ALL",
        }
    }
}

impl Severity for Level {
    const ALL: Self = Level::ALL;
    const DEFAULT: Self = Level::INFO;

    fn parent(self) -> Option<Self> {
        match self.0 {
            LevelInner::Error => None,
            LevelInner::Warn => Some(Level::ERROR),
            LevelInner::Info => Some(Level::WARN),
            LevelInner::Trace => Some(Level::INFO),
            LevelInner::Debug => Some(Level::TRACE),
            LevelInner::Spam => Some(Level::DEBUG),
            LevelInner::All => Some(Level::SPAM),
        }
    }

    fn label(self) -> &'static str {
        self.as_str()
    }

    fn needs_attention(self) -> bool {
        matches!(self.0, LevelInner::Error | LevelInner::Warn)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, ParseLevelError> {
        const LEVELS: [Level; 7] = [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::TRACE,
            Level::DEBUG,
            Level::SPAM,
            Level::ALL,
        ];

        let s = s.trim();
        LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or(ParseLevelError(()))
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level.0 {
            LevelInner::Error => tracing::Level::ERROR,
            LevelInner::Warn => tracing::Level::WARN,
            LevelInner::Info => tracing::Level::INFO,
            LevelInner::Trace | LevelInner::Debug => tracing::Level::DEBUG,
            LevelInner::Spam | LevelInner::All => tracing::Level::TRACE,
        }
    }
}

cfg_serde! {
    use serde::{Serialize, Serializer};

    impl Serialize for Level {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }
}

/// Error returned when parsing a [`Level`] from a string fails.
#[derive(Debug)]
pub struct ParseLevelError(());

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad("Expected one of `error`, `warn`, `info`, `trace`, `debug`, `spam`, or `all`")
    }
}

impl Error for ParseLevelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_walks_toward_error() {
        let chain: Vec<Level> = Level::TRACE.chain().collect();
        assert_eq!(chain, [Level::TRACE, Level::INFO, Level::WARN, Level::ERROR]);
    }

    #[test]
    fn all_reaches_every_level() {
        assert_eq!(Level::ALL.chain().count(), 7);
        assert_eq!(Level::ALL.chain().last(), Some(Level::ERROR));
    }

    #[test]
    fn permits_is_inclusive() {
        assert!(permits(Level::INFO, Level::INFO));
        assert!(permits(Level::INFO, Level::ERROR));
        assert!(!permits(Level::INFO, Level::TRACE));
        assert!(!permits(Level::ERROR, Level::WARN));
    }

    #[test]
    fn lower_priority_is_strict() {
        assert!(Level::SPAM.is_lower_priority_to(Level::DEBUG));
        assert!(!Level::DEBUG.is_lower_priority_to(Level::DEBUG));
        assert!(!Level::ERROR.is_lower_priority_to(Level::WARN));
    }

    #[test]
    fn only_error_and_warn_need_attention() {
        let flagged: Vec<Level> = Level::ALL
            .chain()
            .filter(|level| level.needs_attention())
            .collect();
        assert_eq!(flagged, [Level::WARN, Level::ERROR]);
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!("debug".parse::<Level>().ok(), Some(Level::DEBUG));
        assert_eq!(" Spam ".parse::<Level>().ok(), Some(Level::SPAM));
        assert_eq!("ALL".parse::<Level>().ok(), Some(Level::ALL));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn maps_onto_tracing_levels() {
        assert_eq!(tracing::Level::from(Level::ERROR), tracing::Level::ERROR);
        assert_eq!(tracing::Level::from(Level::TRACE), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(Level::ALL), tracing::Level::TRACE);
    }
}
