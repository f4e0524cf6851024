use crate::level::{Level, Severity};
use crate::record::{DisplayCauses, Record};
use crate::sink::Sink;
use std::fmt;
use std::marker::PhantomData;

/// A [`Sink`] that forwards to the [`tracing`] subscriber of the calling
/// thread.
///
/// Branch headers and entries become events with target `tree_logger`.
/// Each event carries the record's `depth` and `index`, whether it's a
/// `branch` header, and its cause chain if it has one.
///
/// Severities are mapped through `Into<tracing::Level>`; see the
/// [`From<Level>`] implementation for how the built-in levels line up.
///
/// [`From<Level>`]: crate::Level
pub struct TracingSink<L = Level> {
    depth: usize,
    _level: PhantomData<fn(L)>,
}

impl<L> TracingSink<L>
where
    L: Severity + Into<tracing::Level>,
{
    pub fn new() -> Self {
        TracingSink {
            depth: 0,
            _level: PhantomData,
        }
    }

    fn emit(&self, branch: bool, depth: usize, index: usize, record: &Record<L>) {
        macro_rules! emit {
            ($lvl:expr) => {
                match record.cause() {
                    Some(_) => tracing::event!(
                        target: "tree_logger",
                        $lvl,
                        depth,
                        index,
                        branch,
                        cause = %DisplayCauses(record),
                        "{}",
                        record.message()
                    ),
                    None => tracing::event!(
                        target: "tree_logger",
                        $lvl,
                        depth,
                        index,
                        branch,
                        "{}",
                        record.message()
                    ),
                }
            };
        }

        let level: tracing::Level = record.level().into();
        match level {
            tracing::Level::ERROR => emit!(tracing::Level::ERROR),
            tracing::Level::WARN => emit!(tracing::Level::WARN),
            tracing::Level::INFO => emit!(tracing::Level::INFO),
            tracing::Level::DEBUG => emit!(tracing::Level::DEBUG),
            _ => emit!(tracing::Level::TRACE),
        }
    }
}

impl<L> Default for TracingSink<L>
where
    L: Severity + Into<tracing::Level>,
{
    fn default() -> Self {
        TracingSink::new()
    }
}

impl<L> Clone for TracingSink<L> {
    fn clone(&self) -> Self {
        TracingSink {
            depth: self.depth,
            _level: PhantomData,
        }
    }
}

impl<L> fmt::Debug for TracingSink<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingSink")
            .field("depth", &self.depth)
            .finish()
    }
}

impl<L> Sink<L> for TracingSink<L>
where
    L: Severity + Into<tracing::Level>,
{
    fn branch(&self) -> Box<dyn Sink<L>> {
        Box::new(TracingSink::<L> {
            depth: self.depth + 1,
            _level: PhantomData,
        })
    }

    fn commit_branch(&self, index: usize, record: &Record<L>) {
        self.emit(true, self.depth.saturating_sub(1), index, record);
    }

    fn log_entry(&self, index: usize, record: &Record<L>) {
        self.emit(false, self.depth, index, record);
    }
}
