//! The data handed to sinks when something is committed.
use crate::level::{Level, Severity};
use crate::{cfg_chrono, cfg_uuid};
#[cfg(feature = "chrono")]
use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
#[cfg(feature = "uuid")]
use uuid::Uuid;

/// An error attached to a branch or entry.
///
/// Causes are opaque to the tree; they're handed to sinks as-is.
pub type Cause = Arc<dyn Error + Send + Sync>;

/// Replaces the message of a branch created without one.
pub const NULL_BRANCH_MESSAGE: &str = "(Null branch message)";

/// Replaces the message of an entry logged without one.
pub const NULL_LOG_MESSAGE: &str = "(Null log message)";

/// Points readers at further documentation about a branch or entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HelpInfo {
    url: Option<String>,
    anchor_text: Option<String>,
}

impl HelpInfo {
    /// Returns a `HelpInfo` pointing at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        HelpInfo {
            url: Some(url.into()),
            anchor_text: None,
        }
    }

    /// Sets the text to display in place of the raw URL.
    pub fn with_anchor_text(mut self, anchor_text: impl Into<String>) -> Self {
        self.anchor_text = Some(anchor_text.into());
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn anchor_text(&self) -> Option<&str> {
        self.anchor_text.as_deref()
    }
}

/// A branch header or log entry, as seen by a [`Sink`].
///
/// For branches, the record is built when the branch is created and held
/// until the branch is committed.
///
/// [`Sink`]: crate::sink::Sink
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(bound(serialize = "L: Severity")))]
pub struct Record<L = Level> {
    /// The ID of the tree the record belongs to.
    #[cfg(feature = "uuid")]
    pub(crate) uuid: Uuid,

    /// When the branch was created or the entry was logged.
    #[cfg(feature = "chrono")]
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::ser::timestamp"))]
    pub(crate) timestamp: DateTime<Utc>,

    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::ser::level"))]
    pub(crate) level: L,

    pub(crate) message: String,

    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::ser::cause"))]
    pub(crate) cause: Option<Cause>,

    pub(crate) help: Option<HelpInfo>,
}

impl<L: Severity> Record<L> {
    pub(crate) fn new(level: L, message: &str, cause: Option<Cause>, help: Option<HelpInfo>) -> Self {
        Record {
            #[cfg(feature = "uuid")]
            uuid: Uuid::nil(),
            #[cfg(feature = "chrono")]
            timestamp: Utc::now(),
            level,
            message: message.to_owned(),
            cause,
            help,
        }
    }

    cfg_uuid! {
        pub(crate) fn with_uuid(mut self, uuid: Uuid) -> Self {
            self.uuid = uuid;
            self
        }

        /// Returns the [`Uuid`] of the tree this record was logged in.
        pub fn uuid(&self) -> Uuid {
            self.uuid
        }
    }

    cfg_chrono! {
        /// Returns when the branch was created or the entry was logged.
        pub fn timestamp(&self) -> DateTime<Utc> {
            self.timestamp
        }
    }

    pub fn level(&self) -> L {
        self.level
    }

    /// Returns the message. Missing messages have already been replaced by
    /// [`NULL_BRANCH_MESSAGE`] or [`NULL_LOG_MESSAGE`].
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Returns the cause followed by each of its [`source`]s.
    ///
    /// [`source`]: std::error::Error::source
    pub fn causes(&self) -> Causes<'_> {
        Causes {
            next: self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static)),
        }
    }

    pub fn help(&self) -> Option<&HelpInfo> {
        self.help.as_ref()
    }
}

/// Iterator over a record's cause chain.
///
/// This type is returned by [`Record::causes`].
pub struct Causes<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl fmt::Debug for Causes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Causes").finish_non_exhaustive()
    }
}

/// Displays a cause chain on one line, joined by `": "`.
pub(crate) struct DisplayCauses<'a, L>(pub(crate) &'a Record<L>);

impl<L: Severity> fmt::Display for DisplayCauses<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cause) in self.0.causes().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            write!(f, "{}", cause)?;
        }
        Ok(())
    }
}
