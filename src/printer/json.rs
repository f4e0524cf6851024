//! A [`Formatter`] that formats lines as JSON objects.
//!
//! See [`Json`] for more details.
use crate::level::Severity;
use crate::printer::{Formatter, Line};

/// Format lines as JSON objects.
///
/// The fields of the record are flattened into the line, next to its kind,
/// depth, and index. Causes are listed outermost first.
///
/// # Examples
///
/// ```json
/// {
///   "kind": "Entry",
///   "depth": 1,
///   "index": 0,
///   "level": "ERROR",
///   "message": "Unresolved symbol `frobnicate`",
///   "cause": [
///     "no such method"
///   ],
///   "help": null
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Json {
    /// Whether or not the lines should have compact formatting.
    compact: bool,
    #[doc(hidden)]
    _priv: (),
}

impl Json {
    /// Construct a new [`Json`] formatter.
    pub const fn new(compact: bool) -> Self {
        Json { compact, _priv: () }
    }
}

impl<L: Severity> Formatter<L> for Json {
    type Error = serde_json::Error;

    fn fmt(&self, line: &Line<'_, L>) -> Result<String, serde_json::Error> {
        let mut string = if self.compact {
            serde_json::to_string(line)?
        } else {
            serde_json::to_string_pretty(line)?
        };
        string.push('\n');
        Ok(string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::tests::SharedBuf;
    use crate::printer::Printer;
    use crate::{Level, LogNode};
    use serde_json::{json, Value};
    use std::io;
    use std::sync::Arc;

    #[test]
    fn one_object_per_line() {
        let buf = SharedBuf::default();
        let root = LogNode::root(Printer::new().formatter(Json::new(true)).writer(buf.clone()));
        let child = root.branch(Level::INFO, Some("loading"), None);
        child.log(
            Level::ERROR,
            Some("failed"),
            Some(Arc::new(io::Error::new(io::ErrorKind::NotFound, "missing config"))),
        );

        let contents = buf.contents();
        let lines: Vec<Value> = contents
            .lines()
            .map(|line| {
                let mut value: Value = serde_json::from_str(line).unwrap();
                if let Some(object) = value.as_object_mut() {
                    object.remove("uuid");
                    object.remove("timestamp");
                }
                value
            })
            .collect();

        assert_eq!(
            lines,
            [
                json!({
                    "kind": "Branch",
                    "depth": 0,
                    "index": 0,
                    "level": "INFO",
                    "message": "loading",
                    "cause": [],
                    "help": null,
                }),
                json!({
                    "kind": "Entry",
                    "depth": 1,
                    "index": 0,
                    "level": "ERROR",
                    "message": "failed",
                    "cause": ["missing config"],
                    "help": null,
                }),
            ]
        );
    }
}
