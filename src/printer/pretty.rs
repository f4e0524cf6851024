//! A [`Formatter`] that formats lines for pretty printing.
//!
//! See [`Pretty`] for more details.
use crate::level::Severity;
use crate::printer::{Formatter, Line};
use crate::record::Record;
use std::fmt::{self, Write};

const INDENT: &str = "   ";

/// Format lines for pretty printing.
///
/// Every line starts with the severity, followed by three spaces per level
/// of depth. Severities that [need attention] are repeated in brackets
/// before the message. Each cause and the help link, if any, get their own
/// line beneath.
///
/// # Examples
///
/// ```log
/// INFO     Compiling module `app`
/// TRACE       Compiling unit `main`
/// ERROR          [ERROR] Unresolved symbol `frobnicate`
/// ERROR             Caused by: no such method
/// ERROR             For additional info see: https://example.com/E0425
/// INFO        Done
/// ```
///
/// With the `uuid` and `chrono` features, each line is prefixed by the tree's
/// ID and the time the line was logged.
///
/// [need attention]: Severity::needs_attention
#[derive(Clone, Copy, Debug, Default)]
pub struct Pretty {
    #[doc(hidden)]
    _priv: (),
}

impl Pretty {
    /// Constructs a new [`Pretty`] formatter.
    pub const fn new() -> Self {
        Pretty { _priv: () }
    }
}

impl<L: Severity> Formatter<L> for Pretty {
    type Error = fmt::Error;

    fn fmt(&self, line: &Line<'_, L>) -> Result<String, fmt::Error> {
        let record = line.record();
        let mut writer = String::with_capacity(64);

        format_prefix(record, line.depth(), &mut writer)?;
        if record.level().needs_attention() {
            write!(writer, "[{}] ", record.level().label())?;
        }
        writeln!(writer, "{}", record.message())?;

        for cause in record.causes() {
            format_prefix(record, line.depth() + 1, &mut writer)?;
            writeln!(writer, "Caused by: {}", cause)?;
        }

        if let Some(url) = record.help().and_then(|help| help.url()) {
            format_prefix(record, line.depth() + 1, &mut writer)?;
            match record.help().and_then(|help| help.anchor_text()) {
                Some(anchor_text) => {
                    writeln!(writer, "For additional info see: {} <{}>", anchor_text, url)?
                }
                None => writeln!(writer, "For additional info see: {}", url)?,
            }
        }

        Ok(writer)
    }
}

fn format_prefix<L: Severity>(record: &Record<L>, depth: usize, writer: &mut String) -> fmt::Result {
    #[cfg(feature = "uuid")]
    write!(writer, "{} ", record.uuid())?;

    #[cfg(feature = "chrono")]
    write!(writer, "{:<32} ", record.timestamp().to_rfc3339())?;

    write!(writer, "{:<8} ", record.level().label())?;

    for _ in 0..depth {
        writer.push_str(INDENT);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::tests::SharedBuf;
    use crate::printer::Printer;
    use crate::record::HelpInfo;
    use crate::{Level, LogNode};
    use std::error::Error;
    use std::sync::Arc;

    #[derive(Debug)]
    struct NoSuchMethod;

    impl fmt::Display for NoSuchMethod {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("no such method")
        }
    }

    impl Error for NoSuchMethod {}

    // Drops the tree ID and timestamp so output can be compared exactly.
    fn strip_prefixes(contents: &str) -> String {
        contents
            .lines()
            .map(|line| {
                #[cfg(feature = "uuid")]
                let line = &line[37..];
                #[cfg(feature = "chrono")]
                let line = line.splitn(2, ' ').nth(1).unwrap_or("").trim_start();
                format!("{}\n", line)
            })
            .collect()
    }

    #[test]
    fn pretty_tree() {
        let buf = SharedBuf::default();
        let root = LogNode::root(Printer::new().writer(buf.clone()));
        root.set_max_detail(Level::INFO);

        let module = root.branch(Level::INFO, Some("Compiling module `app`"), None);
        let unit = module.branch(Level::TRACE, Some("Compiling unit `main`"), None);
        unit.log_with_help(
            Level::ERROR,
            Some("Unresolved symbol `frobnicate`"),
            Some(Arc::new(NoSuchMethod)),
            Some(HelpInfo::new("https://example.com/E0425")),
        );
        module.log(Level::INFO, Some("Done"), None);

        let expected = "\
INFO     Compiling module `app`
TRACE       Compiling unit `main`
ERROR          [ERROR] Unresolved symbol `frobnicate`
ERROR             Caused by: no such method
ERROR             For additional info see: https://example.com/E0425
INFO        Done
";
        assert_eq!(strip_prefixes(&buf.contents()), expected);
    }

    #[test]
    fn anchor_text_wraps_url() {
        let buf = SharedBuf::default();
        let root = LogNode::root(Printer::new().writer(buf.clone()));
        root.log_with_help(
            Level::WARN,
            Some("Deprecated"),
            None,
            Some(HelpInfo::new("https://example.com").with_anchor_text("migration guide")),
        );

        assert_eq!(
            strip_prefixes(&buf.contents()),
            "WARN     [WARN] Deprecated\nWARN        For additional info see: migration guide <https://example.com>\n"
        );
    }
}
