/// Logs an entry at the thread's [current node].
///
/// The message is only formatted if the current node would render `level`.
/// A cause can be attached with `cause:` before the format string; anything
/// that converts into `Box<dyn Error + Send + Sync>` is accepted.
///
/// # Examples
///
/// ```
/// use tree_logger::Level;
///
/// tree_logger::builder().in_scope(|| {
///     let path = "config.toml";
///     tree_logger::log!(Level::INFO, "reading {}", path);
///
///     let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
///     tree_logger::log!(Level::ERROR, cause: err, "failed to read {}", path);
/// })
/// ```
///
/// [current node]: crate::local
#[macro_export]
macro_rules! log {
    ($lvl:expr, cause: $cause:expr, $($arg:tt)+) => {{
        let __level = $lvl;
        if $crate::local::is_loggable(__level) {
            $crate::local::log(
                __level,
                ::std::option::Option::Some(::std::format!($($arg)+).as_str()),
                ::std::option::Option::Some($crate::private::into_cause($cause)),
                ::std::option::Option::None,
            );
        }
    }};
    ($lvl:expr, $($arg:tt)+) => {{
        let __level = $lvl;
        if $crate::local::is_loggable(__level) {
            $crate::local::log(
                __level,
                ::std::option::Option::Some(::std::format!($($arg)+).as_str()),
                ::std::option::Option::None,
                ::std::option::Option::None,
            );
        }
    }};
}

/// Logs an entry at [`Level::ERROR`] at the thread's current node.
///
/// See [`log!`] for details.
///
/// [`Level::ERROR`]: crate::Level::ERROR
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::ERROR, $($arg)+)
    };
}

/// Logs an entry at [`Level::WARN`] at the thread's current node.
///
/// See [`log!`] for details.
///
/// [`Level::WARN`]: crate::Level::WARN
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::WARN, $($arg)+)
    };
}

/// Logs an entry at [`Level::INFO`] at the thread's current node.
///
/// See [`log!`] for details.
///
/// [`Level::INFO`]: crate::Level::INFO
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::INFO, $($arg)+)
    };
}

/// Logs an entry at [`Level::TRACE`] at the thread's current node.
///
/// See [`log!`] for details.
///
/// [`Level::TRACE`]: crate::Level::TRACE
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::TRACE, $($arg)+)
    };
}

/// Logs an entry at [`Level::DEBUG`] at the thread's current node.
///
/// See [`log!`] for details.
///
/// [`Level::DEBUG`]: crate::Level::DEBUG
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::DEBUG, $($arg)+)
    };
}

/// Logs an entry at [`Level::SPAM`] at the thread's current node.
///
/// See [`log!`] for details.
///
/// [`Level::SPAM`]: crate::Level::SPAM
#[macro_export]
macro_rules! spam {
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::SPAM, $($arg)+)
    };
}

/// Creates a branch beneath the thread's [current node], returning it.
///
/// Unlike [`log!`], the message is always formatted, since the branch may
/// be committed later by something logged beneath it. Without a current
/// node, the returned branch discards everything.
///
/// # Examples
///
/// ```
/// use tree_logger::{local, Level};
///
/// tree_logger::builder().in_scope(|| {
///     let unit = tree_logger::branch!(Level::TRACE, "compiling `{}`", "main");
///     let _guard = local::set_default(unit);
///     tree_logger::info!("done");
/// })
/// ```
///
/// [current node]: crate::local
#[macro_export]
macro_rules! branch {
    ($lvl:expr, cause: $cause:expr, $($arg:tt)+) => {
        $crate::local::branch(
            $lvl,
            ::std::option::Option::Some(::std::format!($($arg)+).as_str()),
            ::std::option::Option::Some($crate::private::into_cause($cause)),
            ::std::option::Option::None,
        )
    };
    ($lvl:expr, $($arg:tt)+) => {
        $crate::local::branch(
            $lvl,
            ::std::option::Option::Some(::std::format!($($arg)+).as_str()),
            ::std::option::Option::None,
            ::std::option::Option::None,
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::local;
    use crate::sink::Capture;
    use crate::{Level, LogNode};
    use std::cell::Cell;
    use std::fmt;

    #[test]
    fn messages_are_formatted_lazily() {
        struct Counted<'a>(&'a Cell<usize>);

        impl fmt::Display for Counted<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.set(self.0.get() + 1);
                f.write_str("counted")
            }
        }

        let capture = Capture::new();
        let root = LogNode::root(capture.clone());
        root.set_max_detail(Level::INFO);
        let _guard = local::set_default(root);

        let count = Cell::new(0);
        crate::debug!("{}", Counted(&count));
        assert_eq!(count.get(), 0);

        crate::info!("{}", Counted(&count));
        assert_eq!(count.get(), 1);
        assert_eq!(capture.logs()[0].message(), "counted");
    }

    #[test]
    fn causes_are_attached() {
        let capture = Capture::new();
        let _guard = local::set_default(LogNode::root(capture.clone()));

        crate::error!(cause: "disk full", "failed to write {}", "out.o");
        let child = crate::branch!(Level::WARN, cause: "timed out", "retrying");
        drop(child);

        let logs = capture.logs();
        assert_eq!(logs[0].message(), "failed to write out.o");
        assert_eq!(logs[0].record().cause.as_deref(), Some("disk full"));
        assert!(logs[1].is_branch());
        assert_eq!(logs[1].record().cause.as_deref(), Some("timed out"));
    }
}
