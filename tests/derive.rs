#![cfg(feature = "derive")]
use tree_logger::sink::Capture;
use tree_logger::{LogNode, Severity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Severity)]
enum Diagnostic {
    #[severity(attention, label = "FATAL")]
    Fatal,
    #[severity(attention)]
    Lint,
    #[severity(default)]
    Note,
    Verbose,
    Everything,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Severity)]
enum Only {
    One,
}

#[test]
fn chain_follows_declaration_order() {
    assert_eq!(Diagnostic::ALL, Diagnostic::Everything);
    assert_eq!(Diagnostic::DEFAULT, Diagnostic::Note);
    assert_eq!(Diagnostic::Fatal.parent(), None);
    assert_eq!(Diagnostic::Lint.parent(), Some(Diagnostic::Fatal));
    assert_eq!(Diagnostic::Everything.parent(), Some(Diagnostic::Verbose));
    assert_eq!(Diagnostic::ALL.chain().count(), 5);
    assert!(Diagnostic::Verbose.is_lower_priority_to(Diagnostic::Note));
}

#[test]
fn labels_and_attention() {
    assert_eq!(Diagnostic::Fatal.label(), "FATAL");
    assert_eq!(Diagnostic::Verbose.label(), "VERBOSE");
    assert!(Diagnostic::Lint.needs_attention());
    assert!(!Diagnostic::Note.needs_attention());
}

#[test]
fn single_variant_is_its_own_chain() {
    assert_eq!(Only::ALL, Only::One);
    assert_eq!(Only::DEFAULT, Only::One);
    assert_eq!(Only::One.parent(), None);
}

#[test]
fn trees_work_with_derived_severities() {
    let capture: Capture<Diagnostic> = Capture::new();
    let root = LogNode::root(capture.clone());
    root.set_max_detail(None);
    assert_eq!(root.max_detail(), Diagnostic::Note);

    let pass = root.branch(Diagnostic::Verbose, Some("type checking"), None);
    pass.log(Diagnostic::Everything, Some("hidden"), None);
    assert!(capture.logs().is_empty());

    pass.log(Diagnostic::Lint, Some("unused import"), None);
    let logs = capture.logs();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].level(), Diagnostic::Verbose);
    assert_eq!(logs[1].level(), Diagnostic::Lint);
}
