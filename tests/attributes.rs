#![cfg(feature = "attributes")]
use tree_logger::{local, Level};

#[tree_logger::test]
fn runs_with_a_current_root() {
    let root = local::current().unwrap();
    assert!(root.is_root());
    assert_eq!(root.max_detail(), Level::ALL);
    tree_logger::info!("Hello, world!");
}

#[tree_logger::test(level = "warn")]
fn level_argument_sets_max_detail() {
    assert!(local::is_loggable(Level::WARN));
    assert!(!local::is_loggable(Level::INFO));
}

#[tree_logger::test(fmt = "json")]
fn json_argument() {
    let branch = tree_logger::branch!(Level::INFO, "Hello in {}", "JSON");
    branch.log(Level::INFO, Some("nested"), None);
}

#[tree_logger::test]
fn returns_the_body_value() -> Result<(), std::num::ParseIntError> {
    let n: u32 = "42".parse()?;
    tree_logger::info!("parsed {}", n);
    Ok(())
}

#[cfg(feature = "sync")]
#[tree_logger::test]
#[tokio::test]
async fn async_tests_run_in_the_future() {
    assert!(local::current().is_some());
    tokio::task::yield_now().await;
    tree_logger::info!("Hello from Tokio");
}
