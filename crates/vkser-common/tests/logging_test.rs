//! Integration test: logging initialisation
//!
//! The global subscriber can only be installed once per process, so the
//! whole lifecycle is exercised in a single test.

use vkser_common::try_init_logging;

#[test]
fn test_try_init_logging_only_installs_once() {
    assert!(try_init_logging("debug"), "first install should succeed");
    assert!(!try_init_logging("debug"), "second install should be refused");

    tracing::info!("logging initialised for tests");
}
