// common/test_prelude.rs

// Re-export commonly used items for integration tests.
pub use assert_cmd::Command;
pub use predicates::prelude::*;
pub use predicates::str::contains;

/// A `zig-e` command that ignores any `RUST_LOG` of the caller.
pub fn zig_e() -> Command {
    let mut cmd = Command::cargo_bin("zig-e").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}
