#![allow(dead_code)]
use std::fs;
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// The captured output of a single failing test, as printed by `zig test`.
pub const SINGLE_FAILURE: &str = "1/1 test.add 2... expected 2, found 3
FAIL (...)
/p/main.zig:29:5: 0x1 in test.add 2 (test)
    try std.testing.expectEqual(2, add(1, 2));
    ^
0 passed; 0 skipped; 1 failed.
";

/// A directory to run `zig-e` in, holding captured output and config files.
pub struct TestWorkspace {
    /// The temporary directory. When this is dropped, the directory and its contents are removed.
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> IoResult<Self> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path().join("project");
        fs::create_dir_all(&root)?;
        Ok(TestWorkspace { temp_dir, root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes captured zig output under the workspace and returns its path.
    pub fn capture(&self, name: &str, contents: &str) -> IoResult<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Writes `zig-e.toml` in the workspace root.
    pub fn config(&self, contents: &str) -> IoResult<PathBuf> {
        self.capture("zig-e.toml", contents)
    }
}

/// Path of a file under `tests/testdata`.
pub fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(relative)
}

pub fn read_fixture(relative: &str) -> String {
    fs::read_to_string(fixture_path(relative)).unwrap()
}
