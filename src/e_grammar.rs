//! Line-level grammar of zig test and build output.
//!
//! Every matcher is a pure function of `(line, offset)`: matching starts at
//! byte `offset` of `line` and nothing is remembered between calls. An offset
//! that is past the end or not on a char boundary never matches.

use crate::e_types::Severity;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;

// '1/5 test.simple test... OK'
static LEGACY_TEST_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+/\d+\s+test\.([^.]*)\.\.\.\s+(.*)$").expect("invalid test header regex")
});
// '1/5 main.test.simple test... OK'
static BUILD_TEST_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+/\d+\s+(?:[\w.]*?\.)?test\.(.*?)\.\.\.\s+(.*)$")
        .expect("invalid test header regex")
});

// '/p/src/main.zig:29:5: 0x102044ec3 in test.add 2 (test)'
static LEGACY_TEST_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Za-z]:)?[^:]*):(\d+):(\d+):\s+[\dxabcdef]*\s+in\s+test\.(.*)\s+\(test\)$",
    )
    .expect("invalid test frame regex")
});
// '/p/src/main.zig:46:10: 0x104c90fe7 in second (test)'
static LEGACY_OTHER_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:[A-Za-z]:)?[^:]*):(\d+):(\d+):\s+[\dxabcdef]*\s+in\s+(.*)\s+\(test\)$")
        .expect("invalid frame regex")
});
static BUILD_TEST_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Za-z]:)?[^:]*):(\d+):(\d+):\s+(?:0x[0-9a-fA-F]+\s+)?in\s+(?:[\w.]*?\.)?test\.(.*?)(?:\s+\(test\))?$",
    )
    .expect("invalid test frame regex")
});
static BUILD_OTHER_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Za-z]:)?[^:]*):(\d+):(\d+):\s+(?:0x[0-9a-fA-F]+\s+)?in\s+(.*?)(?:\s+\(test\))?$",
    )
    .expect("invalid frame regex")
});

// 'src/main.zig:33:19: error: error is ignored'
static BUILD_DIAGNOSTIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S.*):(\d+):(\d+): ([^:]*): (.*)$").expect("invalid build diagnostic regex")
});

static THREAD_PANIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"thread\s+\d+\s+(panic:.*)$").expect("invalid panic regex")
});
static RUN_TEST_ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^run test:\s+error:\s+(.*)$").expect("invalid run test regex")
});

static ALL_TESTS_PASSED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^All\s+\d+\s+tests\s+passed.$").expect("invalid sentinel regex")
});
static THREAD_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^thread\s+\d+\s+(.*)$").expect("invalid thread regex"));

/// The grammar variant produced by a particular zig version or mode.
///
/// There is no runtime sniffing: the caller picks one, usually from
/// configuration.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Direct `zig test` output: hex addresses and `(test)` suffixes on
    /// frames, unknown severity words become hints.
    #[default]
    Legacy,
    /// Build-orchestrated `zig build test` output: module qualified test
    /// names, optional frame addresses and suffixes, `run test: error:`
    /// announcements, unknown severity words become errors.
    Build,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Legacy => f.write_str("legacy"),
            Dialect::Build => f.write_str("build"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Dialect::Legacy),
            "build" => Ok(Dialect::Build),
            other => Err(format!(
                "unknown dialect '{}' (expected 'legacy' or 'build')",
                other
            )),
        }
    }
}

/// A per-test summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestHeader<'a> {
    pub test_name: &'a str,
    pub message: &'a str,
}

impl TestHeader<'_> {
    pub fn passed(&self) -> bool {
        self.message == "OK"
    }
}

/// A stack-trace entry. Positions are already zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: usize,
    /// Enclosing function, or the bare test name for test-named frames.
    pub function: &'a str,
}

/// A compiler diagnostic line. Positions are already zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildLine<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub message: &'a str,
}

impl Dialect {
    pub fn test_header<'a>(self, line: &'a str, offset: usize) -> Option<TestHeader<'a>> {
        let re = match self {
            Dialect::Legacy => &*LEGACY_TEST_HEADER,
            Dialect::Build => &*BUILD_TEST_HEADER,
        };
        let caps = re.captures(line.get(offset..)?)?;
        Some(TestHeader {
            test_name: caps.get(1)?.as_str(),
            message: caps.get(2)?.as_str(),
        })
    }

    /// Matches a frame whose function is a test; `function` holds the test name.
    pub fn test_frame<'a>(self, line: &'a str, offset: usize) -> Option<Frame<'a>> {
        let re = match self {
            Dialect::Legacy => &*LEGACY_TEST_FRAME,
            Dialect::Build => &*BUILD_TEST_FRAME,
        };
        frame_from(re.captures(line.get(offset..)?)?)
    }

    /// Matches any frame line, test-named ones included.
    pub fn other_frame<'a>(self, line: &'a str, offset: usize) -> Option<Frame<'a>> {
        let re = match self {
            Dialect::Legacy => &*LEGACY_OTHER_FRAME,
            Dialect::Build => &*BUILD_OTHER_FRAME,
        };
        frame_from(re.captures(line.get(offset..)?)?)
    }

    pub fn build_diagnostic<'a>(self, line: &'a str, offset: usize) -> Option<BuildLine<'a>> {
        let caps = BUILD_DIAGNOSTIC.captures(line.get(offset..)?)?;
        Some(BuildLine {
            file: caps.get(1)?.as_str().trim(),
            line: zero_based(&caps, 2)?,
            column: zero_based(&caps, 3)?,
            severity: self.severity_for(caps.get(4)?.as_str()),
            message: caps.get(5)?.as_str(),
        })
    }

    /// Returns the announced panic message, e.g. `panic: reached unreachable code`.
    pub fn panic_announcement<'a>(self, line: &'a str, offset: usize) -> Option<&'a str> {
        let haystack = line.get(offset..)?;
        if let Some(caps) = THREAD_PANIC.captures(haystack) {
            return caps.get(1).map(|m| m.as_str());
        }
        match self {
            Dialect::Legacy => None,
            Dialect::Build => RUN_TEST_ERROR
                .captures(haystack)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str()),
        }
    }

    pub fn severity_for(self, word: &str) -> Severity {
        match word.trim().to_ascii_lowercase().as_str() {
            "error" => Severity::Error,
            "note" => Severity::Information,
            _ => match self {
                Dialect::Legacy => Severity::Hint,
                Dialect::Build => Severity::Error,
            },
        }
    }
}

fn frame_from(caps: Captures<'_>) -> Option<Frame<'_>> {
    Some(Frame {
        file: caps.get(1)?.as_str(),
        line: zero_based(&caps, 2)?,
        column: zero_based(&caps, 3)?,
        function: caps.get(4)?.as_str(),
    })
}

// zig prints one-based positions
fn zero_based(caps: &Captures<'_>, group: usize) -> Option<usize> {
    let n: usize = caps.get(group)?.as_str().parse().ok()?;
    Some(n.saturating_sub(1))
}

/// `All 5 tests passed.`
pub fn all_tests_passed(line: &str) -> bool {
    ALL_TESTS_PASSED.is_match(line)
}

/// Removes a leading `thread <tid> ` so messages do not depend on the process.
///
/// ```
/// use zig_e::e_grammar::strip_thread_id;
///
/// assert_eq!(
///     strip_thread_id("thread 46176743 panic: reached unreachable code"),
///     "panic: reached unreachable code"
/// );
/// assert_eq!(strip_thread_id("expected 2, found 3"), "expected 2, found 3");
/// ```
pub fn strip_thread_id(message: &str) -> &str {
    match THREAD_PREFIX.captures(message).and_then(|caps| caps.get(1)) {
        Some(rest) => &message[rest.start()..],
        None => message,
    }
}

/// Splits captured output into lines, dropping the `\r` of CRLF endings.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FRAME: &str =
        "/Users/ianic/code/zig/test_project/src/main.zig:29:5: 0x102044ec3 in test.add 2 (test)";
    const OTHER_FRAME: &str =
        "/Users/ianic/code/zig/test_project/src/main.zig:46:10: 0x104c90fe7 in second (test)";

    #[test]
    fn test_header_legacy() {
        let h = Dialect::Legacy
            .test_header("1/5 test.simple test... OK", 0)
            .unwrap();
        assert_eq!(h.test_name, "simple test");
        assert!(h.passed());

        let h = Dialect::Legacy
            .test_header("2/5 test.add 2... expected 2, found 3", 0)
            .unwrap();
        assert_eq!(h.test_name, "add 2");
        assert_eq!(h.message, "expected 2, found 3");
        assert!(!h.passed());
    }

    #[test]
    fn test_header_legacy_rejects_qualified_names() {
        assert!(Dialect::Legacy
            .test_header("1/1 main.test.add... FAIL", 0)
            .is_none());
    }

    #[test]
    fn test_header_build_accepts_qualified_names() {
        let h = Dialect::Build
            .test_header("1/3 main.test.parse v1.2... FAIL (TestUnexpectedResult)", 0)
            .unwrap();
        assert_eq!(h.test_name, "parse v1.2");
        assert_eq!(h.message, "FAIL (TestUnexpectedResult)");
    }

    #[test]
    fn test_header_with_offset() {
        let line = "[run] 1/1 test.x... boom";
        assert!(Dialect::Legacy.test_header(line, 0).is_none());
        let h = Dialect::Legacy.test_header(line, 6).unwrap();
        assert_eq!(h.test_name, "x");
        assert!(Dialect::Legacy.test_header(line, 500).is_none());
    }

    #[test]
    fn test_frame_positions_are_zero_based() {
        let f = Dialect::Legacy.test_frame(TEST_FRAME, 0).unwrap();
        assert_eq!(f.file, "/Users/ianic/code/zig/test_project/src/main.zig");
        assert_eq!((f.line, f.column), (28, 4));
        assert_eq!(f.function, "add 2");
    }

    #[test]
    fn test_other_frame_matches_any_function() {
        let f = Dialect::Legacy.other_frame(OTHER_FRAME, 0).unwrap();
        assert_eq!(f.function, "second");
        assert_eq!((f.line, f.column), (45, 9));
        assert!(Dialect::Legacy.test_frame(OTHER_FRAME, 0).is_none());
        let f = Dialect::Legacy.other_frame(TEST_FRAME, 0).unwrap();
        assert_eq!(f.function, "test.add 2");
    }

    #[test]
    fn test_legacy_frame_requires_suffix_and_address() {
        assert!(Dialect::Legacy
            .other_frame("/p/main.zig:46:10: in second", 0)
            .is_none());
        let f = Dialect::Build
            .other_frame("/p/main.zig:46:10: in second", 0)
            .unwrap();
        assert_eq!(f.function, "second");
        let f = Dialect::Build
            .other_frame("/p/main.zig:46:10: 0x104c90fe7 in second (test)", 0)
            .unwrap();
        assert_eq!(f.function, "second");
    }

    #[test]
    fn test_build_test_frame_with_module_prefix() {
        let f = Dialect::Build
            .test_frame("/p/src/main.zig:29:5: 0x1 in main.test.add 2 (test)", 0)
            .unwrap();
        assert_eq!(f.function, "add 2");
        let f = Dialect::Build
            .test_frame("/p/src/main.zig:29:5: in test.add 2", 0)
            .unwrap();
        assert_eq!(f.function, "add 2");
    }

    #[test]
    fn test_windows_drive_paths() {
        let f = Dialect::Legacy
            .other_frame(r"C:\work\src\main.zig:46:10: 0x7ff6 in second (test)", 0)
            .unwrap();
        assert_eq!(f.file, r"C:\work\src\main.zig");
        assert_eq!(f.line, 45);
    }

    #[test]
    fn test_build_diagnostic_severity_by_dialect() {
        let line = "src/main.zig:33:19: error: error is ignored";
        let b = Dialect::Legacy.build_diagnostic(line, 0).unwrap();
        assert_eq!(b.file, "src/main.zig");
        assert_eq!((b.line, b.column), (32, 18));
        assert_eq!(b.severity, Severity::Error);
        assert_eq!(b.message, "error is ignored");

        let note = "src/main.zig:33:19: note: consider using 'try', 'catch', or 'if'";
        assert_eq!(
            Dialect::Legacy.build_diagnostic(note, 0).unwrap().severity,
            Severity::Information
        );

        let warn = "src/main.zig:1:1: warning: something odd";
        assert_eq!(
            Dialect::Legacy.build_diagnostic(warn, 0).unwrap().severity,
            Severity::Hint
        );
        assert_eq!(
            Dialect::Build.build_diagnostic(warn, 0).unwrap().severity,
            Severity::Error
        );
    }

    #[test]
    fn test_build_diagnostic_ignores_frames() {
        assert!(Dialect::Legacy.build_diagnostic(TEST_FRAME, 0).is_none());
        assert!(Dialect::Legacy
            .build_diagnostic("src/main.zig::: error: nope", 0)
            .is_none());
    }

    #[test]
    fn test_zero_line_saturates() {
        let b = Dialect::Legacy
            .build_diagnostic("a.zig:0:0: error: x", 0)
            .unwrap();
        assert_eq!((b.line, b.column), (0, 0));
    }

    #[test]
    fn test_panic_announcement() {
        let line = "thread 46176743 panic: reached unreachable code";
        assert_eq!(
            Dialect::Legacy.panic_announcement(line, 0),
            Some("panic: reached unreachable code")
        );
        let run = "run test: error: the following test command crashed:";
        assert_eq!(Dialect::Legacy.panic_announcement(run, 0), None);
        assert_eq!(
            Dialect::Build.panic_announcement(run, 0),
            Some("the following test command crashed:")
        );
    }

    #[test]
    fn test_all_tests_passed() {
        assert!(all_tests_passed("All 5 tests passed."));
        assert!(!all_tests_passed("All 5 tests passed. Not really"));
        assert!(!all_tests_passed("0 passed; 0 skipped; 1 failed."));
    }

    #[test]
    fn test_strip_thread_id_multiline() {
        assert_eq!(
            strip_thread_id("thread 1 panic: x\nsecond line"),
            "panic: x\nsecond line"
        );
        assert_eq!(strip_thread_id("threads 1 x"), "threads 1 x");
    }

    #[test]
    fn test_split_lines_drops_cr() {
        assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("Build".parse::<Dialect>(), Ok(Dialect::Build));
        assert_eq!("legacy".parse::<Dialect>(), Ok(Dialect::Legacy));
        assert!("modern".parse::<Dialect>().is_err());
    }
}
