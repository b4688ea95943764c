use crate::e_dispatcher::StrategyDispatcher;
use crate::e_grammar::{all_tests_passed, split_lines, Dialect};
use crate::e_paths::resolve_file_path;
use crate::e_types::{group_by_file, Diagnostic, FileDiagnosticMap, Severity, StrategyKind};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "uses_serde")]
use serde::Serialize;

/// What to do with a failing test header that no frame names.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum UnattributedPolicy {
    /// Contribute nothing.
    #[default]
    Drop,
    /// Report the header's message at the first frame of its block, if any.
    Report,
}

impl fmt::Display for UnattributedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnattributedPolicy::Drop => f.write_str("drop"),
            UnattributedPolicy::Report => f.write_str("report"),
        }
    }
}

impl FromStr for UnattributedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(UnattributedPolicy::Drop),
            "report" => Ok(UnattributedPolicy::Report),
            other => Err(format!(
                "unknown unattributed header policy '{}' (expected 'drop' or 'report')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub dialect: Dialect,
    pub unattributed: UnattributedPolicy,
}

impl ParseOptions {
    pub fn new(dialect: Dialect) -> Self {
        ParseOptions {
            dialect,
            ..Default::default()
        }
    }

    pub fn with_unattributed(mut self, policy: UnattributedPolicy) -> Self {
        self.unattributed = policy;
        self
    }
}

/// The result of one parse call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "uses_serde", derive(Serialize))]
pub struct ParseOutcome {
    /// Diagnostics in discovery order, paths already resolved.
    pub diagnostics: Vec<Diagnostic>,
    /// The strategy that produced them, `None` when nothing matched.
    pub strategy: Option<StrategyKind>,
    /// The output ended with `All <n> tests passed.`
    pub all_passed: bool,
}

impl ParseOutcome {
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn by_file(&self) -> FileDiagnosticMap {
        group_by_file(&self.diagnostics)
    }
}

/// Parses captured zig output with a fixed set of options.
///
/// # Example
/// ```
/// use zig_e::{Dialect, ParseOptions, Severity, StrategyKind, ZigOutputParser};
///
/// let parser = ZigOutputParser::new(ParseOptions::new(Dialect::Legacy));
/// let outcome = parser.parse("src/main.zig:33:19: error: error is ignored\n", "/p");
/// assert_eq!(outcome.strategy, Some(StrategyKind::BuildError));
/// assert_eq!(outcome.diagnostics[0].file, "/p/src/main.zig");
/// assert_eq!(outcome.diagnostics[0].severity, Severity::Error);
/// ```
#[derive(Debug)]
pub struct ZigOutputParser {
    options: ParseOptions,
    dispatcher: StrategyDispatcher,
}

impl Default for ZigOutputParser {
    fn default() -> Self {
        ZigOutputParser::new(ParseOptions::default())
    }
}

impl ZigOutputParser {
    pub fn new(options: ParseOptions) -> Self {
        ZigOutputParser {
            options,
            dispatcher: StrategyDispatcher::with_default_strategies(),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, text: &str, cwd: &str) -> ParseOutcome {
        let lines = split_lines(text);

        let last = lines.iter().rev().find(|l| !l.trim().is_empty());
        if last.is_some_and(|l| all_tests_passed(l)) {
            log::debug!("all tests passed, nothing to report");
            return ParseOutcome {
                all_passed: true,
                ..Default::default()
            };
        }

        match self.dispatcher.dispatch(&lines, &self.options) {
            Some((kind, diagnostics)) => {
                log::debug!("{} diagnostics from {} strategy", diagnostics.len(), kind);
                ParseOutcome {
                    diagnostics: diagnostics
                        .iter()
                        .map(|d| d.relocated(resolve_file_path(cwd, &d.file)))
                        .collect(),
                    strategy: Some(kind),
                    all_passed: false,
                }
            }
            None => ParseOutcome::default(),
        }
    }
}

/// Parses with the default options (legacy dialect, unattributed headers dropped).
///
/// ```
/// let diags = zig_e::parse(
///     "1/1 test.add 2... expected 2, found 3\n/p/main.zig:29:5: 0x1 in test.add 2 (test)\n",
///     "/p",
/// );
/// assert_eq!(diags.len(), 1);
/// assert_eq!((diags[0].line, diags[0].column), (28, 4));
/// ```
pub fn parse(text: &str, cwd: &str) -> Vec<Diagnostic> {
    ZigOutputParser::default().parse(text, cwd).diagnostics
}
