use indexmap::IndexMap;
use std::fmt;

#[cfg(feature = "uses_serde")]
use serde::{Deserialize, Serialize};

/// Represents how serious a recovered diagnostic is.
///
/// The ordering follows the editor convention: `Error` is the most severe and
/// `Hint` the least.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "uses_serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "information",
            Severity::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured finding recovered from zig output.
///
/// `line` and `column` are zero-based; the one-based positions printed by zig
/// are converted exactly once, when a line is matched.
///
/// # Example
/// ```
/// use zig_e::{Diagnostic, Severity};
///
/// let diag = Diagnostic::new("src/main.zig", 28, 4, "expected 2, found 3", Severity::Error);
/// assert_eq!(diag.to_string(), "src/main.zig:29:5: error: expected 2, found 3");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "uses_serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    /// Creates a diagnostic, stripping any `thread <tid> ` prefix from the message.
    pub fn new(
        file: impl Into<String>,
        line: usize,
        column: usize,
        message: &str,
        severity: Severity,
    ) -> Self {
        Diagnostic {
            file: file.into(),
            line,
            column,
            message: crate::e_grammar::strip_thread_id(message).to_string(),
            severity,
        }
    }

    /// Error-severity shorthand used by the stack-trace strategies.
    pub fn error(file: impl Into<String>, line: usize, column: usize, message: &str) -> Self {
        Diagnostic::new(file, line, column, message, Severity::Error)
    }

    /// Returns a copy of this diagnostic addressed to `file`.
    pub fn relocated(&self, file: String) -> Self {
        Diagnostic {
            file,
            ..self.clone()
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file,
            self.line + 1,
            self.column + 1,
            self.severity,
            self.message
        )
    }
}

/// Identifies which parse strategy produced a result.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(
    feature = "uses_serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum StrategyKind {
    TestBlock,
    BarePanic,
    BuildError,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::TestBlock => "test-block",
            StrategyKind::BarePanic => "bare-panic",
            StrategyKind::BuildError => "build-error",
        };
        f.write_str(name)
    }
}

/// Diagnostics partitioned by file.
///
/// Files appear in the order they were first seen and each file keeps its
/// diagnostics in discovery order. Nothing is dropped: [`FileDiagnosticMap::total`]
/// always equals the length of the list the map was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "uses_serde", derive(Serialize), serde(transparent))]
pub struct FileDiagnosticMap {
    files: IndexMap<String, Vec<Diagnostic>>,
}

impl FileDiagnosticMap {
    /// Number of distinct files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total number of diagnostics across every file.
    pub fn total(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn get(&self, file: &str) -> Option<&[Diagnostic]> {
        self.files.get(file).map(Vec::as_slice)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Diagnostic])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_flat(self) -> Vec<Diagnostic> {
        self.files.into_values().flatten().collect()
    }
}

/// Groups diagnostics by file, preserving first-seen file order.
pub fn group_by_file(diagnostics: &[Diagnostic]) -> FileDiagnosticMap {
    let mut files: IndexMap<String, Vec<Diagnostic>> = IndexMap::new();
    for diag in diagnostics {
        files.entry(diag.file.clone()).or_default().push(diag.clone());
    }
    FileDiagnosticMap { files }
}
