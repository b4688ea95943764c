use crate::e_parser::ParseOptions;
use crate::e_types::{Diagnostic, Severity};

/// Reports every compiler diagnostic line.
///
/// A note that follows an error, with only other notes or non-diagnostic lines
/// (source snippets, carets) in between, carries the error's message on its
/// first line so it still reads on its own.
pub fn parse_build_errors(lines: &[&str], options: &ParseOptions) -> Vec<Diagnostic> {
    let dialect = options.dialect;
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut last_error: Option<String> = None;

    for line in lines {
        let Some(build) = dialect.build_diagnostic(line, 0) else {
            continue;
        };
        log::trace!("build line: {}", line);

        let diag = match (build.severity, &last_error) {
            (Severity::Information, Some(error)) => Diagnostic::new(
                build.file,
                build.line,
                build.column,
                &format!("{}\n{}", error, build.message),
                build.severity,
            ),
            _ => Diagnostic::new(
                build.file,
                build.line,
                build.column,
                build.message,
                build.severity,
            ),
        };

        match diag.severity {
            Severity::Error => last_error = Some(diag.message.clone()),
            Severity::Information => {}
            _ => last_error = None,
        }
        diagnostics.push(diag);
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e_grammar::{split_lines, Dialect};

    fn run(text: &str, dialect: Dialect) -> Vec<Diagnostic> {
        parse_build_errors(&split_lines(text), &ParseOptions::new(dialect))
    }

    #[test]
    fn test_note_is_chained_to_error() {
        let text = "path:33:19: error: error is ignored
path:33:19: note: consider using 'try', 'catch', or 'if'";
        let diags = run(text, Dialect::Legacy);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].message, "error is ignored");
        assert_eq!(diags[1].severity, Severity::Information);
        assert_eq!(
            diags[1].message,
            "error is ignored\nconsider using 'try', 'catch', or 'if'"
        );
    }

    #[test]
    fn test_note_chaining_skips_snippet_lines() {
        let text = "src/main.zig:33:19: error: error is ignored
    foo();
    ~~~^~
src/main.zig:33:19: note: consider using 'try', 'catch', or 'if'
src/main.zig:10:1: note: function declared here";
        let diags = run(text, Dialect::Legacy);
        assert_eq!(diags.len(), 3);
        assert_eq!(
            diags[2].message,
            "error is ignored\nfunction declared here"
        );
    }

    #[test]
    fn test_note_without_error_stands_alone() {
        let diags = run("a.zig:1:1: note: lonely", Dialect::Legacy);
        assert_eq!(diags[0].message, "lonely");
        assert_eq!(diags[0].severity, Severity::Information);
    }

    #[test]
    fn test_hint_breaks_the_chain() {
        let text = "a.zig:1:1: error: first
a.zig:2:1: warning: in between
a.zig:3:1: note: detached";
        let diags = run(text, Dialect::Legacy);
        assert_eq!(diags[1].severity, Severity::Hint);
        assert_eq!(diags[2].message, "detached");
    }

    #[test]
    fn test_unknown_word_is_error_in_build_dialect() {
        let diags = run("a.zig:2:1: warning: odd\na.zig:3:1: note: more", Dialect::Build);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[1].message, "odd\nmore");
    }

    #[test]
    fn test_positions_and_paths_untouched() {
        let diags = run("src/main.zig:33:19: error: error is ignored", Dialect::Legacy);
        assert_eq!(diags[0].file, "src/main.zig");
        assert_eq!((diags[0].line, diags[0].column), (32, 18));
    }
}
