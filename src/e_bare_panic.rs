use crate::e_parser::ParseOptions;
use crate::e_types::Diagnostic;

/// Handles a panic announced outside the per-test listing.
///
/// Only an announcement with no test header anywhere before it counts. Every
/// frame after it gets the panic message, since there is no single primary
/// frame to prefer.
pub fn parse_bare_panic(lines: &[&str], options: &ParseOptions) -> Vec<Diagnostic> {
    let dialect = options.dialect;

    for (i, line) in lines.iter().enumerate() {
        if dialect.test_header(line, 0).is_some() {
            return Vec::new();
        }
        let Some(message) = dialect.panic_announcement(line, 0) else {
            continue;
        };
        log::trace!("bare panic on line {}: {}", i + 1, message);
        return lines[i + 1..]
            .iter()
            .filter_map(|l| dialect.other_frame(l, 0))
            .map(|frame| Diagnostic::error(frame.file, frame.line, frame.column, message))
            .collect();
    }
    Vec::new()
}
