use crate::e_grammar::{Dialect, Frame};
use crate::e_parser::{ParseOptions, UnattributedPolicy};
use crate::e_types::Diagnostic;

/// Pairs failing test headers with the stack frame that names the same test.
///
/// For every header whose message is not `OK`, the first later test-named
/// frame with exactly the same test name becomes the primary diagnostic. Every
/// other frame between the header and that frame is then reported with the
/// same message, which lays out the whole call chain. Scanning resumes after
/// the matched frame.
pub fn parse_test_blocks(lines: &[&str], options: &ParseOptions) -> Vec<Diagnostic> {
    let dialect = options.dialect;
    let mut diagnostics = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(header) = dialect.test_header(lines[i], 0) else {
            i += 1;
            continue;
        };
        if header.passed() {
            i += 1;
            continue;
        }

        match find_test_frame(dialect, lines, i + 1, header.test_name) {
            Some((j, frame)) => {
                log::trace!(
                    "test '{}' failed at {}:{}:{}",
                    header.test_name,
                    frame.file,
                    frame.line + 1,
                    frame.column + 1
                );
                diagnostics.push(Diagnostic::error(
                    frame.file,
                    frame.line,
                    frame.column,
                    header.message,
                ));
                for line in &lines[i + 1..j] {
                    if let Some(caller) = dialect.other_frame(line, 0) {
                        diagnostics.push(Diagnostic::error(
                            caller.file,
                            caller.line,
                            caller.column,
                            header.message,
                        ));
                    }
                }
                i = j + 1;
            }
            None => {
                match options.unattributed {
                    UnattributedPolicy::Drop => {
                        log::debug!("no frame found for failing test '{}'", header.test_name);
                    }
                    UnattributedPolicy::Report => {
                        if let Some(frame) = first_frame_in_block(dialect, lines, i + 1) {
                            diagnostics.push(Diagnostic::error(
                                frame.file,
                                frame.line,
                                frame.column,
                                header.message,
                            ));
                        }
                    }
                }
                i += 1;
            }
        }
    }
    diagnostics
}

fn find_test_frame<'a>(
    dialect: Dialect,
    lines: &[&'a str],
    start: usize,
    test_name: &str,
) -> Option<(usize, Frame<'a>)> {
    lines
        .iter()
        .enumerate()
        .skip(start)
        .find_map(|(j, line)| {
            dialect
                .test_frame(*line, 0)
                .filter(|frame| frame.function == test_name)
                .map(|frame| (j, frame))
        })
}

// Any frame after the header, stopping at the next header.
fn first_frame_in_block<'a>(
    dialect: Dialect,
    lines: &[&'a str],
    start: usize,
) -> Option<Frame<'a>> {
    for line in lines.iter().skip(start) {
        if dialect.test_header(line, 0).is_some() {
            return None;
        }
        if let Some(frame) = dialect.other_frame(*line, 0) {
            return Some(frame);
        }
    }
    None
}
