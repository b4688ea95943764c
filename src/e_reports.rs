use crate::e_parser::ParseOutcome;
use crate::e_types::{Diagnostic, Severity};
use anyhow::Result;
use nu_ansi_term::Color;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Table => f.write_str("table"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!(
                "unknown format '{}' (expected 'text', 'json' or 'table')",
                other
            )),
        }
    }
}

/// Options that only affect presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStyle {
    pub group: bool,
    pub color: bool,
}

/// Renders a parse outcome in the requested format. The result ends with a
/// newline unless it is empty.
pub fn render(outcome: &ParseOutcome, format: OutputFormat, style: RenderStyle) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(&outcome.diagnostics, style.color)),
        OutputFormat::Json => render_json(outcome, style.group),
        OutputFormat::Table => render_table(outcome),
    }
}

/// `file:LINE:COL: severity: message`, one-based like the compiler prints.
/// Continuation lines of multi-line messages are indented.
pub fn render_text(diagnostics: &[Diagnostic], color: bool) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        let severity = if color {
            severity_color(diag.severity)
                .bold()
                .paint(diag.severity.as_str())
                .to_string()
        } else {
            diag.severity.to_string()
        };
        let mut lines = diag.message.lines();
        out.push_str(&format!(
            "{}:{}:{}: {}: {}\n",
            diag.file,
            diag.line + 1,
            diag.column + 1,
            severity,
            lines.next().unwrap_or("")
        ));
        for rest in lines {
            out.push_str("    ");
            out.push_str(rest);
            out.push('\n');
        }
    }
    out
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Information => Color::LightCyan,
        Severity::Hint => Color::Green,
    }
}

#[cfg(feature = "uses_serde")]
pub fn render_json(outcome: &ParseOutcome, group: bool) -> Result<String> {
    let mut json = if group {
        serde_json::to_string_pretty(&outcome.by_file())?
    } else {
        serde_json::to_string_pretty(&outcome.diagnostics)?
    };
    json.push('\n');
    Ok(json)
}

#[cfg(not(feature = "uses_serde"))]
pub fn render_json(_outcome: &ParseOutcome, _group: bool) -> Result<String> {
    anyhow::bail!("JSON output needs the `uses_serde` feature")
}

#[cfg(feature = "table")]
pub fn render_table(outcome: &ParseOutcome) -> Result<String> {
    use comfy_table::{Cell, ContentArrangement, Row, Table};

    if outcome.is_empty() {
        return Ok(String::new());
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(120);
    table.set_header(vec!["File", "Line", "Col", "Severity", "Message"]);
    for (file, diags) in outcome.by_file().iter() {
        for diag in diags {
            table.add_row(Row::from(vec![
                Cell::new(file),
                Cell::new(diag.line + 1),
                Cell::new(diag.column + 1),
                Cell::new(diag.severity),
                Cell::new(&diag.message),
            ]));
        }
    }
    let mut report = table.to_string();
    report.push('\n');
    Ok(report)
}

#[cfg(not(feature = "table"))]
pub fn render_table(_outcome: &ParseOutcome) -> Result<String> {
    anyhow::bail!("table output needs the `table` feature")
}

/// One line such as `3 problems (2 errors, 1 information) in 2 files via build-error`.
pub fn summary(outcome: &ParseOutcome) -> String {
    if outcome.all_passed {
        return "all tests passed".to_string();
    }
    let Some(strategy) = outcome.strategy else {
        return "no problems found".to_string();
    };

    let mut counts: BTreeMap<Severity, usize> = BTreeMap::new();
    for diag in &outcome.diagnostics {
        *counts.entry(diag.severity).or_insert(0) += 1;
    }
    let breakdown = counts
        .iter()
        .map(|(severity, n)| match (severity, n) {
            (Severity::Error, 1) => "1 error".to_string(),
            (Severity::Error, n) => format!("{} errors", n),
            (Severity::Warning, 1) => "1 warning".to_string(),
            (Severity::Warning, n) => format!("{} warnings", n),
            (Severity::Hint, 1) => "1 hint".to_string(),
            (Severity::Hint, n) => format!("{} hints", n),
            (Severity::Information, n) => format!("{} information", n),
        })
        .collect::<Vec<_>>()
        .join(", ");
    let files = outcome.by_file().len();

    format!(
        "{} {} ({}) in {} {} via {}",
        outcome.len(),
        if outcome.len() == 1 { "problem" } else { "problems" },
        breakdown,
        files,
        if files == 1 { "file" } else { "files" },
        strategy
    )
}
