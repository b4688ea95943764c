use crate::e_cli::Cli;
use crate::e_config::{load_config, locate_config, ZigEConfig};
use crate::e_parser::{ParseOptions, ZigOutputParser};
use crate::e_reports::{render, summary, RenderStyle};
use crate::prelude::*;
use anyhow::{Context, Result};
use std::io::{IsTerminal, Read, Write};

pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_PROBLEMS: i32 = 1;
pub const EXIT_FAILURE: i32 = 2;

/// Reads captured output from a file, or from stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(p) if p != Path::new("-") => {
            fs::read(p).with_context(|| format!("failed to read {}", p.display()))?
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Picks the config: an explicit `--config`, else the nearest `zig-e.toml`, else defaults.
pub fn resolve_config(cli: &Cli, start: &Path) -> Result<ZigEConfig> {
    if let Some(ref path) = cli.config {
        return load_config(path);
    }
    match locate_config(start) {
        Some(path) => {
            debug!("using config {}", path.display());
            load_config(&path)
        }
        None => Ok(ZigEConfig::default()),
    }
}

/// Runs the command line and returns the process exit status.
pub fn run(cli: &Cli) -> Result<i32> {
    let current_dir = env::current_dir().context("failed to determine current directory")?;
    let config = resolve_config(cli, &current_dir)?;

    let options = ParseOptions {
        dialect: cli.dialect.unwrap_or(config.parse.dialect),
        unattributed: cli.unattributed.unwrap_or(config.parse.unattributed),
    };
    let cwd = cli
        .cwd
        .clone()
        .or_else(|| config.cwd.clone())
        .unwrap_or_else(|| current_dir.to_string_lossy().into_owned());
    debug!("options: {:?}, cwd: {}", options, cwd);

    let text = read_input(cli.input.as_deref())?;
    let outcome = ZigOutputParser::new(options).parse(&text, &cwd);

    let style = RenderStyle {
        group: cli.group || config.group,
        color: !cli.no_color && config.color && io::stdout().is_terminal(),
    };
    let format = cli.format.unwrap_or(config.format);

    let mut stdout = io::stdout().lock();
    let status = if outcome.is_empty() && cli.failed {
        info!("process failed but no diagnostics were recognized, echoing raw output");
        stdout.write_all(text.as_bytes())?;
        EXIT_PROBLEMS
    } else {
        stdout.write_all(render(&outcome, format, style)?.as_bytes())?;
        if outcome.has_errors() {
            EXIT_PROBLEMS
        } else {
            EXIT_CLEAN
        }
    };
    stdout.flush()?;

    if cli.summary {
        eprintln!("{}", summary(&outcome));
    }
    Ok(status)
}
