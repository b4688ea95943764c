use crate::e_grammar::Dialect;
use crate::e_parser::{ParseOptions, UnattributedPolicy};
use crate::e_reports::OutputFormat;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toml::{Table, Value};

pub const CONFIG_FILE_NAME: &str = "zig-e.toml";

/// Settings read from `zig-e.toml`. Every field has a default, so an empty
/// file is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZigEConfig {
    pub parse: ParseOptions,
    /// Working directory to resolve relative paths against.
    pub cwd: Option<String>,
    pub format: OutputFormat,
    pub group: bool,
    pub color: bool,
}

impl Default for ZigEConfig {
    fn default() -> Self {
        ZigEConfig {
            parse: ParseOptions::default(),
            cwd: None,
            format: OutputFormat::default(),
            group: false,
            color: true,
        }
    }
}

/// Looks for `zig-e.toml` in `start` and then in each of its ancestors.
pub fn locate_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

pub fn load_config(path: &Path) -> Result<ZigEConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config {}", path.display()))
}

/// Parses the contents of a `zig-e.toml`.
///
/// ```
/// use zig_e::e_config::parse_config;
/// use zig_e::Dialect;
///
/// let config = parse_config("[parser]\ndialect = \"build\"\n").unwrap();
/// assert_eq!(config.parse.dialect, Dialect::Build);
/// ```
pub fn parse_config(contents: &str) -> Result<ZigEConfig> {
    let root: Table = contents.parse()?;
    let mut config = ZigEConfig::default();

    if let Some(parser) = section(&root, "parser")? {
        if let Some(dialect) = parsed::<Dialect>(parser, "parser", "dialect")? {
            config.parse.dialect = dialect;
        }
        if let Some(policy) =
            parsed::<UnattributedPolicy>(parser, "parser", "unattributed_headers")?
        {
            config.parse.unattributed = policy;
        }
        if let Some(cwd) = string(parser, "parser", "cwd")? {
            config.cwd = Some(cwd.to_string());
        }
    }

    if let Some(output) = section(&root, "output")? {
        if let Some(format) = parsed::<OutputFormat>(output, "output", "format")? {
            config.format = format;
        }
        if let Some(group) = boolean(output, "output", "group")? {
            config.group = group;
        }
        if let Some(color) = boolean(output, "output", "color")? {
            config.color = color;
        }
    }

    log::debug!("loaded config: {:?}", config);
    Ok(config)
}

fn section<'a>(root: &'a Table, name: &str) -> Result<Option<&'a Table>> {
    match root.get(name) {
        None => Ok(None),
        Some(Value::Table(table)) => Ok(Some(table)),
        Some(_) => Err(anyhow!("[{}] must be a table", name)),
    }
}

fn string<'a>(table: &'a Table, section: &str, key: &str) -> Result<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(anyhow!("{}.{} must be a string", section, key)),
    }
}

fn boolean(table: &Table, section: &str, key: &str) -> Result<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Boolean(b)) => Ok(Some(*b)),
        Some(_) => Err(anyhow!("{}.{} must be true or false", section, key)),
    }
}

fn parsed<T>(table: &Table, section: &str, key: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    match string(table, section, key)? {
        None => Ok(None),
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{}.{}: {}", section, key, e)),
    }
}
