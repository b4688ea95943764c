use crate::e_grammar::Dialect;
use crate::e_parser::UnattributedPolicy;
use crate::e_reports::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "zig-e is for Errors. Turns captured zig test/build output into file-addressed problems.", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version and feature flags in JSON format.
    #[arg(
        long,
        short = 'v',
        help = "Print version and feature flags in JSON format."
    )]
    pub version: bool,

    #[arg(help = "File holding the captured zig output; '-' or nothing reads stdin.")]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        help = "Directory zig ran in; relative paths are resolved against it. (default: config, then current dir)"
    )]
    pub cwd: Option<String>,

    #[arg(long, help = "Output dialect: legacy or build. (default: legacy)")]
    pub dialect: Option<Dialect>,

    #[arg(
        long,
        help = "Failing tests without a matching frame: drop or report. (default: drop)"
    )]
    pub unattributed: Option<UnattributedPolicy>,

    #[arg(long, short = 'f', help = "Output format: text, json or table. (default: text)")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'g', help = "Group JSON output by file.")]
    pub group: bool,

    #[arg(long, help = "Disable colored severities in text output.")]
    pub no_color: bool,

    #[arg(long, short = 'c', help = "Use this config file instead of searching for zig-e.toml.")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "The captured process failed; echo the raw output when nothing was recognized."
    )]
    pub failed: bool,

    #[arg(long, short = 's', help = "Print a one-line summary to stderr.")]
    pub summary: bool,
}

/// Print the version and the JSON array of feature flags.
pub fn print_version_and_features() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown");
    println!("zig-e {}", version);
    println!("{}", crate::e_features::get_feature_flags_json());
}
