//! # zig-e
//!
//! `zig-e` reads the captured output of `zig test` or `zig build test` and
//! prints the problems it finds as `file:line:col: severity: message`, JSON,
//! or a table.
//!
//! ## Quick Start
//! ```sh
//! zig test src/main.zig 2> out.txt
//! zig-e out.txt --cwd "$PWD"
//! ```

use clap::Parser;
use std::process::exit;
use zig_e::e_runner::{run, EXIT_FAILURE};
use zig_e::Cli;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();
    if cli.version {
        zig_e::e_cli::print_version_and_features();
        exit(0);
    }

    match run(&cli) {
        Ok(status) => exit(status),
        Err(e) => {
            eprintln!("error: {:#}", e);
            exit(EXIT_FAILURE);
        }
    }
}
