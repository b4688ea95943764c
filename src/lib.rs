#![doc = include_str!("../README.md")]

// Re-export std common modules
pub mod prelude {
    pub use std::env;
    pub use std::fs;
    pub use std::io;
    pub use std::path::{Path, PathBuf};
    pub use log::{debug, error, info, trace, warn};
}

pub mod e_types;
pub use e_types::{group_by_file, Diagnostic, FileDiagnosticMap, Severity, StrategyKind};
pub mod e_grammar;
pub use e_grammar::Dialect;
pub mod e_paths;
pub use e_paths::resolve_file_path;
pub mod e_test_block;
pub mod e_build_error;
pub mod e_bare_panic;
pub mod e_dispatcher;
pub mod e_parser;
pub use e_parser::{parse, ParseOptions, ParseOutcome, UnattributedPolicy, ZigOutputParser};
pub mod e_config;
pub mod e_reports;
pub mod e_features;
pub mod e_cli;
pub use e_cli::Cli;
pub mod e_runner;
