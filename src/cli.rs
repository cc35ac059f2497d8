use std::path::PathBuf;

use clap::Parser;

/// Generates the ARM and THUMB decode lookup tables of the emulator core.
#[derive(Parser, Debug)]
#[command(name = "lutgen", version, about)]
pub struct Cli {
    /// Directory holding `arm-instruction-table.json` and
    /// `thumb-instruction-table.json`.
    #[arg(long, default_value = "scripts/data")]
    pub data_dir: PathBuf,

    /// Rust source file the tables are written to.
    #[arg(short, long, default_value = "arm/src/lookup.rs")]
    pub output: PathBuf,

    /// Fail without writing the output if any slot needed a placeholder.
    #[arg(long, default_value_t = false)]
    pub deny_diagnostics: bool,

    /// Also append logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
