mod cli;
mod logging;

use std::fs;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};

use lut::{InstructionSet, render, source};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref())?;

    info!("lutgen v{}", env!("CARGO_PKG_VERSION"));

    let arm = source::load(&cli.data_dir, InstructionSet::Arm).context("loading ARM slots")?;
    let thumb =
        source::load(&cli.data_dir, InstructionSet::Thumb).context("loading THUMB slots")?;

    let tables = lut::build(&arm, &thumb).context("building decode tables")?;

    for diagnostic in &tables.diagnostics {
        warn!("{diagnostic}");
    }

    if cli.deny_diagnostics && !tables.diagnostics.is_empty() {
        bail!(
            "{} slots need a placeholder, `{}` left untouched",
            tables.diagnostics.len(),
            cli.output.display()
        );
    }

    fs::write(&cli.output, render::render(&tables))
        .with_context(|| format!("writing `{}`", cli.output.display()))?;

    info!(
        arm = tables.arm.len(),
        thumb = tables.thumb.len(),
        placeholders = tables.arm.placeholder_count() + tables.thumb.placeholder_count(),
        "wrote {}",
        cli.output.display()
    );

    Ok(())
}
