// src/bin/cli.rs
use clap::Parser;
use color_eyre::eyre::{bail, Result};
use paper_pack::cli::{self, Cli};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    paper_pack::log::init(args.verbose);

    let summary = cli::run(args);
    let failed = summary.failures();
    if failed > 0 {
        bail!("{} of {} file(s) failed", failed, summary.files.len());
    }
    Ok(())
}
