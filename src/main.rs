use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    fandom_stats::logging::init().context("init logging")?;

    let cli = fandom_stats::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    fandom_stats::scrape::run(cli).context("scrape")?;

    Ok(())
}
