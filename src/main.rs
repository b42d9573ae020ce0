//! `globlink` command-line entry point.
use anyhow::Result;
use clap::Parser;

use globlink::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger;

    let report = commands::link::run(&args, &log)?;
    commands::finish(&report, &log, args.summary)
}
