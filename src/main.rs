use std::io::stdout;

use anyhow::Context;
use args::Args;
use clap::Parser;
use crossterm::style::Stylize;
use dirsweep::{
    resolve_root,
    Sweep,
    TargetNames,
};
use ui::{
    write_outcome,
    ConsoleReporter,
    StdinConfirm,
};

mod args;
mod ui;
mod utils;

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let root_path = resolve_root(&args.root).context("Invalid root path")?;
    log::debug!("Root path: {}", root_path.display());

    let targets = TargetNames::load(&args.targets).context("Error reading targets")?;

    println!("Searching for directories in: {}", root_path.display());
    println!("Target directories: {}", targets);
    if !args.skip_warning {
        println!(
            "{}",
            format!(
                "WARNING: Please review {} to ensure you're not accidentally targeting important directories.",
                args.targets.display()
            )
            .yellow()
        );
    }
    if args.dry_run {
        println!("{}", "DRY RUN MODE: No directories will be deleted.".cyan());
    }
    if args.verbose {
        println!("Verbose mode enabled");
        println!("Using {} concurrent workers", args.workers);
    }

    let sweep = Sweep::new(args.sweep_config(&root_path), targets);
    let mut reporter = ConsoleReporter::new(args.verbose);
    let outcome = sweep.run(&mut StdinConfirm, &mut reporter)?;
    reporter.flush_scan_errors();

    write_outcome(&mut stdout().lock(), &outcome)?;
    Ok(())
}
