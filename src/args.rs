use std::{
    error::Error,
    path::{
        Path,
        PathBuf,
    },
};

use clap::Parser;
use dirsweep::{
    SweepConfig,
    DEFAULT_WORKER_COUNT,
};

fn parse_worker_count(value: &str) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let count = value.parse::<usize>()?;
    if count == 0 {
        return Err("at least one worker is required".into());
    }

    Ok(count)
}

/// Find directories by name, show how much space they use and delete them
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Specify the root directory where dirsweep should search for targets.
    /// Note: This can be a relative path.
    #[arg(short, long, default_value = ".", verbatim_doc_comment)]
    pub root: PathBuf,

    /// Only list the directories and their size. Nothing will be deleted.
    #[arg(short, long)]
    pub dry_run: bool,

    /// Delete without asking for confirmation.
    #[arg(short = 'y', long = "yes")]
    pub assume_yes: bool,

    /// Do not show the warning to review the targets file.
    #[arg(long)]
    pub skip_warning: bool,

    /// Show access errors and what every worker is doing.
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum number of directories sized or deleted concurrently.
    #[arg(short, long, default_value_t = DEFAULT_WORKER_COUNT, value_parser = parse_worker_count)]
    pub workers: usize,

    /// File containing the directory names to delete, one per line.
    /// Empty lines and lines starting with # are ignored.
    #[arg(short, long, default_value = "targets.txt", verbatim_doc_comment)]
    pub targets: PathBuf,
}

impl Args {
    pub fn sweep_config(&self, root: &Path) -> SweepConfig {
        SweepConfig {
            root: root.to_owned(),
            dry_run: self.dry_run,
            assume_yes: self.assume_yes,
            workers: self.workers,
        }
    }
}
