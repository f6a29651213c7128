use std::{
    fmt,
    io,
    path::{
        Path,
        PathBuf,
    },
    time::{
        Duration,
        Instant,
    },
};

use thiserror::Error;

use crate::{
    estimate_size,
    remove_directory,
    CrewReport,
    CrewReportConsumer,
    RemoveError,
    Removal,
    ScanNotice,
    SweeperCrew,
    TargetNames,
    WorkerPool,
    DEFAULT_WORKER_COUNT,
};

/// Immutable settings of a single sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub root: PathBuf,

    /// Only search and size the targets. Nothing will be deleted.
    pub dry_run: bool,

    /// Delete without asking for confirmation.
    pub assume_yes: bool,

    pub workers: usize,
}

impl SweepConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            assume_yes: false,
            workers: DEFAULT_WORKER_COUNT,
        }
    }
}

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("path does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("invalid path {}: {source}", .path.display())]
    RootUnresolvable { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Walking,
    Sizing,
    Summarized,
    Confirming,
    Deleting,
    Reported,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Walking => "walking",
            Self::Sizing => "sizing",
            Self::Summarized => "summarized",
            Self::Confirming => "confirming",
            Self::Deleting => "deleting",
            Self::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// A directory matching one of the target names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,

    /// Best effort size in bytes. Inaccessible parts are not included.
    pub size: u64,
}

#[derive(Debug)]
pub struct SizeFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

impl fmt::Display for SizeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not calculate size of {}: {}",
            self.path.display(),
            self.error
        )
    }
}

#[derive(Debug)]
pub struct DeleteFailure {
    pub path: PathBuf,
    pub error: RemoveError,
}

impl fmt::Display for DeleteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

#[derive(Debug)]
pub struct ScanSummary {
    pub root: PathBuf,
    pub candidates: Vec<Candidate>,
    pub notices: Vec<ScanNotice>,
    pub size_errors: Vec<SizeFailure>,
    pub total_size: u64,

    /// Time spent from the start of the sweep until all sizes were known.
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct SweepReport {
    pub total: usize,
    pub deleted: usize,
    pub bytes_freed: u64,
    pub failures: Vec<DeleteFailure>,

    /// Time spent from the start of the sweep until all deletions finished.
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum SweepOutcome {
    NoneFound {
        notices: Vec<ScanNotice>,
    },
    DryRun(ScanSummary),
    Cancelled(ScanSummary),
    Swept {
        summary: ScanSummary,
        report: SweepReport,
    },
}

/// Asked once before anything gets deleted.
pub trait Confirm {
    fn confirm(&mut self, summary: &ScanSummary) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ScanSummary) -> bool,
{
    fn confirm(&mut self, summary: &ScanSummary) -> bool {
        self(summary)
    }
}

/// Resolve `path` into an absolute, existing directory.
pub fn resolve_root(path: &Path) -> Result<PathBuf, SweepError> {
    let root = match dunce::canonicalize(path) {
        Ok(root) => root,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(SweepError::RootMissing(path.to_owned()));
        }
        Err(source) => {
            return Err(SweepError::RootUnresolvable {
                path: path.to_owned(),
                source,
            });
        }
    };

    if !root.is_dir() {
        return Err(SweepError::RootNotDirectory(root));
    }

    Ok(root)
}

/// Runs the walk, size and delete phases of a single sweep.
pub struct Sweep {
    config: SweepConfig,
    targets: TargetNames,
    pool: WorkerPool,
}

impl Sweep {
    pub fn new(config: SweepConfig, targets: TargetNames) -> Self {
        let pool = WorkerPool::new(config.workers);
        Self {
            config,
            targets,
            pool,
        }
    }

    pub fn run(
        &self,
        confirm: &mut dyn Confirm,
        report_consumer: &mut dyn CrewReportConsumer,
    ) -> Result<SweepOutcome, SweepError> {
        let time_started = Instant::now();

        report_consumer.consume_report(CrewReport::Phase(Phase::Validating));
        let root = resolve_root(&self.config.root)?;
        log::debug!("Root path: {}", root.display());

        report_consumer.consume_report(CrewReport::Phase(Phase::Walking));
        let search = SweeperCrew::new(&self.targets).search(&root, report_consumer);
        log::debug!(
            "Search finished with {} targets and {} notices",
            search.candidates.len(),
            search.notices.len()
        );

        if search.candidates.is_empty() {
            return Ok(SweepOutcome::NoneFound {
                notices: search.notices,
            });
        }

        report_consumer.consume_report(CrewReport::Phase(Phase::Sizing));
        let summary = self.size_candidates(
            root,
            search.candidates,
            search.notices,
            time_started,
            report_consumer,
        );

        report_consumer.consume_report(CrewReport::Phase(Phase::Summarized));
        report_consumer.consume_report(CrewReport::Summary(&summary));
        if self.config.dry_run {
            return Ok(SweepOutcome::DryRun(summary));
        }

        if !self.config.assume_yes {
            report_consumer.consume_report(CrewReport::Phase(Phase::Confirming));
            if !confirm.confirm(&summary) {
                log::debug!("Sweep cancelled");
                return Ok(SweepOutcome::Cancelled(summary));
            }
        }

        report_consumer.consume_report(CrewReport::Phase(Phase::Deleting));
        let report = self.delete_candidates(&summary.candidates, time_started, report_consumer);

        report_consumer.consume_report(CrewReport::Phase(Phase::Reported));
        Ok(SweepOutcome::Swept { summary, report })
    }

    fn size_candidates(
        &self,
        root: PathBuf,
        paths: Vec<PathBuf>,
        notices: Vec<ScanNotice>,
        time_started: Instant,
        report_consumer: &mut dyn CrewReportConsumer,
    ) -> ScanSummary {
        let results = self.pool.map(
            &paths,
            |worker, path| {
                log::debug!("Worker {}: calculating size for {}", worker, path.display());
                estimate_size(path)
            },
            |completed| {
                report_consumer.consume_report(CrewReport::Sized {
                    index: completed.index,
                    path: &paths[completed.index],
                    estimate: &completed.output,
                })
            },
        );

        let mut candidates = Vec::with_capacity(paths.len());
        let mut size_errors = Vec::new();
        let mut total_size = 0;
        for (path, completed) in paths.into_iter().zip(results) {
            let estimate = completed.output;
            if let Some(error) = estimate.error {
                log::debug!("Partial size for {}: {:#}", path.display(), error);
                size_errors.push(SizeFailure {
                    path: path.clone(),
                    error,
                });
            }

            total_size += estimate.bytes;
            candidates.push(Candidate {
                path,
                size: estimate.bytes,
            });
        }

        ScanSummary {
            root,
            candidates,
            notices,
            size_errors,
            total_size,
            elapsed: time_started.elapsed(),
        }
    }

    fn delete_candidates(
        &self,
        candidates: &[Candidate],
        time_started: Instant,
        report_consumer: &mut dyn CrewReportConsumer,
    ) -> SweepReport {
        let results = self.pool.map(
            candidates,
            |worker, candidate| {
                log::debug!("Worker {}: deleting {}", worker, candidate.path.display());
                remove_directory(&candidate.path)
            },
            |completed| {
                report_consumer.consume_report(CrewReport::Deleted {
                    index: completed.index,
                    path: &candidates[completed.index].path,
                    result: &completed.output,
                })
            },
        );

        let mut report = SweepReport {
            total: candidates.len(),
            deleted: 0,
            bytes_freed: 0,
            failures: Vec::new(),
            elapsed: Duration::ZERO,
        };

        for completed in results {
            let candidate = &candidates[completed.index];
            match completed.output {
                Ok(removal) => {
                    if removal == Removal::AlreadyAbsent {
                        log::info!("{} has already been removed", candidate.path.display());
                    }
                    report.deleted += 1;
                    report.bytes_freed += candidate.size;
                }
                Err(error) => {
                    log::warn!("Failed to remove {}: {:#}", candidate.path.display(), error);
                    report.failures.push(DeleteFailure {
                        path: candidate.path.clone(),
                        error,
                    });
                }
            }
        }

        report.elapsed = time_started.elapsed();
        report
    }
}
