use std::io;

use crossterm::style::Stylize;
use dirsweep::{
    CrewReport,
    CrewReportConsumer,
    Phase,
};
use indicatif::{
    ProgressBar,
    ProgressStyle,
};

use super::{
    write_scan_errors,
    write_summary,
};

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
        .map(|style| style.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Prints the sweep progress to the terminal.
pub struct ConsoleReporter {
    verbose: bool,
    found: usize,
    progress: Option<ProgressBar>,

    /// Scan notices collected during the walk, printed once the walk finished.
    scan_errors: Vec<String>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            found: 0,
            progress: None,
            scan_errors: Vec::new(),
        }
    }

    /// Print pending scan notices. Called once the walk has finished, and after the
    /// sweep for walks which found nothing.
    pub fn flush_scan_errors(&mut self) {
        if self.scan_errors.is_empty() {
            return;
        }

        let scan_errors = std::mem::take(&mut self.scan_errors);
        if let Err(error) = write_scan_errors(&mut io::stdout().lock(), &scan_errors) {
            log::warn!("Failed to print scan errors: {:#}", error);
        }
    }

    fn start_progress(&mut self, message: &'static str) {
        let progress = ProgressBar::new(self.found as u64);
        progress.set_style(progress_style());
        progress.set_message(message);
        self.progress = Some(progress);
    }

    fn advance_progress(&self) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }

    fn finish_progress(&mut self) {
        if let Some(progress) = self.progress.take() {
            progress.finish_and_clear();
        }
    }

    /// Print a line without tearing the progress bar.
    fn println(&self, line: String) {
        match &self.progress {
            Some(progress) => progress.println(line),
            None => println!("{}", line),
        }
    }
}

impl CrewReportConsumer for ConsoleReporter {
    fn consume_report(&mut self, report: CrewReport<'_>) {
        match report {
            CrewReport::Phase(phase) => {
                log::trace!("Entering phase {}", phase);
                match phase {
                    Phase::Sizing => {
                        self.flush_scan_errors();
                        println!("\n{}", "Calculating directory sizes...".bold());
                        self.start_progress("Sizing directories...");
                    }
                    Phase::Deleting => {
                        println!("\n{}", "Starting deletion process...".bold());
                        self.start_progress("Deleting directories...");
                    }
                    Phase::Summarized | Phase::Reported => self.finish_progress(),
                    _ => {}
                }
            }
            CrewReport::StatusInspecting(path) => {
                log::trace!("Inspecting {}", path.display());
            }
            CrewReport::Found(path) => {
                self.found += 1;
                println!("{} {}", "Found:".green(), path.display());
            }
            CrewReport::ErrorFs(notice) => {
                log::debug!("{}", notice);
                if self.verbose {
                    self.scan_errors.push(notice.to_string());
                }
            }
            CrewReport::Sized { path, estimate, .. } => {
                log::debug!(
                    "Size of {} is {} bytes",
                    path.display(),
                    estimate.bytes
                );
                self.advance_progress();
            }
            CrewReport::Summary(summary) => {
                if let Err(error) = write_summary(&mut io::stdout().lock(), summary, self.verbose) {
                    log::warn!("Failed to print summary: {:#}", error);
                }
            }
            CrewReport::Deleted { path, result, .. } => {
                let status = match result {
                    Ok(_) => format!("{}", "Done.".green()),
                    Err(error) => format!("{}", format!("ERROR: {}", error).red()),
                };
                self.println(format!("Deleting: {} {}", path.display(), status));
                self.advance_progress();
            }
        }
    }
}
