use std::io::{
    self,
    Write,
};

use crossterm::style::Stylize;
use dirsweep::{
    ScanSummary,
    SweepOutcome,
    SweepReport,
};

use crate::utils::{
    format_duration,
    format_file_size,
};

/// Print the paths which could not be accessed while walking, grouped in one block.
pub fn write_scan_errors<W: Write>(out: &mut W, notices: &[String]) -> io::Result<()> {
    if notices.is_empty() {
        return Ok(());
    }

    writeln!(out, "\n{}", "Scan errors:".yellow())?;
    for notice in notices {
        writeln!(out, "   {}", notice)?;
    }
    Ok(())
}

pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &ScanSummary,
    verbose: bool,
) -> io::Result<()> {
    if verbose && !summary.size_errors.is_empty() {
        writeln!(out, "\n{}", "Size calculation errors:".yellow())?;
        for failure in &summary.size_errors {
            writeln!(out, "   {}", failure)?;
        }
    }

    writeln!(out, "\n{}", "Summary:".bold())?;
    writeln!(out, "   • Searched in: {}", summary.root.display())?;
    writeln!(out, "   • Directories found: {}", summary.candidates.len())?;
    writeln!(out, "   • Total size: {}", format_file_size(summary.total_size))?;
    writeln!(out, "   • Scan duration: {}", format_duration(&summary.elapsed))?;
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &SweepReport) -> io::Result<()> {
    if !report.failures.is_empty() {
        writeln!(out, "\n{}", "Deletion errors:".red())?;
        for failure in &report.failures {
            writeln!(out, "   {}", failure)?;
        }
    }

    writeln!(out, "\n{}", "Deletion results:".bold())?;
    writeln!(
        out,
        "   • Successfully deleted: {} out of {} directories",
        report.deleted, report.total
    )?;
    writeln!(out, "   • Freed space: {}", format_file_size(report.bytes_freed))?;
    writeln!(
        out,
        "   • Total operation time: {}",
        format_duration(&report.elapsed)
    )?;

    if report.deleted > 0 {
        writeln!(out, "{}", "Operation completed successfully!".green())
    } else {
        writeln!(out, "{}", "No directories were deleted.".red())
    }
}

pub fn write_outcome<W: Write>(out: &mut W, outcome: &SweepOutcome) -> io::Result<()> {
    match outcome {
        SweepOutcome::NoneFound { .. } => {
            writeln!(out, "{}", "No target directories found.".green())
        }
        SweepOutcome::DryRun(_) => {
            writeln!(out, "{}", "Dry run completed successfully.".green())
        }
        SweepOutcome::Cancelled(_) => {
            writeln!(out, "{}", "Operation cancelled by user.".yellow())
        }
        SweepOutcome::Swept { report, .. } => write_report(out, report),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        path::PathBuf,
        time::Duration,
    };

    use dirsweep::{
        Candidate,
        ScanNotice,
        DeleteFailure,
        RemoveError,
        SizeFailure,
    };

    use super::*;

    fn summary() -> ScanSummary {
        ScanSummary {
            root: PathBuf::from("/proj"),
            candidates: vec![
                Candidate {
                    path: PathBuf::from("/proj/node_modules"),
                    size: 5000,
                },
                Candidate {
                    path: PathBuf::from("/proj/sub/dist"),
                    size: 200,
                },
            ],
            notices: Vec::new(),
            size_errors: vec![SizeFailure {
                path: PathBuf::from("/proj/sub/dist"),
                error: io::Error::from(io::ErrorKind::PermissionDenied),
            }],
            total_size: 5200,
            elapsed: Duration::from_millis(1_500),
        }
    }

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn summary_lists_totals() {
        let text = render(|out| write_summary(out, &summary(), false));
        assert!(text.contains("Searched in: /proj\n"));
        assert!(text.contains("Directories found: 2"));
        assert!(text.contains("Total size: 5.1 KiB"));
        assert!(text.contains("Scan duration: 1.500s"));
        assert!(!text.contains("/proj/sub/dist"));
    }

    #[test]
    fn scan_errors_are_grouped() {
        let notices = vec![
            ScanNotice {
                path: PathBuf::from("/proj/locked"),
                error: io::Error::from(io::ErrorKind::PermissionDenied),
            },
            ScanNotice {
                path: PathBuf::from("/proj/gone"),
                error: io::Error::from(io::ErrorKind::NotFound),
            },
        ]
        .iter()
        .map(ScanNotice::to_string)
        .collect::<Vec<_>>();

        let text = render(|out| write_scan_errors(out, &notices));
        let lines = text.lines().collect::<Vec<_>>();
        assert!(lines[1].contains("Scan errors:"));
        assert!(lines[2].starts_with("   Error accessing /proj/locked: "));
        assert!(lines[3].starts_with("   Error accessing /proj/gone: "));
        assert_eq!(lines.len(), 4);

        assert!(render(|out| write_scan_errors(out, &[])).is_empty());
    }

    #[test]
    fn verbose_summary_lists_size_errors() {
        let text = render(|out| write_summary(out, &summary(), true));
        assert!(text.contains("Could not calculate size of /proj/sub/dist"));
    }

    #[test]
    fn report_lists_failures() {
        let outcome = SweepOutcome::Swept {
            summary: summary(),
            report: SweepReport {
                total: 2,
                deleted: 1,
                bytes_freed: 5000,
                failures: vec![DeleteFailure {
                    path: PathBuf::from("/proj/sub/dist"),
                    error: RemoveError {
                        path: PathBuf::from("/proj/sub/dist/app.js"),
                        source: io::Error::from(io::ErrorKind::PermissionDenied),
                        failed: 1,
                    },
                }],
                elapsed: Duration::from_secs(2),
            },
        };

        let text = render(|out| write_outcome(out, &outcome));
        assert!(text.contains("/proj/sub/dist: /proj/sub/dist/app.js"));
        assert!(text.contains("Successfully deleted: 1 out of 2 directories"));
        assert!(text.contains("Freed space: 4.9 KiB"));
        assert!(text.contains("Operation completed successfully!"));
    }

    #[test]
    fn nothing_deleted() {
        let outcome = SweepOutcome::Swept {
            summary: summary(),
            report: SweepReport {
                total: 2,
                deleted: 0,
                bytes_freed: 0,
                failures: Vec::new(),
                elapsed: Duration::ZERO,
            },
        };

        let text = render(|out| write_outcome(out, &outcome));
        assert!(text.contains("No directories were deleted."));
    }

    #[test]
    fn terminal_states() {
        let text = render(|out| {
            write_outcome(
                out,
                &SweepOutcome::NoneFound {
                    notices: Vec::new(),
                },
            )
        });
        assert!(text.contains("No target directories found."));

        let text = render(|out| write_outcome(out, &SweepOutcome::Cancelled(summary())));
        assert!(text.contains("Operation cancelled by user."));
    }
}
