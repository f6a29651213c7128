use std::{
    fmt,
    io,
    path::{
        Path,
        PathBuf,
    },
};

use crate::{
    Phase,
    RemoveError,
    Removal,
    ScanSummary,
    SizeEstimate,
};

/// A path which could not be accessed while searching for targets.
#[derive(Debug)]
pub struct ScanNotice {
    pub path: PathBuf,
    pub error: io::Error,
}

impl fmt::Display for ScanNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error accessing {}: {}", self.path.display(), self.error)
    }
}

/// Events emitted while a sweep progresses.
pub enum CrewReport<'a> {
    Phase(Phase),
    StatusInspecting(&'a Path),
    Found(&'a Path),
    ErrorFs(&'a ScanNotice),
    Sized {
        index: usize,
        path: &'a Path,
        estimate: &'a SizeEstimate,
    },
    /// All candidates have been sized. Emitted before asking for confirmation.
    Summary(&'a ScanSummary),
    Deleted {
        index: usize,
        path: &'a Path,
        result: &'a Result<Removal, RemoveError>,
    },
}

pub trait CrewReportConsumer {
    fn consume_report(&mut self, report: CrewReport<'_>);
}

pub struct VoidCrewReportConsumer;
impl CrewReportConsumer for VoidCrewReportConsumer {
    fn consume_report(&mut self, _report: CrewReport<'_>) {}
}
