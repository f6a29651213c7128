use std::{
    collections::HashMap,
    fs::{
        self,
        DirEntry,
    },
    io,
    path::{
        Path,
        PathBuf,
    },
};

use thiserror::Error;

use crate::DirEntryEx;

pub(crate) struct DirWalker {
    pending_entries: Vec<DirEntry>,
}

impl DirWalker {
    pub fn new() -> Self {
        Self {
            pending_entries: Vec::with_capacity(1024),
        }
    }

    pub fn next_item(&mut self) -> Option<DirEntry> {
        self.pending_entries.pop()
    }

    /// Queue all entries of `path`.
    /// Fails if the directory itself can not be read. Entries which could not be
    /// read are handed to `on_error` and skipped.
    pub fn insert_entries<F>(&mut self, path: &Path, mut on_error: F) -> io::Result<()>
    where
        F: FnMut(io::Error),
    {
        for entry in fs::read_dir(path)? {
            match entry {
                Ok(entry) => self.pending_entries.push(entry),
                Err(error) => on_error(error),
            }
        }

        Ok(())
    }
}

/// Result of a size estimation.
/// `bytes` is always the sum of everything which could be accessed.
#[derive(Debug, Default)]
pub struct SizeEstimate {
    pub bytes: u64,

    /// The first error encountered while walking the directory.
    pub error: Option<io::Error>,
}

impl SizeEstimate {
    fn record_error(&mut self, error: io::Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

/// Sum up the sizes of all non directory entries beneath `dir`.
/// Symbolic links are counted by their own size and never followed.
pub fn estimate_size(dir: &Path) -> SizeEstimate {
    let mut estimate = SizeEstimate::default();
    let mut walker = DirWalker::new();

    if let Err(error) = walker.insert_entries(dir, |error| estimate.record_error(error)) {
        log::debug!("Failed to read {}: {:#}", dir.display(), error);
        estimate.record_error(error);
        return estimate;
    }

    while let Some(current_entry) = walker.next_item() {
        if current_entry.is_dir() {
            let path = current_entry.path();
            if let Err(error) = walker.insert_entries(&path, |error| estimate.record_error(error)) {
                log::trace!("Skipping unreadable {}: {:#}", path.display(), error);
                estimate.record_error(error);
            }
            continue;
        }

        match current_entry.metadata() {
            Ok(meta) => estimate.bytes += meta.len(),
            Err(error) => estimate.record_error(error),
        }
    }

    estimate
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,

    /// The path did not exist anymore when the removal started.
    AlreadyAbsent,
}

#[derive(Error, Debug)]
#[error("{}: {source}", .path.display())]
pub struct RemoveError {
    /// Path of the first entry which could not be removed.
    pub path: PathBuf,
    pub source: io::Error,

    /// Total amount of entries which failed to be removed.
    pub failed: usize,
}

#[derive(Default)]
struct RemoveFailures {
    first: Option<(PathBuf, io::Error)>,
    failed: usize,
}

impl RemoveFailures {
    fn record(&mut self, path: &Path, error: io::Error) {
        /* Someone else removed it for us */
        if error.kind() == io::ErrorKind::NotFound {
            return;
        }

        log::trace!("Failed to remove {}: {:#}", path.display(), error);
        self.failed += 1;
        if self.first.is_none() {
            self.first = Some((path.to_owned(), error));
        }
    }

    fn into_result(self) -> Result<Removal, RemoveError> {
        match self.first {
            Some((path, source)) => Err(RemoveError {
                path,
                source,
                failed: self.failed,
            }),
            None => Ok(Removal::Removed),
        }
    }
}

/// Recursively remove `dir` and everything beneath it.
///
/// The removal does not stop at the first failure. Everything which can be removed
/// will be removed and the first failure is reported.
pub fn remove_directory(dir: &Path) -> Result<Removal, RemoveError> {
    let mut failures = RemoveFailures::default();

    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            /* Not a directory (anymore). Remove the entry itself. */
            if let Err(error) = fs::remove_file(dir) {
                failures.record(dir, error);
            }
            return failures.into_result();
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(Removal::AlreadyAbsent);
        }
        Err(error) => {
            failures.record(dir, error);
            return failures.into_result();
        }
    }

    /* Parents are always listed before their children */
    let mut directories = vec![dir.to_owned()];
    let mut pending = vec![dir.to_owned()];

    /* An unreadable directory may still be empty and removable */
    let mut unreadable = HashMap::new();

    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(error) => {
                unreadable.insert(current, error);
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    failures.record(&current, error);
                    continue;
                }
            };

            let path = entry.path();
            if entry.is_dir() {
                directories.push(path.clone());
                pending.push(path);
            } else if let Err(error) = fs::remove_file(&path) {
                failures.record(&path, error);
            }
        }
    }

    for directory in directories.iter().rev() {
        if let Err(error) = fs::remove_dir(directory) {
            let error = unreadable.remove(directory).unwrap_or(error);
            failures.record(directory, error);
        }
    }

    failures.into_result()
}
