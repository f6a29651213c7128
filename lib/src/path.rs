use std::{
    ffi::OsStr,
    fs::DirEntry,
    path::Path,
};

/// Utility functions for the systems path library
pub trait PathEx {
    /// Returns the final component of the path if it is valid UTF-8.
    /// Paths ending in `..` or consisting only of a root yield `None`.
    fn base_name(&self) -> Option<&str>;
}

impl PathEx for Path {
    fn base_name(&self) -> Option<&str> {
        self.file_name().and_then(OsStr::to_str)
    }
}

pub trait DirEntryEx {
    /// Tests if the entry is a real directory.
    /// Symbolic links are never reported as directories, even when they point to one.
    fn is_dir(&self) -> bool;
}

impl DirEntryEx for DirEntry {
    fn is_dir(&self) -> bool {
        self.file_type()
            .map_or(false, |file_type| file_type.is_dir())
    }
}
