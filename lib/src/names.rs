use std::{
    fmt,
    fs::File,
    io::{
        self,
        BufRead,
        BufReader,
    },
    path::{
        Path,
        PathBuf,
    },
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetsError {
    #[error("could not open targets file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("error reading targets file: {0}")]
    Read(#[from] io::Error),

    #[error("no valid targets found in {source_name}")]
    Empty { source_name: String },
}

/// The ordered set of directory names which should be swept.
///
/// A `TargetNames` value always holds at least one name. Names never contain
/// surrounding whitespace and never start with `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetNames {
    names: Vec<String>,
}

impl TargetNames {
    /// Load the target names from a line oriented file.
    pub fn load(path: &Path) -> Result<Self, TargetsError> {
        let file = File::open(path).map_err(|source| TargetsError::Open {
            path: path.to_owned(),
            source,
        })?;

        Self::read_lines(BufReader::new(file), &path.display().to_string())
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TargetsError> {
        Self::read_lines(reader, "input")
    }

    pub fn parse(text: &str) -> Result<Self, TargetsError> {
        Self::from_reader(text.as_bytes())
    }

    /// Build a target set from already known names.
    /// The same filtering as for files applies.
    pub fn from_names<I, S>(names: I) -> Result<Self, TargetsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = Self { names: Vec::new() };
        for name in names {
            result.push_line(name.as_ref());
        }

        result.ensure_not_empty("input")
    }

    fn read_lines<R: BufRead>(reader: R, source_name: &str) -> Result<Self, TargetsError> {
        let mut result = Self { names: Vec::new() };
        for line in reader.lines() {
            result.push_line(&line?);
        }

        result.ensure_not_empty(source_name)
    }

    fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        if self.contains(line) {
            log::debug!("Ignoring duplicated target name {}", line);
            return;
        }

        self.names.push(line.to_string());
    }

    fn ensure_not_empty(self, source_name: &str) -> Result<Self, TargetsError> {
        if self.names.is_empty() {
            return Err(TargetsError::Empty {
                source_name: source_name.to_string(),
            });
        }

        Ok(self)
    }

    /// Exact, case sensitive name comparison.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|target| target == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for TargetNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(", "))
    }
}
