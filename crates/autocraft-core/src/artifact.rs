//! Generated artifacts and the status lines reported for them.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::write_file;

/// A text file produced by a generator, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
    pub overwrite: bool,
}

impl Artifact {
    /// An artifact that replaces whatever is at `path`.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            overwrite: true,
        }
    }

    /// Keep an existing file instead of replacing it.
    pub fn keep_existing(mut self) -> Self {
        self.overwrite = false;
        self
    }

    /// Write the artifact, creating parent directories as needed.
    pub fn write(&self) -> crate::Result<WriteOutcome> {
        write_file(&self.path, &self.content, self.overwrite)
    }
}

/// What happened to a single target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content written; `bytes` is the UTF-8 length.
    Wrote { path: PathBuf, bytes: usize },
    /// Path already existed and was left untouched.
    Skipped { path: PathBuf },
    /// Directory created by the repository scaffolder.
    CreatedDir { path: PathBuf },
    /// Empty placeholder file created by the repository scaffolder.
    CreatedFile { path: PathBuf },
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Wrote { path, .. }
            | Self::Skipped { path }
            | Self::CreatedDir { path }
            | Self::CreatedFile { path } => path,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wrote { path, bytes } => write!(f, "[WROTE] {} ({} bytes)", path.display(), bytes),
            Self::Skipped { path } => write!(f, "[SKIPPED] {} already exists", path.display()),
            Self::CreatedDir { path } => write!(f, "[DIR] {}", path.display()),
            Self::CreatedFile { path } => write!(f, "[FILE] {}", path.display()),
        }
    }
}

/// Ordered outcomes of one tool invocation.
///
/// The text form is one status line per outcome, in emission order, which is
/// what the orchestration layer receives as the tool result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<WriteOutcome>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: WriteOutcome) {
        self.outcomes.push(outcome);
    }

    /// Append every outcome of another report.
    pub fn append(&mut self, other: Report) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn outcomes(&self) -> &[WriteOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Whether every reported path was skipped.
    pub fn all_skipped(&self) -> bool {
        self.outcomes.iter().all(WriteOutcome::is_skipped)
    }
}

impl From<WriteOutcome> for Report {
    fn from(outcome: WriteOutcome) -> Self {
        Self {
            outcomes: vec![outcome],
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}
