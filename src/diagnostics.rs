// src/diagnostics.rs

//! Problems noticed while scanning a run directory.
//!
//! None of these stop a [`Run`](crate::run::Run) from being built; they are
//! kept on the run in the order they were found and echoed to the log.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Something expected on disk is not there.
    Absent,
    /// More than one candidate was found where one was expected.
    Ambiguous,
    /// Something is present but could not be used.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    RunDirectoryNotFound { path: PathBuf },
    MalformedRunName { name: String, reason: String },
    RunDefinitionNotFound { path: PathBuf },
    RunDefinitionUnreadable { path: PathBuf, reason: String },
    EmptyRunDefinition { path: PathBuf },
    MalformedRunDefinitionRow { row: usize, reason: String },
    LibrariesDirNotFound { sample: String },
    BarcodeStatisticsUnreadable { path: PathBuf, reason: String },
    PrimaryDataNotFound { sample: String, library: String },
    AmbiguousPrimaryData {
        sample: String,
        library: String,
        /// Candidate directories whose data was discarded.
        discarded: Vec<PathBuf>,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        use Diagnostic::*;
        match self {
            RunDirectoryNotFound { .. }
            | RunDefinitionNotFound { .. }
            | EmptyRunDefinition { .. }
            | LibrariesDirNotFound { .. }
            | PrimaryDataNotFound { .. } => DiagnosticKind::Absent,
            AmbiguousPrimaryData { .. } => DiagnosticKind::Ambiguous,
            MalformedRunName { .. }
            | RunDefinitionUnreadable { .. }
            | MalformedRunDefinitionRow { .. }
            | BarcodeStatisticsUnreadable { .. } => DiagnosticKind::Malformed,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Diagnostic::*;
        match self {
            RunDirectoryNotFound { path } => {
                write!(f, "run directory {} not found", path.display())
            }
            MalformedRunName { name, reason } => {
                write!(f, "unable to parse run name {name}: {reason}")
            }
            RunDefinitionNotFound { path } => {
                write!(f, "no run definition file {}", path.display())
            }
            RunDefinitionUnreadable { path, reason } => {
                write!(f, "unable to read run definition {}: {reason}", path.display())
            }
            EmptyRunDefinition { path } => {
                write!(f, "run definition {} has no data rows", path.display())
            }
            MalformedRunDefinitionRow { row, reason } => {
                write!(f, "skipping run definition row {row}: {reason}")
            }
            LibrariesDirNotFound { sample } => {
                write!(f, "no libraries directory for sample {sample}")
            }
            BarcodeStatisticsUnreadable { path, reason } => {
                write!(f, "unable to read barcode statistics {}: {reason}", path.display())
            }
            PrimaryDataNotFound { sample, library } => {
                write!(f, "unable to locate primary data for {sample}/{library}")
            }
            AmbiguousPrimaryData {
                sample,
                library,
                discarded,
            } => write!(
                f,
                "ambiguous location for primary data for {sample}/{library} ({} other candidate(s) ignored)",
                discarded.len()
            ),
        }
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Record a diagnostic and log it as a warning.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
