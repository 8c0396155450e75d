// src/lib.rs

//! Extract data about SOLiD sequencer runs from their directory structure,
//! data files and naming conventions.
//!
//! A [`Run`] contains samples, each sample one or more libraries, using the
//! same terminology as the files produced by the instrument. Libraries within
//! a sample are grouped into projects by the experimenter's initials.

pub mod barcode_stats;
pub mod delimited;
pub mod diagnostics;
pub mod errors;
pub mod library;
pub mod naming;
pub mod report;
pub mod run;
pub mod run_definition;
pub mod run_info;
pub mod sample;

use rayon::prelude::*;
use std::path::PathBuf;

pub use crate::barcode_stats::BarcodeStatistics;
pub use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use crate::errors::{Error, Result};
pub use crate::library::Library;
pub use crate::report::RunReport;
pub use crate::run::{Run, RunStatus, SlideLayout};
pub use crate::run_definition::RunDefinition;
pub use crate::run_info::RunInfo;
pub use crate::sample::{Project, Sample, SampleId};

/// Load several run directories in parallel.
///
/// Each run is scanned independently; the result keeps the input order.
pub fn load_runs(run_dirs: &[PathBuf]) -> Vec<Run> {
    run_dirs.par_iter().map(Run::load).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_runs_keeps_order() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("solid0123_20130426");
        fs::create_dir(&good).unwrap();
        fs::write(
            good.join("solid0123_20130426_run_definition.txt"),
            "sampleName\tlibrary\nS1\tPB1\n",
        )
        .unwrap();
        let missing = tmp.path().join("solid0456_20130427");

        let runs = load_runs(&[missing, good.clone()]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].status(), RunStatus::DirectoryNotFound);
        assert!(runs[1].is_valid());
        assert_eq!(runs[1].run_dir(), Some(good.as_path()));
        assert_eq!(runs[1].fetch_libraries("S1", "PB*").len(), 1);
    }
}
