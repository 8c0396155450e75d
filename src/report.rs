// src/report.rs

use std::fmt;
use std::path::Path;

use crate::run::Run;
use crate::sample::Sample;

const RULE: &str = "==========================================";

/// Plain-text summary of a run, generated on demand via `Display`.
pub struct RunReport<'a> {
    run: &'a Run,
}

impl<'a> RunReport<'a> {
    pub fn new(run: &'a Run) -> Self {
        Self { run }
    }
}

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let run = self.run;
        if let Some(dir) = run.run_dir() {
            writeln!(f, "Run dir: {}", dir.display())?;
        }
        if let Some(info) = run.run_info() {
            write!(f, "{info}")?;
        }
        if !run.is_valid() {
            return writeln!(f, "Run not loaded: {:?}", run.status());
        }
        if let Some(definition) = run.run_definition() {
            writeln!(f, "Run definition fields: {}", definition.fields().join(", "))?;
        }
        writeln!(f, "Slide layout: {}", run.slide_layout())?;

        for sample in run.samples() {
            write_sample(f, sample)?;
        }
        Ok(())
    }
}

fn write_sample(f: &mut fmt::Formatter, sample: &Sample) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "Sample: {sample}")?;
    writeln!(f, "{RULE}")?;

    writeln!(f, "{} Libraries:", sample.libraries().len())?;
    for library in sample.libraries() {
        writeln!(f, "{library}")?;
        for file in [library.csfasta(), library.qual()].into_iter().flatten() {
            writeln!(f, "\t...{}{}", std::path::MAIN_SEPARATOR, basename(file))?;
        }
        if let Some(stats) = sample.barcode_stats() {
            if let Some(row) = stats.row_for_library(library.name()) {
                writeln!(f, "\t{}", stats.header().join("\t"))?;
                writeln!(f, "\t{}", row.join("\t"))?;
            }
        }
    }

    writeln!(f, "{} Project(s):", sample.projects().len())?;
    for project in sample.projects() {
        writeln!(
            f,
            "\t{}\t{}\tbarcoded={}",
            project.display_name(sample).unwrap_or(project.name()),
            project.library_name_pattern().unwrap_or_default(),
            project.is_barcoded(sample).unwrap_or(false)
        )?;
    }

    match sample.barcode_stats().and_then(|s| s.all_beads()) {
        Some(row) => writeln!(f, "\t{}", row.join("\t")),
        None => writeln!(f, "\tBarcode statistics not available for {sample}"),
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_report_for_run() {
        let tmp = tempfile::tempdir().unwrap();
        let run_dir = tmp.path().join("solid0123_20130426_FRAG_BC");
        let libraries = run_dir.join("DR_pool").join("results.F1B1").join("libraries");
        let reads = libraries.join("DR1").join("primary.1").join("reads");
        fs::create_dir_all(&reads).unwrap();
        for sub in ["reject", "reports"] {
            fs::create_dir_all(libraries.join("DR1").join("primary.1").join(sub)).unwrap();
        }
        fs::write(reads.join("DR1_F3_x.csfasta"), "").unwrap();
        fs::write(reads.join("DR1_F3_x_QV.qual"), "").unwrap();
        symlink("results.F1B1", run_dir.join("DR_pool").join("results")).unwrap();
        fs::write(
            libraries.join("BarcodeStatistics.txt"),
            "##Library\tTotal\nDR1\t10\nAll Beads\t10\n",
        )
        .unwrap();
        fs::write(
            run_dir.join("solid0123_20130426_FRAG_BC_run_definition.txt"),
            "sampleName\tlibrary\tbarcodes\nDR_pool\tDR1\t\"1\"\n",
        )
        .unwrap();

        let run = Run::load(&run_dir);
        let report = RunReport::new(&run).to_string();
        assert!(report.contains("Instrument: solid0123"));
        assert!(report.contains("Run definition fields: sampleName, library, barcodes"));
        assert!(report.contains("Slide layout: Whole slide"));
        assert!(report.contains("Sample: DR_pool"));
        assert!(report.contains("1 Libraries:"));
        assert!(report.contains("DR1_F3_x.csfasta"));
        assert!(report.contains("\tDR1\t10\n"));
        assert!(report.contains("\tAll Beads\t10\n"));
        assert!(report.contains("\tDR_pool\tDR1\tbarcoded=true"));
    }

    #[test]
    fn test_report_for_missing_run() {
        let tmp = tempfile::tempdir().unwrap();
        let run = Run::load(tmp.path().join("solid0123_20130426"));
        let report = RunReport::new(&run).to_string();
        assert!(report.contains("Run not loaded: DirectoryNotFound"));
    }
}
