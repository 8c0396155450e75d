// src/run.rs

//! The run model: walks a SOLiD run directory and builds the
//! sample/library/project graph from the run definition file, the
//! `results` links and the primary data directories.

use ahash::AHashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::barcode_stats::{BarcodeStatistics, BARCODE_STATISTICS_PREFIX};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::library::Library;
use crate::naming::matches_pattern;
use crate::run_definition::{RunDefinition, RUN_DEFINITION_SUFFIX};
use crate::run_info::RunInfo;
use crate::sample::{Project, Sample, SampleId};

/// Per-sample link to the actual results directory.
pub const RESULTS_LINK: &str = "results";
pub const LIBRARIES_DIR: &str = "libraries";
/// A primary data directory must hold all of these.
pub const PRIMARY_DATA_SUBDIRS: [&str; 3] = ["reject", "reads", "reports"];
pub const READS_DIR: &str = "reads";
pub const CSFASTA_EXT: &str = "csfasta";
pub const QUAL_EXT: &str = "qual";
/// Primary data file names for barcoded libraries must contain this.
pub const F3_MARKER: &str = "_F3_";

/// How far loading a run directory got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Valid,
    DirectoryNotFound,
    MalformedName,
    NoRunDefinition,
    EmptyRunDefinition,
}

/// Slide layout implied by the number of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayout {
    WholeSlide,
    Quads,
    Octets,
    Undefined(usize),
}

impl SlideLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideLayout::WholeSlide => "Whole slide",
            SlideLayout::Quads => "Quads",
            SlideLayout::Octets => "Octets",
            SlideLayout::Undefined(_) => "Undefined layout",
        }
    }
}

impl fmt::Display for SlideLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A SOLiD run, e.g. `/path/to/SOLiD/data/solid0123_20130426_FRAG_BC`.
///
/// Built once by [`Run::load`] and read-only afterwards. A run that could
/// not be loaded is still returned; check [`Run::is_valid`] and
/// [`Run::status`] before relying on its contents.
#[derive(Debug, Clone)]
pub struct Run {
    run_dir: Option<PathBuf>,
    run_name: Option<String>,
    run_info: Option<RunInfo>,
    run_definition: Option<RunDefinition>,
    samples: Vec<Sample>,
    status: RunStatus,
    diagnostics: Diagnostics,
}

/// Outcome of looking for a library's `.csfasta`/`.qual` pair.
#[derive(Debug, Default)]
struct PrimaryDataSearch {
    found: Option<(PathBuf, PathBuf)>,
    /// Further qualifying directories that also had a complete pair.
    discarded: Vec<PathBuf>,
}

impl Run {
    /// Scan a run directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut run = Self {
            run_dir: None,
            run_name: None,
            run_info: None,
            run_definition: None,
            samples: Vec::new(),
            status: RunStatus::DirectoryNotFound,
            diagnostics: Diagnostics::default(),
        };

        let dir = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        if !dir.is_dir() {
            run.diagnostics
                .push(Diagnostic::RunDirectoryNotFound { path: dir });
            return run;
        }
        log::debug!("Loading run from {}", dir.display());

        run.status = RunStatus::MalformedName;
        let name = match dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                run.diagnostics.push(Diagnostic::MalformedRunName {
                    name: dir.display().to_string(),
                    reason: "directory has no final component".to_string(),
                });
                run.run_dir = Some(dir);
                return run;
            }
        };
        run.run_dir = Some(dir.clone());
        run.run_name = Some(name.clone());

        match RunInfo::parse(&name) {
            Ok(info) => run.run_info = Some(info),
            Err(e) => {
                run.diagnostics.push(Diagnostic::MalformedRunName {
                    name,
                    reason: e.to_string(),
                });
                return run;
            }
        }

        run.status = RunStatus::NoRunDefinition;
        let defn_path = dir.join(format!("{name}{RUN_DEFINITION_SUFFIX}"));
        if !defn_path.is_file() {
            run.diagnostics
                .push(Diagnostic::RunDefinitionNotFound { path: defn_path });
            return run;
        }
        let definition = match RunDefinition::from_path(&defn_path) {
            Ok(definition) => definition,
            Err(e) => {
                run.diagnostics.push(Diagnostic::RunDefinitionUnreadable {
                    path: defn_path,
                    reason: e.to_string(),
                });
                return run;
            }
        };
        if definition.is_empty() {
            run.diagnostics
                .push(Diagnostic::EmptyRunDefinition { path: defn_path });
            run.status = RunStatus::EmptyRunDefinition;
            run.run_definition = Some(definition);
            return run;
        }

        run.populate(&dir, &definition);
        run.run_definition = Some(definition);
        run.status = RunStatus::Valid;
        log::info!(
            "Loaded run {} with {} sample(s)",
            name,
            run.samples.len()
        );
        run
    }

    /// Determine samples and libraries from the run definition rows.
    fn populate(&mut self, dir: &Path, definition: &RunDefinition) {
        let mut sample_ids: AHashMap<String, SampleId> = AHashMap::new();

        for (row, entry) in definition.entries().enumerate() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.diagnostics.push(Diagnostic::MalformedRunDefinitionRow {
                        row,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let sample_id = match sample_ids.get(&entry.sample_name) {
                Some(&id) => id,
                None => {
                    let id = SampleId(self.samples.len());
                    let sample = self.new_sample(id, dir, &entry.sample_name);
                    self.samples.push(sample);
                    sample_ids.insert(entry.sample_name.clone(), id);
                    id
                }
            };

            let sample = &mut self.samples[sample_id.0];
            let libraries_dir = sample.libraries_dir().map(Path::to_path_buf);
            let library = sample.add_library(&entry.library);
            library.set_barcodes(entry.barcode_list());

            let search = match &libraries_dir {
                Some(libraries_dir) => {
                    locate_primary_data(&libraries_dir.join(&entry.library), library.is_barcoded())
                }
                None => PrimaryDataSearch::default(),
            };

            match search.found {
                Some((csfasta, qual)) => {
                    log::debug!(
                        "Primary data for {}/{}: {}",
                        entry.sample_name,
                        entry.library,
                        csfasta.display()
                    );
                    library.set_primary_data(csfasta, qual);
                    if !search.discarded.is_empty() {
                        self.diagnostics.push(Diagnostic::AmbiguousPrimaryData {
                            sample: entry.sample_name,
                            library: entry.library,
                            discarded: search.discarded,
                        });
                    }
                }
                None => self.diagnostics.push(Diagnostic::PrimaryDataNotFound {
                    sample: entry.sample_name,
                    library: entry.library,
                }),
            }
        }
    }

    /// Create a sample, following its `results` link to the libraries
    /// directory and picking up any barcode statistics there.
    fn new_sample(&mut self, id: SampleId, dir: &Path, name: &str) -> Sample {
        let mut sample = Sample::new(id, name);
        let Some(libraries_dir) = locate_libraries_dir(dir, name) else {
            self.diagnostics.push(Diagnostic::LibrariesDirNotFound {
                sample: name.to_string(),
            });
            return sample;
        };

        if let Some(stats_path) = locate_barcode_statistics(&libraries_dir) {
            match BarcodeStatistics::from_path(&stats_path) {
                Ok(stats) => sample.set_barcode_stats(stats),
                Err(e) => self.diagnostics.push(Diagnostic::BarcodeStatisticsUnreadable {
                    path: stats_path,
                    reason: e.to_string(),
                }),
            }
        }
        sample.set_libraries_dir(libraries_dir);
        sample
    }

    /// True if the directory exists, its name parsed and the run definition
    /// had at least one row.
    pub fn is_valid(&self) -> bool {
        self.status == RunStatus::Valid
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }

    pub fn run_name(&self) -> Option<&str> {
        self.run_name.as_deref()
    }

    pub fn run_info(&self) -> Option<&RunInfo> {
        self.run_info.as_ref()
    }

    pub fn run_definition(&self) -> Option<&RunDefinition> {
        self.run_definition.as_ref()
    }

    /// Samples in the order they first appear in the run definition.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.name() == name)
    }

    pub fn sample_by_id(&self, id: SampleId) -> Option<&Sample> {
        self.samples.get(id.0)
    }

    pub fn parent_sample(&self, library: &Library) -> Option<&Sample> {
        self.sample_by_id(library.sample_id())
    }

    /// Every project in the run along with the sample it belongs to.
    pub fn projects(&self) -> impl Iterator<Item = (&Sample, &Project)> {
        self.samples
            .iter()
            .flat_map(|s| s.projects().iter().map(move |p| (s, p)))
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Libraries whose sample and library names match the patterns.
    ///
    /// Patterns are exact names, or prefixes followed by `*`; `*` matches
    /// everything. Results are sample-major, in library order.
    pub fn fetch_libraries(&self, sample_pattern: &str, library_pattern: &str) -> Vec<&Library> {
        let matching: Vec<&Library> = self
            .samples
            .iter()
            .filter(|s| matches_pattern(sample_pattern, s.name()))
            .flat_map(|s| s.libraries())
            .filter(|l| matches_pattern(library_pattern, l.name()))
            .collect();
        if matching.is_empty() {
            log::debug!(
                "No libraries matched to {}/{} in {}",
                sample_pattern,
                library_pattern,
                self.run_dir.as_deref().unwrap_or(Path::new("")).display()
            );
        }
        matching
    }

    /// Slide layout from the number of samples: 1, 4 or 8.
    pub fn slide_layout(&self) -> SlideLayout {
        match self.samples.len() {
            1 => SlideLayout::WholeSlide,
            4 => SlideLayout::Quads,
            8 => SlideLayout::Octets,
            n => {
                log::warn!("Undefined layout for {} samples", n);
                SlideLayout::Undefined(n)
            }
        }
    }
}

/// Follow `<dir>/<sample>/results` to its `libraries` subdirectory.
fn locate_libraries_dir(dir: &Path, sample: &str) -> Option<PathBuf> {
    let sample_dir = dir.join(sample);
    let results = sample_dir.join(RESULTS_LINK);
    let is_link = fs::symlink_metadata(&results)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return None;
    }
    let target = fs::read_link(&results).ok()?;
    let libraries_dir = sample_dir.join(target).join(LIBRARIES_DIR);
    libraries_dir.is_dir().then_some(libraries_dir)
}

/// First `BarcodeStatistics*` entry in the directory listing.
fn locate_barcode_statistics(libraries_dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(libraries_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot list {}: {}", libraries_dir.display(), e);
            return None;
        }
    };
    entries
        .flatten()
        .find(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(BARCODE_STATISTICS_PREFIX)
        })
        .map(|entry| entry.path())
}

/// Look for a `primary.XXXXXXX` style subdirectory of the library directory
/// that has `reject`, `reads` and `reports`, and take the `.csfasta` and
/// `.qual` files from its `reads`.
///
/// Listing order decides which file wins when a `reads` directory holds
/// several with the same extension (the last one) and which qualifying
/// directory is kept (the first one).
fn locate_primary_data(library_dir: &Path, barcoded: bool) -> PrimaryDataSearch {
    let mut search = PrimaryDataSearch::default();
    let Ok(entries) = fs::read_dir(library_dir) else {
        return search;
    };

    for candidate in entries.flatten().map(|e| e.path()) {
        let qualifies = PRIMARY_DATA_SUBDIRS
            .iter()
            .all(|sub| candidate.join(sub).is_dir());
        if !qualifies {
            continue;
        }

        let Some((csfasta, qual)) = primary_data_files(&candidate.join(READS_DIR), barcoded) else {
            continue;
        };
        if search.found.is_none() {
            search.found = Some((csfasta, qual));
        } else {
            search.discarded.push(candidate);
        }
    }
    search
}

fn primary_data_files(reads: &Path, barcoded: bool) -> Option<(PathBuf, PathBuf)> {
    let mut csfasta = None;
    let mut qual = None;
    for path in fs::read_dir(reads).ok()?.flatten().map(|e| e.path()) {
        // Sanity check names for barcoded samples
        if barcoded && !has_f3_marker(&path) {
            continue;
        }
        if has_extension(&path, CSFASTA_EXT) {
            csfasta = Some(path);
        } else if has_extension(&path, QUAL_EXT) {
            qual = Some(path);
        }
    }
    csfasta.zip(qual)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().map(|e| e == ext).unwrap_or(false)
}

fn has_f3_marker(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().contains(F3_MARKER))
        .unwrap_or(false)
}
