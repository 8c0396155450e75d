// src/sample.rs

use std::fmt;
use std::path::{Path, PathBuf};

use crate::barcode_stats::BarcodeStatistics;
use crate::library::Library;

/// Position of a sample in its run's sample list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(pub usize);

/// A sample in a SOLiD run, holding one or more libraries.
///
/// Libraries are kept sorted by `(prefix, index)`; projects group them by
/// the experimenter's initials.
#[derive(Debug, Clone)]
pub struct Sample {
    id: SampleId,
    name: String,
    libraries: Vec<Library>,
    projects: Vec<Project>,
    libraries_dir: Option<PathBuf>,
    barcode_stats: Option<BarcodeStatistics>,
}

impl Sample {
    pub(crate) fn new(id: SampleId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            libraries: Vec::new(),
            projects: Vec::new(),
            libraries_dir: None,
            barcode_stats: None,
        }
    }

    pub fn id(&self) -> SampleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// `libraries` directory reached through the sample's `results` link.
    pub fn libraries_dir(&self) -> Option<&Path> {
        self.libraries_dir.as_deref()
    }

    pub fn barcode_stats(&self) -> Option<&BarcodeStatistics> {
        self.barcode_stats.as_ref()
    }

    pub fn library(&self, name: &str) -> Option<&Library> {
        self.libraries.iter().find(|l| l.name() == name)
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name() == name)
    }

    /// Libraries belonging to `project`, in the order they joined it.
    pub fn project_libraries<'a>(
        &'a self,
        project: &'a Project,
    ) -> impl Iterator<Item = &'a Library> + 'a {
        project.library_names().iter().filter_map(move |n| self.library(n))
    }

    /// Attach a library, or return the one already attached with that name.
    ///
    /// New libraries join the project named by their initials.
    pub(crate) fn add_library(&mut self, name: &str) -> &mut Library {
        let pos = match self.libraries.iter().position(|l| l.name() == name) {
            Some(pos) => pos,
            None => {
                let library = Library::new(name, self.id);
                let project_name = library.initials().to_string();
                self.libraries.push(library);
                self.libraries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
                self.project_mut(&project_name).add_library(name);
                self.libraries
                    .iter()
                    .position(|l| l.name() == name)
                    .unwrap_or(self.libraries.len() - 1)
            }
        };
        &mut self.libraries[pos]
    }

    fn project_mut(&mut self, name: &str) -> &mut Project {
        let pos = match self.projects.iter().position(|p| p.name() == name) {
            Some(pos) => pos,
            None => {
                self.projects.push(Project::new(name, self.id));
                self.projects.len() - 1
            }
        };
        &mut self.projects[pos]
    }

    pub(crate) fn set_libraries_dir(&mut self, dir: PathBuf) {
        self.libraries_dir = Some(dir);
    }

    pub(crate) fn set_barcode_stats(&mut self, stats: BarcodeStatistics) {
        self.barcode_stats = Some(stats);
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A grouping of related libraries within a sample, normally by initials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    sample: SampleId,
    libraries: Vec<String>,
}

impl Project {
    fn new(name: &str, sample: SampleId) -> Self {
        Self {
            name: name.to_string(),
            sample,
            libraries: Vec::new(),
        }
    }

    fn add_library(&mut self, library: &str) {
        self.libraries.push(library.to_string());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_id(&self) -> SampleId {
        self.sample
    }

    /// Member library names in the order they were added.
    pub fn library_names(&self) -> &[String] {
        &self.libraries
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Wildcard pattern matching every library in the project.
    ///
    /// PB1, PB2, PB3 and PB4 give `PB*`; a single library gives its own
    /// name. `None` for an empty project.
    pub fn library_name_pattern(&self) -> Option<String> {
        let first = self.libraries.first()?;
        let mut common = first.len();
        for name in &self.libraries[1..] {
            common = first
                .char_indices()
                .zip(name.chars())
                .take_while(|((i, a), b)| *i < common && a == b)
                .last()
                .map(|((i, a), _)| i + a.len_utf8())
                .unwrap_or(0);
        }
        let prefix = &first[..common];
        if self.libraries.iter().any(|n| n.len() > prefix.len()) {
            Some(format!("{prefix}*"))
        } else {
            Some(prefix.to_string())
        }
    }

    /// The project name, or the sample name when the project holds every
    /// library in the sample.
    ///
    /// `None` if `sample` is not the project's parent.
    pub fn display_name<'a>(&'a self, sample: &'a Sample) -> Option<&'a str> {
        if sample.id() != self.sample {
            return None;
        }
        if sample.libraries().len() == self.libraries.len() {
            Some(sample.name())
        } else {
            Some(self.name.as_str())
        }
    }

    /// True if there is at least one library and all are barcoded.
    ///
    /// `None` if `sample` is not the project's parent.
    pub fn is_barcoded(&self, sample: &Sample) -> Option<bool> {
        if sample.id() != self.sample {
            return None;
        }
        Some(!self.libraries.is_empty() && sample.project_libraries(self).all(Library::is_barcoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_with(names: &[&str]) -> Sample {
        let mut sample = Sample::new(SampleId(0), "AB_pool");
        for name in names {
            sample.add_library(name);
        }
        sample
    }

    fn names(sample: &Sample) -> Vec<&str> {
        sample.libraries().iter().map(Library::name).collect()
    }

    #[test]
    fn test_libraries_sorted_on_insert() {
        let sample = sample_with(&["PB10", "PB2", "AB1", "PB1", "CW_TI"]);
        assert_eq!(names(&sample), ["AB1", "CW_TI", "PB1", "PB2", "PB10"]);
    }

    #[test]
    fn test_readding_returns_existing() {
        let mut sample = sample_with(&["PB1", "PB2"]);
        sample.add_library("PB1").set_barcodes(vec!["1".to_string()]);
        assert_eq!(sample.libraries().len(), 2);
        assert!(sample.library("PB1").unwrap().is_barcoded());
        assert_eq!(sample.project("PB").unwrap().len(), 2);
    }

    #[test]
    fn test_single_project() {
        let sample = sample_with(&["PB1", "PB2", "PB3", "PB4"]);
        assert_eq!(sample.projects().len(), 1);
        let project = &sample.projects()[0];
        assert_eq!(project.name(), "PB");
        assert_eq!(project.library_name_pattern().as_deref(), Some("PB*"));
        assert_eq!(project.display_name(&sample), Some("AB_pool"));
    }

    #[test]
    fn test_projects_by_initials() {
        let sample = sample_with(&["DR1", "EP_NCYC2669", "DR2"]);
        let projects: Vec<&str> = sample.projects().iter().map(Project::name).collect();
        assert_eq!(projects, ["DR", "EP"]);
        let dr = sample.project("DR").unwrap();
        assert_eq!(dr.library_names(), ["DR1", "DR2"]);
        assert_eq!(dr.display_name(&sample), Some("DR"));
        let ep = sample.project("EP").unwrap();
        assert_eq!(ep.library_name_pattern().as_deref(), Some("EP_NCYC2669"));
    }

    #[test]
    fn test_project_queries_need_parent_sample() {
        let sample = sample_with(&["PB1", "PB2"]);
        let other = Sample::new(SampleId(1), "CD_pool");
        let project = sample.project("PB").unwrap();
        assert_eq!(project.sample_id(), SampleId(0));
        assert_eq!(project.display_name(&other), None);
        assert_eq!(project.is_barcoded(&other), None);
        assert_eq!(project.display_name(&sample), Some("AB_pool"));
    }

    #[test]
    fn test_oversized_index_sorts_last() {
        let sample = sample_with(&["DR99999999999999999999999", "DR2", "DR", "DR10"]);
        assert_eq!(names(&sample), ["DR", "DR2", "DR10", "DR99999999999999999999999"]);
    }

    #[test]
    fn test_library_name_pattern() {
        let mut project = Project::new("PB", SampleId(0));
        assert_eq!(project.library_name_pattern(), None);
        project.add_library("PB1");
        assert_eq!(project.library_name_pattern().as_deref(), Some("PB1"));
        project.add_library("PB12");
        assert_eq!(project.library_name_pattern().as_deref(), Some("PB1*"));
        project.add_library("QX1");
        assert_eq!(project.library_name_pattern().as_deref(), Some("*"));
    }

    #[test]
    fn test_identical_names_pattern() {
        let mut project = Project::new("PB", SampleId(0));
        project.add_library("PB1");
        project.add_library("PB1");
        assert_eq!(project.library_name_pattern().as_deref(), Some("PB1"));
    }

    #[test]
    fn test_project_barcoding() {
        let mut sample = sample_with(&["PB1", "PB2"]);
        let project = sample.project("PB").unwrap().clone();
        assert_eq!(project.is_barcoded(&sample), Some(false));
        sample.add_library("PB1").set_barcodes(vec!["1".to_string()]);
        assert_eq!(project.is_barcoded(&sample), Some(false));
        sample.add_library("PB2").set_barcodes(vec!["2".to_string()]);
        assert_eq!(project.is_barcoded(&sample), Some(true));
        assert_eq!(Project::new("XX", SampleId(0)).is_barcoded(&sample), Some(false));
    }
}
