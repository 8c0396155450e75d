// src/library.rs

use std::fmt;
use std::path::{Path, PathBuf};

use crate::naming::{extract_index_string, extract_initials, extract_prefix, parse_index};
use crate::sample::SampleId;

/// A sequencing library within a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    name: String,
    /// Experimenter's initials, e.g. `DR` for `DR07`.
    initials: String,
    /// Name without trailing digits.
    prefix: String,
    /// Trailing digits with leading zeroes kept.
    index_string: String,
    index: Option<u64>,
    is_barcoded: bool,
    barcodes: Vec<String>,
    csfasta: Option<PathBuf>,
    qual: Option<PathBuf>,
    sample: SampleId,
}

impl Library {
    pub(crate) fn new(name: &str, sample: SampleId) -> Self {
        let index_string = extract_index_string(name);
        Self {
            name: name.to_string(),
            initials: extract_initials(name).to_string(),
            prefix: extract_prefix(name).to_string(),
            index: parse_index(index_string),
            index_string: index_string.to_string(),
            is_barcoded: false,
            barcodes: Vec::new(),
            csfasta: None,
            qual: None,
            sample,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initials(&self) -> &str {
        &self.initials
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn index_string(&self) -> &str {
        &self.index_string
    }

    pub fn index(&self) -> Option<u64> {
        self.index
    }

    pub fn is_barcoded(&self) -> bool {
        self.is_barcoded
    }

    /// Barcode identifiers from the run definition; empty if not barcoded.
    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }

    /// The `.csfasta` sequence file, if located.
    pub fn csfasta(&self) -> Option<&Path> {
        self.csfasta.as_deref()
    }

    /// The `.qual` quality file, if located.
    pub fn qual(&self) -> Option<&Path> {
        self.qual.as_deref()
    }

    pub fn has_primary_data(&self) -> bool {
        self.csfasta.is_some() && self.qual.is_some()
    }

    /// Arena index of the parent sample within its run.
    pub fn sample_id(&self) -> SampleId {
        self.sample
    }

    /// Orders by prefix, then numerically by index. Names without an index
    /// come first. The digits are compared as text (length first) so indexes
    /// too large for `u64` still sort after smaller ones.
    pub(crate) fn sort_key(&self) -> (&str, Option<(usize, &str)>) {
        let digits = self.index_string.trim_start_matches('0');
        let index = (!self.index_string.is_empty()).then_some((digits.len(), digits));
        (&self.prefix, index)
    }

    pub(crate) fn set_barcodes(&mut self, barcodes: Vec<String>) {
        self.is_barcoded = !barcodes.is_empty();
        self.barcodes = barcodes;
    }

    pub(crate) fn set_primary_data(&mut self, csfasta: PathBuf, qual: PathBuf) {
        self.csfasta = Some(csfasta);
        self.qual = Some(qual);
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}
