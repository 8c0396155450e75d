// src/barcode_stats.rs

use std::path::Path;

use crate::delimited::{DelimitedTable, HeaderRule};
use crate::errors::Result;

/// Files in a sample's libraries directory starting with this hold the
/// barcode statistics.
pub const BARCODE_STATISTICS_PREFIX: &str = "BarcodeStatistics";

/// Name of the aggregate row.
pub const ALL_BEADS: &str = "All Beads";

pub const LIBRARY_FIELD: &str = "Library";

const HEADER: HeaderRule = HeaderRule {
    marker: "##",
    strip: Some('#'),
};

/// Data from a SOLiD `BarcodeStatistics` file.
#[derive(Debug, Clone, Default)]
pub struct BarcodeStatistics {
    table: DelimitedTable,
}

impl BarcodeStatistics {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            table: DelimitedTable::from_path(path, HEADER)?,
        })
    }

    pub fn from_table(table: DelimitedTable) -> Self {
        Self { table }
    }

    pub fn header(&self) -> &[String] {
        self.table.field_names()
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn row(&self, index: usize) -> Result<&[String]> {
        self.table.row(index)
    }

    pub fn data_item(&self, field: &str, index: usize) -> Result<&str> {
        self.table.data_item(field, index)
    }

    /// First row whose first column is `name`.
    pub fn row_by_name(&self, name: &str) -> Option<&[String]> {
        self.table
            .rows()
            .iter()
            .find(|row| row.first().map(String::as_str) == Some(name))
            .map(Vec::as_slice)
    }

    /// Totals over all beads, if the file has them.
    pub fn all_beads(&self) -> Option<&[String]> {
        self.row_by_name(ALL_BEADS)
    }

    /// First row whose `Library` column is `library`.
    pub fn row_for_library(&self, library: &str) -> Option<&[String]> {
        let pos = self.table.position(LIBRARY_FIELD).ok()?;
        self.table
            .rows()
            .iter()
            .find(|row| row.get(pos).map(String::as_str) == Some(library))
            .map(Vec::as_slice)
    }
}
