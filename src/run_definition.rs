// src/run_definition.rs

use std::path::Path;

use crate::delimited::{DelimitedTable, HeaderRule};
use crate::errors::{Error, Result};

/// Suffix appended to the run name to get the run definition file name.
pub const RUN_DEFINITION_SUFFIX: &str = "_run_definition.txt";

pub const SAMPLE_NAME_FIELD: &str = "sampleName";
pub const LIBRARY_FIELD: &str = "library";
pub const BARCODES_FIELD: &str = "barcodes";

/// The header looks like:
/// ```text
/// sampleName	sampleDesc	spotAssignments	primarySetting	library	application	secondaryAnalysis	multiplexingSeries	barcodes
/// ```
const HEADER: HeaderRule = HeaderRule {
    marker: SAMPLE_NAME_FIELD,
    strip: None,
};

/// Data from a `<run>_run_definition.txt` file, one row per sample/library.
#[derive(Debug, Clone, Default)]
pub struct RunDefinition {
    table: DelimitedTable,
}

/// The fields of one run definition row that the run model relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDefinitionEntry {
    pub sample_name: String,
    pub library: String,
    /// Raw `barcodes` value, `None` if the column or the value is absent.
    pub barcodes: Option<String>,
}

impl RunDefinitionEntry {
    /// Barcode identifiers, e.g. `"1,2,3"` -> `["1", "2", "3"]`.
    ///
    /// Empty when the library is not barcoded.
    pub fn barcode_list(&self) -> Vec<String> {
        match self.barcodes.as_deref().map(|b| b.trim_matches('"')) {
            Some(b) => b
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_barcoded(&self) -> bool {
        !self.barcode_list().is_empty()
    }
}

impl RunDefinition {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            table: DelimitedTable::from_path(path, HEADER)?,
        })
    }

    pub fn from_table(table: DelimitedTable) -> Self {
        Self { table }
    }

    pub fn fields(&self) -> &[String] {
        self.table.field_names()
    }

    /// Number of sample/library rows.
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

    /// Typed view of row `index`. `sampleName` and `library` are required.
    pub fn entry(&self, index: usize) -> Result<RunDefinitionEntry> {
        let sample_name = self.data_item(SAMPLE_NAME_FIELD, index)?.to_string();
        let library = self.data_item(LIBRARY_FIELD, index)?.to_string();
        let barcodes = match self.data_item(BARCODES_FIELD, index) {
            Ok(value) => Some(value.to_string()),
            Err(Error::FieldNotFound { .. }) | Err(Error::MissingValue { .. }) => None,
            Err(e) => return Err(e),
        };
        Ok(RunDefinitionEntry {
            sample_name,
            library,
            barcodes,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = Result<RunDefinitionEntry>> + '_ {
        (0..self.row_count()).map(|i| self.entry(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FILE: &str = "\
#Run definition\n\
version\t1\n\
sampleName\tsampleDesc\tspotAssignments\tprimarySetting\tlibrary\tapplication\tsecondaryAnalysis\tmultiplexingSeries\tbarcodes\n\
AB_CD_EF_pool\t\t1\tdefault primary\tCD_UR\tSingleTag\tnone\tBC Kit Module 1-16\t\"1,2,3,4\"\n\
AB_CD_EF_pool\t\t1\tdefault primary\tEF12\tSingleTag\tnone\tBC Kit Module 1-16\t\"5\"\n\
DR_pool\t\t2\tdefault primary\tDR1\tSingleTag\tnone\tnone\n";

    fn definition() -> RunDefinition {
        let table = DelimitedTable::from_reader(Cursor::new(FILE), HEADER).unwrap();
        RunDefinition::from_table(table)
    }

    #[test]
    fn test_header_and_rows() {
        let defn = definition();
        assert_eq!(defn.fields().len(), 9);
        assert_eq!(defn.fields()[0], "sampleName");
        assert_eq!(defn.row_count(), 3);
        assert_eq!(defn.data_item("library", 1).unwrap(), "EF12");
    }

    #[test]
    fn test_barcoded_entries() {
        let defn = definition();
        let entry = defn.entry(0).unwrap();
        assert_eq!(entry.sample_name, "AB_CD_EF_pool");
        assert_eq!(entry.library, "CD_UR");
        assert!(entry.is_barcoded());
        assert_eq!(entry.barcode_list(), ["1", "2", "3", "4"]);
        assert_eq!(defn.entry(1).unwrap().barcode_list(), ["5"]);
    }

    #[test]
    fn test_missing_barcodes_value_is_not_barcoded() {
        let entry = definition().entry(2).unwrap();
        assert_eq!(entry.barcodes, None);
        assert!(!entry.is_barcoded());
    }

    #[test]
    fn test_quoted_empty_barcodes_is_not_barcoded() {
        let entry = RunDefinitionEntry {
            sample_name: "s".to_string(),
            library: "l".to_string(),
            barcodes: Some("\"\"".to_string()),
        };
        assert!(!entry.is_barcoded());
    }

    #[test]
    fn test_empty_barcode_ids_dropped() {
        let entry = |barcodes: &str| RunDefinitionEntry {
            sample_name: "s".to_string(),
            library: "l".to_string(),
            barcodes: Some(barcodes.to_string()),
        };
        assert_eq!(entry("\"1,,2\"").barcode_list(), ["1", "2"]);
        assert_eq!(entry("1, ,2,").barcode_list(), ["1", "2"]);
        assert!(!entry(",").is_barcoded());
    }

    #[test]
    fn test_no_barcodes_column() {
        let text = "sampleName\tlibrary\nS1\tPB1\n";
        let table = DelimitedTable::from_reader(Cursor::new(text), HEADER).unwrap();
        let entry = RunDefinition::from_table(table).entry(0).unwrap();
        assert_eq!(entry.barcodes, None);
    }

    #[test]
    fn test_missing_library_column() {
        let text = "sampleName\tsampleDesc\nS1\tdesc\n";
        let table = DelimitedTable::from_reader(Cursor::new(text), HEADER).unwrap();
        let defn = RunDefinition::from_table(table);
        assert!(matches!(defn.entry(0), Err(Error::FieldNotFound { .. })));
        assert_eq!(defn.entries().count(), 1);
    }
}
