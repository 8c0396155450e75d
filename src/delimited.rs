// src/delimited.rs

//! Reader for the tab-delimited files written by the SOLiD instrument.
//!
//! Both the run definition and the barcode statistics files consist of some
//! preamble, a header line that can be recognised by its start, and data
//! rows below it.

use ahash::AHashMap;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::errors::{Error, Result};

/// How to recognise the header line of a table and turn it into field names.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    /// The header is the first line starting with this.
    pub marker: &'static str,
    /// Character stripped from both ends of the header before splitting.
    pub strip: Option<char>,
}

impl HeaderRule {
    fn is_header(&self, line: &str) -> bool {
        line.starts_with(self.marker)
    }

    fn fields(&self, line: &str) -> Vec<String> {
        let line = line.trim();
        let line = match self.strip {
            Some(c) => line.trim_matches(c),
            None => line,
        };
        split_row(line)
    }
}

/// Header fields plus the rows found below the header.
#[derive(Debug, Clone, Default)]
pub struct DelimitedTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    positions: AHashMap<String, usize>,
}

impl DelimitedTable {
    /// Read a table from a file, decompressing `.gz` files on the fly.
    ///
    /// Failing to open or read the file gives `Error::SourceUnavailable`;
    /// callers decide whether that matters.
    pub fn from_path<P: AsRef<Path>>(path: P, rule: HeaderRule) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |source: io::Error| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let reader = open_text(path).map_err(unavailable)?;
        Self::from_reader(reader, rule).map_err(unavailable)
    }

    /// Parse a table from any buffered reader.
    ///
    /// Lines before the header are ignored. Every non-blank line after it
    /// becomes a row, whatever its number of columns.
    pub fn from_reader<R: BufRead>(reader: R, rule: HeaderRule) -> io::Result<Self> {
        let mut table = Self::default();
        let mut got_header = false;

        for line in reader.lines() {
            let line = line?;
            if got_header {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                table.rows.push(split_row(trimmed));
            } else if rule.is_header(&line) {
                table.set_header(rule.fields(&line));
                got_header = true;
            }
        }

        Ok(table)
    }

    fn set_header(&mut self, header: Vec<String>) {
        self.positions.clear();
        for (pos, field) in header.iter().enumerate() {
            self.positions.entry(field.clone()).or_insert(pos);
        }
        self.header = header;
    }

    pub fn field_names(&self) -> &[String] {
        &self.header
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Result<&[String]> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
    }

    /// Column position of a header field.
    pub fn position(&self, field: &str) -> Result<usize> {
        self.positions
            .get(field)
            .copied()
            .ok_or_else(|| Error::FieldNotFound {
                field: field.to_string(),
            })
    }

    /// Value of `field` in row `index`.
    pub fn data_item(&self, field: &str, index: usize) -> Result<&str> {
        let pos = self.position(field)?;
        let row = self.row(index)?;
        row.get(pos)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingValue {
                field: field.to_string(),
                row: index,
            })
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split('\t').map(str::to_string).collect()
}

/// Open a text file for line reading, gunzipping it if the name ends in `.gz`.
pub fn open_text(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}
