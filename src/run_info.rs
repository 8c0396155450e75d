// src/run_info.rs

use std::fmt;

use crate::errors::{Error, Result};

/// Token marking a fragment library run.
pub const FRAGMENT_MARKER: &str = "FRAG";
/// Token marking a run with barcoded samples.
pub const BARCODED_MARKER: &str = "BC";

/// Data derived from a run name such as `solid0123_20130426_FRAG_BC_2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    /// The run name as supplied.
    pub name: String,
    /// Instrument name, e.g. `solid0123`.
    pub instrument: String,
    /// Datestamp, e.g. `20130426`.
    pub datestamp: String,
    pub is_fragment_library: bool,
    pub is_barcoded_sample: bool,
    /// 1 or 2.
    pub flow_cell: u8,
    /// Run name without the flow cell identifier.
    pub id: String,
    /// Datestamp reformatted as DD/MM/YY, when it has 8 characters.
    pub date: Option<String>,
}

impl RunInfo {
    /// Break a run name down into its components.
    ///
    /// The name must have at least an instrument and a datestamp token
    /// separated by an underscore.
    pub fn parse(name: &str) -> Result<Self> {
        let tokens: Vec<&str> = name.split('_').collect();
        if tokens.len() < 2 {
            return Err(Error::MalformedName {
                name: name.to_string(),
                reason: "expected <instrument>_<datestamp>",
            });
        }

        let instrument = tokens[0].to_string();
        let datestamp = tokens[1].to_string();
        let is_fragment_library = tokens.contains(&FRAGMENT_MARKER);
        let is_barcoded_sample = tokens.contains(&BARCODED_MARKER);
        let flow_cell = if tokens.last() == Some(&"2") { 2 } else { 1 };

        let mut id = format!("{instrument}_{datestamp}");
        if is_fragment_library {
            id.push('_');
            id.push_str(FRAGMENT_MARKER);
        }
        if is_barcoded_sample {
            id.push('_');
            id.push_str(BARCODED_MARKER);
        }

        Ok(Self {
            name: name.to_string(),
            date: format_datestamp(&datestamp),
            instrument,
            datestamp,
            is_fragment_library,
            is_barcoded_sample,
            flow_cell,
            id,
        })
    }

    /// Labelled summary of the name components, in display order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Instrument", self.instrument.clone()),
            ("Datestamp", self.datestamp.clone()),
            ("Flow Cell", self.flow_cell.to_string()),
            ("Is Fragment Library", self.is_fragment_library.to_string()),
            ("Is Barcoded Sample", self.is_barcoded_sample.to_string()),
        ]
    }
}

impl fmt::Display for RunInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (label, value) in self.fields() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// `YYYYMMDD` -> `DD/MM/YY`.
fn format_datestamp(datestamp: &str) -> Option<String> {
    let chars: Vec<char> = datestamp.chars().collect();
    if chars.len() != 8 {
        return None;
    }
    let part = |r: std::ops::Range<usize>| chars[r].iter().collect::<String>();
    Some(format!("{}/{}/{}", part(6..8), part(4..6), part(2..4)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_run_name() {
        let info = RunInfo::parse("solid0123_20130426_FRAG_BC_2").unwrap();
        assert_eq!(info.instrument, "solid0123");
        assert_eq!(info.datestamp, "20130426");
        assert!(info.is_fragment_library);
        assert!(info.is_barcoded_sample);
        assert_eq!(info.flow_cell, 2);
        assert_eq!(info.id, "solid0123_20130426_FRAG_BC");
        assert_eq!(info.date.as_deref(), Some("26/04/13"));
    }

    #[test]
    fn test_plain_run_name() {
        let info = RunInfo::parse("solid0424_20100601").unwrap();
        assert!(!info.is_fragment_library);
        assert!(!info.is_barcoded_sample);
        assert_eq!(info.flow_cell, 1);
        assert_eq!(info.id, "solid0424_20100601");
        assert_eq!(info.date.as_deref(), Some("01/06/10"));
    }

    #[test]
    fn test_barcoded_without_fragment() {
        let info = RunInfo::parse("solid0127_20110419_BC").unwrap();
        assert_eq!(info.id, "solid0127_20110419_BC");
        assert_eq!(info.flow_cell, 1);
    }

    #[test]
    fn test_short_datestamp_has_no_date() {
        let info = RunInfo::parse("solid0123_2013").unwrap();
        assert_eq!(info.date, None);
    }

    #[test]
    fn test_malformed_name() {
        match RunInfo::parse("solid0123") {
            Err(Error::MalformedName { name, .. }) => assert_eq!(name, "solid0123"),
            other => panic!("expected MalformedName, got {other:?}"),
        }
    }

    #[test]
    fn test_fields_summary() {
        let info = RunInfo::parse("solid0123_20130426_FRAG_BC_2").unwrap();
        let fields = info.fields();
        assert_eq!(fields[0], ("Name", "solid0123_20130426_FRAG_BC_2".to_string()));
        assert_eq!(fields[3], ("Flow Cell", "2".to_string()));
        assert!(info.to_string().contains("Instrument: solid0123"));
    }
}
