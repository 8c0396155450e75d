// src/errors.rs

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Malformed run name \"{name}\": {reason}")]
    MalformedName { name: String, reason: &'static str },

    #[error("Field \"{field}\" not found in header")]
    FieldNotFound { field: String },

    #[error("Row index {index} out of range (table has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Row {row} has no value for field \"{field}\"")]
    MissingValue { field: String, row: usize },

    #[error("Unable to read \"{}\": {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
