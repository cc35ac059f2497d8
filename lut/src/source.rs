//! Loads slot records from the JSON instruction tables.
//!
//! Each file is an array of rows, each row an array of record objects:
//!
//! ```json
//! [
//!   [{ "name": "and", "subname": "lli" }, { "name": "and", "subname": "llr" }],
//!   [{ "name": "ldr", "desc": "post-decrement", "subdesc": "immediate" }]
//! ]
//! ```
//!
//! Rows only exist to keep the files readable; they are flattened in order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::LoadError;
use crate::slot::{InstructionSet, SlotRecord};

/// File name of each instruction set's table inside the data directory.
#[must_use]
pub const fn file_name(isa: InstructionSet) -> &'static str {
    match isa {
        InstructionSet::Arm => "arm-instruction-table.json",
        InstructionSet::Thumb => "thumb-instruction-table.json",
    }
}

/// Reads and flattens one table, checking it has exactly
/// [`InstructionSet::table_len`] slots.
///
/// # Errors
///
/// Fails on malformed JSON or a slot count mismatch.
pub fn from_reader<R: Read>(isa: InstructionSet, reader: R) -> Result<Vec<SlotRecord>, LoadError> {
    let rows: Vec<Vec<SlotRecord>> =
        serde_json::from_reader(reader).map_err(|source| LoadError::Json { isa, source })?;
    let records = rows.into_iter().flatten().collect::<Vec<_>>();

    let expected = isa.table_len();
    if records.len() != expected {
        return Err(LoadError::Length {
            isa,
            expected,
            found: records.len(),
        });
    }

    Ok(records)
}

/// Loads the table of `isa` from `data_dir`.
///
/// # Errors
///
/// See [`from_reader`]; also fails if the file cannot be opened.
pub fn load(data_dir: &Path, isa: InstructionSet) -> Result<Vec<SlotRecord>, LoadError> {
    let path = data_dir.join(file_name(isa));
    debug!(%isa, path = %path.display(), "loading instruction table");

    let file = File::open(&path).map_err(|source| LoadError::Io { path, source })?;
    from_reader(isa, BufReader::new(file))
}
