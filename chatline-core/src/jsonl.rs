//! JSON Lines read/append helpers.
//!
//! One JSON value per line, no enclosing array. Blank lines are skipped on
//! read so a trailing newline is harmless.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read every record of a JSONL file.
///
/// The first line that fails to parse aborts the read with
/// [`crate::Error::Parse`] carrying its 1-based line number.
pub fn read_jsonl_file<T: DeserializeOwned>(path: &Path) -> crate::Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|e| crate::Error::Parse {
            path: path.to_path_buf(),
            line: line_num + 1,
            message: e.to_string(),
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Append one record as a single line, creating the file if needed
pub fn append_jsonl_record<T: Serialize>(path: &Path, record: &T) -> crate::Result<()> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()?;
    Ok(())
}
