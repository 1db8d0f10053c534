use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub mod bundle;
pub mod table;

use flate2::read::GzDecoder;

use crate::error::EvalError;

/// Opens a file for buffered reading, decompressing transparently when the
/// name ends in `.gz`.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, EvalError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Direct children of `dir`, sorted by name so batch order is reproducible
/// across platforms. No recursion and no extension filter; unreadable entries
/// fail when they are opened.
pub fn list_entries_sorted(dir: &Path) -> Result<Vec<PathBuf>, EvalError> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        entries.push(entry?.path());
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
