use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::EvalError;
use crate::input::bundle::read_bundle;
use crate::input::list_entries_sorted;
use crate::input::table::write_table;

/// Converts every bundle file in `path` into a prediction CSV under
/// `conv_path`, named `<original_file_name>.csv`. The output directory is
/// created recursively if missing; input files are never touched. The first
/// failing file aborts the whole batch.
pub fn convert(path: &Path, conv_path: &Path) -> Result<(), EvalError> {
    let files = list_entries_sorted(path)?;
    fs::create_dir_all(conv_path)?;

    for f_path in &files {
        let table = read_bundle(f_path)?;
        let file_name = f_path
            .file_name()
            .ok_or_else(|| EvalError::Bundle(format!("{}: no file name", f_path.display())))?;
        let out_path = conv_path.join(format!("{}.csv", file_name.to_string_lossy()));
        write_table(&table, &out_path)?;
        info!(
            "converted {} ({} rows) -> {}",
            f_path.display(),
            table.len(),
            out_path.display()
        );
    }

    info!("converted {} bundle(s) into {}", files.len(), conv_path.display());
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/convert/mod.rs"]
mod tests;
