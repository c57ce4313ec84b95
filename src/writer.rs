//! Persisting generated units. Nothing here retries; a failed write fails the
//! run and the next run regenerates everything.
use std::path::{Path, PathBuf};

use crate::codegen::Unit;
use crate::error::WriteError;

/// Write every unit to `out_dir/<file name>`, creating the directory first.
/// Returns the written paths in unit order.
pub fn write_units(out_dir: &Path, units: &[Unit]) -> Result<Vec<PathBuf>, WriteError> {
    std::fs::create_dir_all(out_dir).map_err(|source| WriteError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(units.len());
    for unit in units {
        let path = out_dir.join(&unit.file_name);
        std::fs::write(&path, &unit.source).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), base = %unit.base_name, "wrote unit");
        written.push(path);
    }
    Ok(written)
}

/// All units as one text, each preceded by a `// ==> <file name>` marker
/// line. Used when no output directory is given.
pub fn render_listing(units: &[Unit]) -> String {
    let mut out = String::new();
    for (i, unit) in units.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("// ==> {}\n", unit.file_name));
        out.push_str(&unit.source);
    }
    out
}
