//! Plugin archive extraction.

use std::fs::File;
use std::path::Path;

use super::error::{RepackError, RepackResult};

/// Unpack a `.difypkg` zip archive into `dest`.
///
/// `dest` must already exist. A directory left over from a previous run is
/// reused as-is; extraction merges into it.
pub fn extract_archive(archive: &Path, dest: &Path) -> RepackResult<()> {
    let file = File::open(archive)?;

    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| RepackError::Extraction(format!("{}: {e}", archive.display())))?;

    zip.extract(dest)
        .map_err(|e| RepackError::Extraction(format!("{}: {e}", archive.display())))?;

    Ok(())
}
