use std::fs;
use std::path::Path;

use tracing::info;

use crate::admin_object::AdminObject;
use crate::{PrepareImportError, Result};

/// Write the manifest as pretty JSON to `path`, creating parent directories.
///
/// The document is written to a temporary sibling first, then renamed.
pub fn save_to_file(admin_object: &AdminObject, path: &Path) -> Result<()> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PrepareImportError::Io { path, source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let json = admin_object.to_json()?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, json).map_err(io_error(&tmp_path))?;
    fs::rename(&tmp_path, path).map_err(io_error(path))?;

    info!(path = ?path, batch = %admin_object.id.key, "Manifest written");
    Ok(())
}
