//! Files found in a batch directory.
//!
//! A file whose name holds a dot is *simple* and recognized from its name.
//! A file without extension is an *upload*: its type comes from the sibling
//! `<name>.info` sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::file_type::{extract_file_type_from_filename, ValidFileType};
use crate::metadata::{extract_file_type_from_metadata, load_metadata, UploadedFileMeta, INFO_EXTENSION};
use crate::{PrepareImportError, Result};

/// Access to the contents of one batch directory
pub trait BatchInspector {
    /// Names of the regular files of the batch, sorted by name.
    fn list_filenames(&self) -> Result<Vec<String>>;

    /// Parsed `<filename>.info` sidecar.
    fn metadata(&self, filename: &str) -> Result<UploadedFileMeta>;

    /// On-disk size of `filename`, in bytes.
    fn file_size(&self, filename: &str) -> Result<u64>;
}

/// Batch directory on the local filesystem
#[derive(Debug, Clone)]
pub struct BatchDirectory {
    path: PathBuf,
}

impl BatchDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(path: PathBuf) -> impl FnOnce(std::io::Error) -> PrepareImportError {
        move |source| PrepareImportError::Io { path, source }
    }
}

impl BatchInspector for BatchDirectory {
    fn list_filenames(&self) -> Result<Vec<String>> {
        read_filenames(&self.path)
    }

    fn metadata(&self, filename: &str) -> Result<UploadedFileMeta> {
        load_metadata(&self.path.join(format!("{}{}", filename, INFO_EXTENSION)))
    }

    fn file_size(&self, filename: &str) -> Result<u64> {
        let path = self.path.join(filename);
        let meta = fs::metadata(&path).map_err(Self::io_error(path))?;
        Ok(meta.len())
    }
}

/// Names of the regular files in `dir`, sorted. Subdirectories are skipped.
pub fn read_filenames(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(BatchDirectory::io_error(dir.to_path_buf()))?;

    let mut filenames = Vec::new();
    for entry in entries {
        let entry = entry.map_err(BatchDirectory::io_error(dir.to_path_buf()))?;
        let file_type = entry
            .file_type()
            .map_err(BatchDirectory::io_error(entry.path()))?;
        if file_type.is_dir() {
            debug!(path = ?entry.path(), "Skipping subdirectory");
            continue;
        }
        filenames.push(entry.file_name().to_string_lossy().into_owned());
    }
    filenames.sort();
    Ok(filenames)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFile {
    Simple { filename: String },
    Uploaded { filename: String, meta: UploadedFileMeta },
}

impl DataFile {
    /// Build the data file for `filename`, reading its sidecar if it is an
    /// upload.
    pub fn augment<I: BatchInspector + ?Sized>(filename: &str, inspector: &I) -> Result<Self> {
        if filename.contains('.') {
            return Ok(Self::Simple {
                filename: filename.to_string(),
            });
        }
        Ok(Self::Uploaded {
            filename: filename.to_string(),
            meta: inspector.metadata(filename)?,
        })
    }

    /// Name as stored in the manifest
    pub fn filename(&self) -> &str {
        match self {
            Self::Simple { filename } | Self::Uploaded { filename, .. } => filename,
        }
    }

    /// Name the file had before upload, or its own name
    pub fn original_filename(&self) -> &str {
        match self {
            Self::Simple { filename } => filename,
            Self::Uploaded { filename, meta } => meta.original_filename().unwrap_or(filename),
        }
    }

    pub fn file_type(&self) -> Option<ValidFileType> {
        match self {
            Self::Simple { filename } => extract_file_type_from_filename(filename),
            Self::Uploaded { meta, .. } => extract_file_type_from_metadata(meta),
        }
    }

    /// Size of the file in its gzipped form, `None` if it is not gzipped.
    ///
    /// Uploads report the size recorded in their sidecar when there is one.
    pub fn gzipped_size<I: BatchInspector + ?Sized>(&self, inspector: &I) -> Result<Option<u64>> {
        if !self.original_filename().ends_with(".gz") {
            return Ok(None);
        }
        match self {
            Self::Uploaded {
                meta: UploadedFileMeta { size: Some(size), .. },
                ..
            } => Ok(Some(*size)),
            _ => inspector.file_size(self.filename()).map(Some),
        }
    }
}
