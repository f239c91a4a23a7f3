//! Sidecar `.info` files written next to uploaded files.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::file_type::{extract_file_type_from_filename, ValidFileType};
use crate::{PrepareImportError, Result};

/// Extension of the sidecar file describing an upload.
pub const INFO_EXTENSION: &str = ".info";

/// Contents of an `.info` sidecar. Unknown fields are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFileMeta {
    #[serde(rename = "Size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(rename = "MetaData", default)]
    pub metadata: HashMap<String, String>,
}

impl UploadedFileMeta {
    /// Name of the file as it was on the uploader's machine.
    pub fn original_filename(&self) -> Option<&str> {
        self.metadata.get("filename").map(String::as_str)
    }

    pub fn goup_path(&self) -> Option<&str> {
        self.metadata.get("goup-path").map(String::as_str)
    }
}

/// Type of an uploaded file: uploads to the `bdf` goup path are always
/// `bdf`, others are recognized from their original file name.
pub fn extract_file_type_from_metadata(meta: &UploadedFileMeta) -> Option<ValidFileType> {
    if meta.goup_path() == Some("bdf") {
        return Some(ValidFileType::Bdf);
    }
    meta.original_filename()
        .and_then(extract_file_type_from_filename)
}

/// Read and parse a sidecar. A missing sidecar is an error.
pub fn load_metadata(path: &Path) -> Result<UploadedFileMeta> {
    let data = std::fs::read(path).map_err(|source| PrepareImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| PrepareImportError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}
