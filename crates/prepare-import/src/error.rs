//! Error types for sf-prepare-import

use std::path::PathBuf;

use sf_create_filter::FilterError;
use thiserror::Error;

/// Error type for manifest preparation
#[derive(Error, Debug)]
pub enum PrepareImportError {
    /// Batch key that does not start with four digits
    #[error("la clé du batch doit respecter le format requis AAMM")]
    InvalidBatchKey,

    /// Directory listing, stat or sidecar read failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sidecar `.info` file that is not valid JSON
    #[error("invalid metadata in {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zero or several files of a type that must be unique in a batch
    #[error("batch requires just 1 {file_type} file, found: {found}")]
    NotSingleFile { file_type: String, found: usize },

    /// date_fin_effectif neither provided nor detectable
    #[error("{0}")]
    DateFinEffectif(String),

    /// Generated filter would replace a file already on disk
    #[error("about to overwrite existing filter file: {}", .0.display())]
    FilterExists(PathBuf),

    /// Headcount file could not be read
    #[error("headcount error: {0}")]
    Filter(#[from] FilterError),

    /// Admin store rejected the manifest
    #[error("{0}")]
    Persistence(String),
}
