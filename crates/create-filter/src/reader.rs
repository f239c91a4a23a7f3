//! Opening headcount (effectif) files.
//!
//! Headcount files are semicolon-delimited with lenient quoting. A path
//! carrying the manifest's `gzip:` prefix, or ending in `.gz`, is
//! decompressed on the fly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::{FilterError, Result};

/// Prefix marking compressed files in manifest paths.
pub const GZIP_PREFIX: &str = "gzip:";

/// Headcount file location, with its compression flag resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadcountSource {
    path: PathBuf,
    compressed: bool,
}

impl HeadcountSource {
    pub fn new(path: &str) -> Self {
        match path.strip_prefix(GZIP_PREFIX) {
            Some(stripped) => Self {
                path: PathBuf::from(stripped),
                compressed: true,
            },
            None => Self {
                path: PathBuf::from(path),
                compressed: path.ends_with(".gz"),
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Open a fresh reader positioned on the header row.
    ///
    /// Each call re-opens the file, so passes never share a cursor.
    pub fn open(&self) -> Result<csv::Reader<Box<dyn Read>>> {
        let file = File::open(&self.path).map_err(|source| FilterError::Io {
            path: self.path.clone(),
            source,
        })?;
        let inner: Box<dyn Read> = if self.compressed {
            Box::new(MultiGzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(headcount_reader(inner))
    }
}

/// Build the CSV reader used for headcount files.
///
/// The header row is returned as an ordinary record so callers decide
/// whether to skip or inspect it.
pub fn headcount_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .double_quote(true)
        .from_reader(input)
}
