//! The `files` property of a manifest: recognized batch files grouped by type.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::batch_key::BatchKey;
use crate::data_file::{BatchInspector, DataFile};
use crate::file_type::{ValidFileType, DEFAULT_COMPLETE_TYPES, GZIPPED_SIZE_THRESHOLDS};
use crate::metadata::INFO_EXTENSION;
use crate::{PrepareImportError, Result};

/// Prefix of manifest paths that point to gzipped files.
pub const GZIP_PREFIX: &str = "gzip:";

/// A file listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    batch_key: BatchKey,
    filename: String,
    gzipped_size: Option<u64>,
}

impl BatchFile {
    pub fn new(batch_key: BatchKey, filename: &str) -> Self {
        Self {
            batch_key,
            filename: filename.to_string(),
            gzipped_size: None,
        }
    }

    pub fn with_gzipped_size(mut self, size: u64) -> Self {
        self.gzipped_size = Some(size);
        self
    }

    pub fn batch_key(&self) -> &BatchKey {
        &self.batch_key
    }

    pub fn name(&self) -> &str {
        &self.filename
    }

    pub fn gzipped_size(&self) -> Option<u64> {
        self.gzipped_size
    }

    fn prefix(&self) -> &'static str {
        if self.gzipped_size.is_some() {
            GZIP_PREFIX
        } else {
            ""
        }
    }

    /// `/<batch>/<name>`, prefixed with `gzip:` for gzipped files.
    pub fn path(&self) -> String {
        format!("{}{}{}", self.prefix(), self.batch_key.path(), self.filename)
    }

    /// Location of the file on disk, under `parent_dir`.
    pub fn local_path(&self, parent_dir: &Path) -> PathBuf {
        parent_dir.join(self.batch_key.as_str()).join(&self.filename)
    }

    /// Same as [`path`](Self::path), rooted at `parent_dir`.
    pub fn absolute_path(&self, parent_dir: &Path) -> String {
        format!("{}{}", self.prefix(), self.local_path(parent_dir).display())
    }

    /// The same file, listed under another batch.
    pub fn rebatch(&self, batch_key: &BatchKey) -> Self {
        Self {
            batch_key: batch_key.clone(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilesProperty(BTreeMap<ValidFileType, Vec<BatchFile>>);

impl FilesProperty {
    pub fn push(&mut self, file_type: ValidFileType, file: BatchFile) {
        self.0.entry(file_type).or_default().push(file);
    }

    pub fn get(&self, file_type: ValidFileType) -> &[BatchFile] {
        self.0.get(&file_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, file_type: ValidFileType) -> bool {
        self.0.contains_key(&file_type)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ValidFileType, &[BatchFile])> {
        self.0.iter().map(|(file_type, files)| (*file_type, files.as_slice()))
    }

    /// The only file of `file_type`, or an error if there are zero or several.
    pub fn single_file(&self, file_type: ValidFileType) -> Result<&BatchFile> {
        match self.get(file_type) {
            [file] => Ok(file),
            files => Err(PrepareImportError::NotSingleFile {
                file_type: file_type.to_string(),
                found: files.len(),
            }),
        }
    }

    pub fn effectif_file(&self) -> Result<&BatchFile> {
        self.single_file(ValidFileType::Effectif)
    }

    pub fn filter_file(&self) -> Result<&BatchFile> {
        self.single_file(ValidFileType::Filter)
    }

    /// Manifest paths, per type.
    pub fn to_paths(&self) -> BTreeMap<ValidFileType, Vec<String>> {
        self.0
            .iter()
            .map(|(file_type, files)| (*file_type, files.iter().map(BatchFile::path).collect()))
            .collect()
    }

    /// Types that are present and complete.
    ///
    /// Default-complete types come first in their canonical order, then the
    /// types for which a gzipped file reached its size threshold.
    pub fn complete_types(&self) -> Vec<ValidFileType> {
        let mut complete: Vec<ValidFileType> = DEFAULT_COMPLETE_TYPES
            .iter()
            .copied()
            .filter(|file_type| self.contains(*file_type))
            .collect();

        for (file_type, threshold) in GZIPPED_SIZE_THRESHOLDS {
            let reached = self
                .get(*file_type)
                .iter()
                .find(|file| file.gzipped_size().is_some_and(|size| size >= *threshold));
            if let Some(file) = reached {
                info!(
                    file = file.name(),
                    file_type = %file_type,
                    threshold,
                    "Gzipped file reached the size threshold, type marked as complete"
                );
                complete.push(*file_type);
            }
        }
        complete
    }
}

/// Group `data_files` by type. Unrecognized files other than sidecars are
/// returned as `/<batch>/<name>` paths.
pub fn populate_files_property_from_data_files<I: BatchInspector + ?Sized>(
    data_files: &[DataFile],
    batch_key: &BatchKey,
    inspector: &I,
) -> Result<(FilesProperty, Vec<String>)> {
    let mut files_property = FilesProperty::default();
    let mut unsupported = Vec::new();

    for data_file in data_files {
        let Some(file_type) = data_file.file_type() else {
            if data_file.filename().ends_with(INFO_EXTENSION) {
                continue;
            }
            let path = format!("{}{}", batch_key.path(), data_file.filename());
            warn!(path = %path, "Unsupported file");
            unsupported.push(path);
            continue;
        };

        let mut batch_file = BatchFile::new(batch_key.clone(), data_file.filename());
        if let Some(size) = data_file.gzipped_size(inspector)? {
            batch_file = batch_file.with_gzipped_size(size);
        }
        debug!(
            file = data_file.filename(),
            original = data_file.original_filename(),
            file_type = %file_type,
            "Recognized file"
        );
        files_property.push(file_type, batch_file);
    }

    Ok((files_property, unsupported))
}

/// List and classify the files of a batch.
pub fn populate_files_property<I: BatchInspector + ?Sized>(
    inspector: &I,
    batch_key: &BatchKey,
) -> Result<(FilesProperty, Vec<String>)> {
    let data_files = inspector
        .list_filenames()?
        .iter()
        .map(|filename| DataFile::augment(filename, inspector))
        .collect::<Result<Vec<_>>>()?;
    populate_files_property_from_data_files(&data_files, batch_key, inspector)
}
