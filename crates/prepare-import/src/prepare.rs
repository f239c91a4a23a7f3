//! Manifest builder.
//!
//! On disk, a batch also needs a filter and a `date_fin_effectif`. Both can
//! be derived from the batch's single effectif file, or from the parent
//! batch's for a sub-batch.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sf_create_filter::perimeter::{DEFAULT_N_IGNORED_RECORDS, DEFAULT_N_LEADING_COLS};
use sf_create_filter::{create_filter, detect_date_fin_effectif, HeadcountSource, PerimeterParams};
use tracing::{info, warn};

use crate::admin_object::{AdminObject, UnsupportedFilesError};
use crate::batch_key::BatchKey;
use crate::data_file::{BatchDirectory, BatchInspector};
use crate::file_type::ValidFileType;
use crate::files_property::{populate_files_property, BatchFile, FilesProperty};
use crate::{PrepareImportError, Result};

/// Manifest of a batch, with the files that could not be recognized.
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub admin_object: AdminObject,
    pub unsupported: Option<UnsupportedFilesError>,
}

/// Directory holding the files of `batch_key` under `parent_dir`.
pub fn batch_dir(parent_dir: &Path, batch_key: &BatchKey) -> PathBuf {
    parent_dir.join(batch_key.as_str())
}

/// Build the manifest of the batch stored in `<parent_dir>/<batch_key>`.
///
/// Without a filter file, one is generated from the effectif file as
/// `filter_siren_<batch>.csv` next to it. A sub-batch missing either file
/// takes it from its parent batch, and gets a copy of the filter in its own
/// directory. When `date_fin_effectif` is `None` it is detected from the
/// effectif file.
pub fn prepare_import(
    parent_dir: &Path,
    batch_key: &BatchKey,
    date_fin_effectif: Option<NaiveDate>,
) -> Result<PreparedImport> {
    let batch = BatchDirectory::new(batch_dir(parent_dir, batch_key));
    info!(path = ?batch.path(), batch = %batch_key, "Preparing import");
    let (mut files, unsupported) = populate_files_property(&batch, batch_key)?;

    let parent_files = parent_files_property(parent_dir, batch_key)?;
    let effectif = files
        .effectif_file()
        .ok()
        .or_else(|| parent_files.as_ref().and_then(|parent| parent.effectif_file().ok()))
        .cloned();

    let date_fin_effectif = match date_fin_effectif {
        Some(date) => date,
        None => {
            let effectif = effectif.as_ref().ok_or_else(|| {
                PrepareImportError::DateFinEffectif(
                    "date_fin_effectif is missing or invalid".to_string(),
                )
            })?;
            let source = HeadcountSource::new(&effectif.absolute_path(parent_dir));
            detect_date_fin_effectif(&source, DEFAULT_N_LEADING_COLS, DEFAULT_N_IGNORED_RECORDS)?
        }
    };

    if !files.contains(ValidFileType::Filter) {
        let inherited = parent_files
            .as_ref()
            .and_then(|parent| parent.filter_file().ok())
            .cloned();
        let filter = match (inherited, &effectif) {
            (Some(filter), _) => Some(filter),
            (None, Some(effectif)) => Some(generate_filter(parent_dir, effectif)?),
            (None, None) => {
                warn!(batch = %batch_key, "No filter nor effectif file, manifest has no filter");
                None
            }
        };
        if let Some(filter) = filter {
            let filter = if filter.batch_key() == batch_key {
                filter
            } else {
                copy_into_batch(parent_dir, &filter, batch_key)?
            };
            files.push(ValidFileType::Filter, filter);
        }
    }

    Ok(assemble(batch_key, &files, unsupported, date_fin_effectif))
}

/// Build the manifest of the batch exposed by `inspector`, from its files
/// alone.
pub fn prepare_import_from<I: BatchInspector + ?Sized>(
    inspector: &I,
    batch_key: &BatchKey,
    date_fin_effectif: NaiveDate,
) -> Result<PreparedImport> {
    let (files, unsupported) = populate_files_property(inspector, batch_key)?;
    Ok(assemble(batch_key, &files, unsupported, date_fin_effectif))
}

fn assemble(
    batch_key: &BatchKey,
    files: &FilesProperty,
    unsupported: Vec<String>,
    date_fin_effectif: NaiveDate,
) -> PreparedImport {
    let admin_object = AdminObject::new(batch_key, files, date_fin_effectif);

    info!(
        batch = %batch_key,
        types = admin_object.files.len(),
        complete_types = ?admin_object.complete_types,
        unsupported = unsupported.len(),
        "Manifest built"
    );

    let unsupported = if unsupported.is_empty() {
        None
    } else {
        Some(UnsupportedFilesError { files: unsupported })
    };
    PreparedImport {
        admin_object,
        unsupported,
    }
}

/// Files of the parent batch of a sub-batch, if its directory exists.
fn parent_files_property(parent_dir: &Path, batch_key: &BatchKey) -> Result<Option<FilesProperty>> {
    let Some(parent) = batch_key.parent_batch() else {
        return Ok(None);
    };
    let parent_key = BatchKey::new(parent)?;
    let dir = batch_dir(parent_dir, &parent_key);
    if !dir.is_dir() {
        return Ok(None);
    }
    let (files, _) = populate_files_property(&BatchDirectory::new(dir), &parent_key)?;
    Ok(Some(files))
}

/// Write the perimeter of `effectif` to `filter_siren_<batch>.csv` in the
/// effectif's batch directory. An existing file is never replaced.
fn generate_filter(parent_dir: &Path, effectif: &BatchFile) -> Result<BatchFile> {
    let effectif_batch = effectif.batch_key();
    let filter = BatchFile::new(
        effectif_batch.clone(),
        &format!("filter_siren_{}.csv", effectif_batch),
    );
    let filter_path = filter.local_path(parent_dir);

    let output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&filter_path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => PrepareImportError::FilterExists(filter_path.clone()),
            _ => PrepareImportError::Io {
                path: filter_path.clone(),
                source,
            },
        })?;

    let source = HeadcountSource::new(&effectif.absolute_path(parent_dir));
    let mut writer = BufWriter::new(output);
    match create_filter(&mut writer, &source, &PerimeterParams::default(), None) {
        Ok(stats) => {
            info!(
                filter = ?filter_path,
                effectif = effectif.name(),
                sirens = stats.rows_emitted,
                "Filter generated"
            );
            Ok(filter)
        }
        Err(err) => {
            drop(writer);
            if let Err(remove_err) = fs::remove_file(&filter_path) {
                warn!(filter = ?filter_path, error = %remove_err, "Cannot remove partial filter");
            }
            Err(err.into())
        }
    }
}

/// Copy `file` into the directory of `batch_key` and list it there.
fn copy_into_batch(parent_dir: &Path, file: &BatchFile, batch_key: &BatchKey) -> Result<BatchFile> {
    let copied = file.rebatch(batch_key);
    let src = file.local_path(parent_dir);
    let dest = copied.local_path(parent_dir);
    fs::copy(&src, &dest).map_err(|source| PrepareImportError::Io {
        path: dest.clone(),
        source,
    })?;
    info!(from = ?src, to = ?dest, "Filter copied into sub-batch");
    Ok(copied)
}
