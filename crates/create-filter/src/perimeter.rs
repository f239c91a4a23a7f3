//! Perimeter filter: SIRENs whose headcount reached a threshold recently.
//!
//! Each data row of a headcount file is an establishment: `n_leading_cols`
//! identifier columns (`compte;siret;rais_soc;ape_ins;dep`, the SIRET being
//! column 1), then a dense monthly headcount time-series, then
//! `n_ignored_records` trailing non-headcount columns.
//! The filter reads the file twice: pass 1 measures how many trailing month
//! columns are empty in every row, pass 2 applies the threshold.

use std::io::{Read, Write};

use tracing::{debug, info, warn};

use crate::exclusion::SirenExclusion;
use crate::reader::HeadcountSource;
use crate::{FilterError, Result};

/// Number of most recent months in which the threshold must be reached.
pub const DEFAULT_NB_MOIS: usize = 100;

/// Headcount threshold, in employees.
pub const DEFAULT_MIN_EFFECTIF: i64 = 10;

/// Number of rightmost columns that never hold headcounts.
pub const DEFAULT_N_IGNORED_RECORDS: usize = 2;

/// Number of leftmost columns that never hold headcounts.
pub const DEFAULT_N_LEADING_COLS: usize = 5;

pub const SIRET_LEN: usize = 14;
pub const SIREN_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerimeterParams {
    pub nb_mois: usize,
    pub min_effectif: i64,
    pub n_ignored_records: usize,
    pub n_leading_cols: usize,
}

impl Default for PerimeterParams {
    fn default() -> Self {
        Self {
            nb_mois: DEFAULT_NB_MOIS,
            min_effectif: DEFAULT_MIN_EFFECTIF,
            n_ignored_records: DEFAULT_N_IGNORED_RECORDS,
            n_leading_cols: DEFAULT_N_LEADING_COLS,
        }
    }
}

/// Counters reported once a perimeter has been written
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerimeterStats {
    pub rows_read: u64,
    pub rows_emitted: u64,
    pub rows_bad_siret: u64,
    pub rows_excluded: u64,
    pub trailing_missing: usize,
}

/// Number of rightmost columns, on top of `n_ignored_records`, that never
/// hold a value in any row.
///
/// The first `n_leading_cols` columns are never considered, so a file whose
/// month columns are all empty reports every one of them as missing.
/// The reader must be positioned after the header row. The record length
/// used is the one of the last row read; an input without rows yields 0.
pub fn guess_last_n_missing<R: Read>(
    reader: &mut csv::Reader<R>,
    n_leading_cols: usize,
    n_ignored_records: usize,
) -> Result<usize> {
    let mut last_non_missing: isize = n_leading_cols as isize - 1;
    let mut record_len: Option<usize> = None;

    for record in reader.records() {
        let record = record?;
        record_len = Some(record.len());

        let Some(last_considered) = record.len().checked_sub(n_ignored_records + 1) else {
            continue;
        };
        let mut i = last_considered as isize;
        while i > last_non_missing {
            if !record[i as usize].is_empty() {
                last_non_missing = i;
                break;
            }
            i -= 1;
        }
    }

    let Some(record_len) = record_len else {
        return Ok(0);
    };
    let missing = record_len as isize - 1 - n_ignored_records as isize - last_non_missing;
    Ok(missing.max(0) as usize)
}

/// Whether one of the last `nb_mois` cells of `record` holds a headcount of
/// at least `min_effectif`.
///
/// Empty cells are not parsed but still use up a month of the window.
/// Non-digit characters are stripped before parsing; a cell left with no
/// parsable integer fails with [`FilterError::MalformedHeadcount`].
pub fn is_inside_perimeter<S: AsRef<str>>(
    record: &[S],
    nb_mois: usize,
    min_effectif: i64,
    line: u64,
) -> Result<bool> {
    let window_start = record.len().saturating_sub(nb_mois);
    for cell in record[window_start..].iter().rev() {
        let cell = cell.as_ref();
        if cell.is_empty() {
            continue;
        }
        if parse_headcount(cell, line)? >= min_effectif {
            return Ok(true);
        }
    }
    Ok(false)
}

fn parse_headcount(cell: &str, line: u64) -> Result<i64> {
    let digits: String = cell.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse()
        .map_err(|_| FilterError::MalformedHeadcount {
            line,
            value: cell.to_string(),
        })
}

/// Write the SIREN of every retained row of `reader` to `writer`, one per
/// line, in input order.
///
/// The headcount series of a row is `row[leading..len - trim]`: `trim` is
/// the total number of trailing columns left out (ignored columns plus
/// detected missing months). Rows whose SIRET is not 14 characters long
/// are skipped.
pub fn output_perimeter<R: Read, W: Write>(
    reader: &mut csv::Reader<R>,
    writer: &mut W,
    nb_mois: usize,
    min_effectif: i64,
    leading: usize,
    trim: usize,
    exclusion: Option<&SirenExclusion>,
) -> Result<PerimeterStats> {
    let mut stats = PerimeterStats::default();
    let mut records = reader.records();

    // header
    if records.next().transpose()?.is_none() {
        return Ok(stats);
    }

    let mut line: u64 = 1;
    for record in records {
        let record = record?;
        line += 1;
        stats.rows_read += 1;

        let siret = record.get(1).unwrap_or("");
        let siren = match siret.get(0..SIREN_LEN) {
            Some(siren) if siret.len() == SIRET_LEN => siren,
            _ => {
                debug!(line, siret_len = siret.len(), "Skipping row with invalid siret");
                stats.rows_bad_siret += 1;
                continue;
            }
        };

        let cells: Vec<&str> = record.iter().collect();
        let end = cells.len().saturating_sub(trim);
        let series = &cells[leading.min(end)..end];
        if !is_inside_perimeter(series, nb_mois, min_effectif, line)? {
            continue;
        }

        if let Some(exclusion) = exclusion {
            if !exclusion.keep(siren) {
                stats.rows_excluded += 1;
                continue;
            }
        }

        writeln!(writer, "{}", siren).map_err(FilterError::Output)?;
        stats.rows_emitted += 1;
    }

    if stats.rows_bad_siret > 0 {
        warn!(skipped = stats.rows_bad_siret, "Rows with bad siret skipped");
    }
    Ok(stats)
}

/// Run both passes over a headcount file and write the perimeter.
pub fn create_filter<W: Write>(
    writer: &mut W,
    source: &HeadcountSource,
    params: &PerimeterParams,
    exclusion: Option<&SirenExclusion>,
) -> Result<PerimeterStats> {
    let mut reader = source.open()?;
    if reader.records().next().transpose()?.is_none() {
        return Err(FilterError::EmptyFile(source.path().to_path_buf()));
    }
    let trailing_missing =
        guess_last_n_missing(&mut reader, params.n_leading_cols, params.n_ignored_records)?;
    drop(reader);

    let trim = params.n_ignored_records + trailing_missing;
    info!(
        path = ?source.path(),
        nb_mois = params.nb_mois,
        min_effectif = params.min_effectif,
        n_leading_cols = params.n_leading_cols,
        n_ignored_records = params.n_ignored_records,
        trailing_missing,
        "Filtering headcount file"
    );

    let mut reader = source.open()?;
    let mut stats = output_perimeter(
        &mut reader,
        writer,
        params.nb_mois,
        params.min_effectif,
        params.n_leading_cols,
        trim,
        exclusion,
    )?;
    writer.flush().map_err(FilterError::Output)?;
    stats.trailing_missing = trailing_missing;

    info!(
        rows = stats.rows_read,
        emitted = stats.rows_emitted,
        excluded = stats.rows_excluded,
        "Perimeter written"
    );
    Ok(stats)
}
