//! Detection of the last headcount month of an effectif file.

use chrono::NaiveDate;
use tracing::info;

use crate::perimeter::guess_last_n_missing;
use crate::period::effectif_col_name_to_period;
use crate::reader::HeadcountSource;
use crate::{FilterError, Result};

/// First day of the last period for which the file holds at least one
/// headcount.
///
/// The period is read from the header of the rightmost column that is
/// neither ignored nor empty in every row (e.g. `eff202011` gives
/// 2020-01-01).
pub fn detect_date_fin_effectif(
    source: &HeadcountSource,
    n_leading_cols: usize,
    n_ignored_records: usize,
) -> Result<NaiveDate> {
    let mut reader = source.open()?;
    let header = reader
        .records()
        .next()
        .transpose()?
        .ok_or_else(|| FilterError::EmptyFile(source.path().to_path_buf()))?;
    let trailing_missing = guess_last_n_missing(&mut reader, n_leading_cols, n_ignored_records)?;

    let last_col = header
        .len()
        .checked_sub(1 + n_ignored_records + trailing_missing)
        .ok_or_else(|| FilterError::InvalidColumnName(header.iter().collect::<Vec<_>>().join(";")))?;
    let periode = effectif_col_name_to_period(&header[last_col])?;

    info!(
        path = ?source.path(),
        column = &header[last_col],
        date_fin_effectif = %periode.start,
        "Detected date_fin_effectif"
    );
    Ok(periode.start)
}
