//! URSSAF period codes.
//!
//! URSSAF files encode calendar periods on 4 (`YYQM`) or 6 (`YYYYQM`)
//! characters. `QM == 62` is a whole year, `M == 0` a whole quarter, and
//! `M` in `1..=3` the M-th month of quarter `Q`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{FilterError, Result};

/// Half-open calendar period: `start` is included, `end` is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Periode {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Periode {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Convert an URSSAF period code into a [`Periode`].
///
/// Two-digit years below 50 belong to the 2000s, the others to the 1900s.
pub fn urssaf_to_period(urssaf: &str) -> Result<Periode> {
    let invalid = || FilterError::InvalidPeriod(urssaf.to_string());

    if !urssaf.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let code = match urssaf.len() {
        4 if &urssaf[0..2] < "50" => format!("20{}", urssaf),
        4 => format!("19{}", urssaf),
        6 => urssaf.to_string(),
        _ => return Err(invalid()),
    };

    let year: i32 = code[0..4].parse().map_err(|_| invalid())?;

    if &code[4..6] == "62" {
        return Ok(Periode {
            start: first_of_month(year, 1).ok_or_else(invalid)?,
            end: first_of_month(year + 1, 1).ok_or_else(invalid)?,
        });
    }

    let quarter: u32 = code[4..5].parse().map_err(|_| invalid())?;
    let month_of_quarter: u32 = code[5..6].parse().map_err(|_| invalid())?;
    if !(1..=4).contains(&quarter) || month_of_quarter > 3 {
        return Err(invalid());
    }

    let first_month = (quarter - 1) * 3 + 1;
    let (start_month, months) = if month_of_quarter == 0 {
        (first_month, 3)
    } else {
        (first_month + month_of_quarter - 1, 1)
    };

    let start = first_of_month(year, start_month).ok_or_else(invalid)?;
    let end = add_months(year, start_month, months).ok_or_else(invalid)?;
    Ok(Periode { start, end })
}

/// Period encoded by an effectif header column such as `eff202011`.
pub fn effectif_col_name_to_period(col_name: &str) -> Result<Periode> {
    let code = col_name
        .strip_prefix("eff")
        .and_then(|rest| rest.get(0..6))
        .ok_or_else(|| FilterError::InvalidColumnName(col_name.to_string()))?;
    urssaf_to_period(code)
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn add_months(year: i32, month: u32, months: u32) -> Option<NaiveDate> {
    let zero_based = month - 1 + months;
    first_of_month(year + (zero_based / 12) as i32, zero_based % 12 + 1)
}
