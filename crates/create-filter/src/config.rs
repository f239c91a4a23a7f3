use std::path::PathBuf;

use clap::Parser;
use sf_create_filter::perimeter::{
    DEFAULT_MIN_EFFECTIF, DEFAULT_NB_MOIS, DEFAULT_N_IGNORED_RECORDS, DEFAULT_N_LEADING_COLS,
};
use sf_create_filter::PerimeterParams;

/// create_filter: list the SIRENs of companies whose headcount reached a
/// threshold in recent months
#[derive(Parser, Debug)]
#[command(name = "create_filter")]
pub struct Config {
    /// Headcount file, optionally prefixed with "gzip:" or ending in ".gz"
    #[arg(long, env = "SF_EFFECTIF_PATH")]
    pub path: String,

    /// Number of most recent months to consider
    #[arg(long = "nbMois", default_value_t = DEFAULT_NB_MOIS)]
    pub nb_mois: usize,

    /// Minimum headcount to reach in one of those months
    #[arg(long = "minEffectif", default_value_t = DEFAULT_MIN_EFFECTIF)]
    pub min_effectif: i64,

    /// Number of rightmost columns that never hold headcounts
    #[arg(long = "nIgnoredRecords", default_value_t = DEFAULT_N_IGNORED_RECORDS)]
    pub n_ignored_records: usize,

    /// Number of leftmost identifier columns (compte, siret, rais_soc, ape_ins, dep)
    #[arg(long = "nLeadingCols", default_value_t = DEFAULT_N_LEADING_COLS)]
    pub n_leading_cols: usize,

    /// SIRENE unité légale file used to exclude public bodies
    #[arg(long = "sireneUL")]
    pub sirene_ul: Option<PathBuf>,
}

impl Config {
    pub fn perimeter_params(&self) -> PerimeterParams {
        PerimeterParams {
            nb_mois: self.nb_mois,
            min_effectif: self.min_effectif,
            n_ignored_records: self.n_ignored_records,
            n_leading_cols: self.n_leading_cols,
        }
    }
}
