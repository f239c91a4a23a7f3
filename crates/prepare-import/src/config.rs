use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// prepare-import: build the Admin manifest of a batch of raw input files
#[derive(Parser, Debug)]
#[command(name = "prepare-import")]
pub struct Config {
    /// Parent directory of the batch directories
    #[arg(long, env = "SF_PATH", default_value = ".")]
    pub path: PathBuf,

    /// Batch key (AAMM, or AAMM_NN for a sub-batch)
    #[arg(long, env = "SF_BATCH")]
    pub batch: String,

    /// Last month with headcounts (YYYY-MM-DD); detected from the effectif file when omitted
    #[arg(long = "date-fin-effectif", env = "SF_DATE_FIN_EFFECTIF")]
    pub date_fin_effectif: Option<NaiveDate>,

    /// Output file for the manifest, relative to --path
    #[arg(long = "configFile", env = "SF_CONFIG_FILE", default_value = "./config.toml")]
    pub config_file: PathBuf,
}

impl Config {
    pub fn output_path(&self) -> PathBuf {
        self.path.join(&self.config_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["prepare-import", "--batch", "1802"]).unwrap();
        assert_eq!(config.path, PathBuf::from("."));
        assert_eq!(config.batch, "1802");
        assert!(config.date_fin_effectif.is_none());
        assert_eq!(config.output_path(), PathBuf::from("./config.toml"));
    }

    #[test]
    fn test_all_flags() {
        let config = Config::try_parse_from([
            "prepare-import",
            "--path",
            "/data/batches",
            "--batch",
            "1802_01",
            "--date-fin-effectif",
            "2018-01-01",
            "--configFile",
            "admin.json",
        ])
        .unwrap();
        assert_eq!(
            config.date_fin_effectif,
            NaiveDate::from_ymd_opt(2018, 1, 1)
        );
        assert_eq!(config.output_path(), PathBuf::from("/data/batches/admin.json"));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(Config::try_parse_from([
            "prepare-import",
            "--batch",
            "1802",
            "--date-fin-effectif",
            "01/01/2018",
        ])
        .is_err());
    }
}
