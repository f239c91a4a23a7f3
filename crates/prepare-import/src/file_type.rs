//! Recognition of data file types from their names.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Types supported by the data integration process.
///
/// Variant order is the order of the `files` keys in a serialized manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidFileType {
    AdminUrssaf,
    Apconso,
    Apdemande,
    Bdf,
    Ccsf,
    Cotisation,
    Debit,
    Delai,
    Diane,
    Effectif,
    EffectifEnt,
    Filter,
    Procol,
    Sirene,
    SireneUl,
    Paydex,
    Ellisphere,
}

impl ValidFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminUrssaf => "admin_urssaf",
            Self::Apconso => "apconso",
            Self::Apdemande => "apdemande",
            Self::Bdf => "bdf",
            Self::Ccsf => "ccsf",
            Self::Cotisation => "cotisation",
            Self::Debit => "debit",
            Self::Delai => "delai",
            Self::Diane => "diane",
            Self::Effectif => "effectif",
            Self::EffectifEnt => "effectif_ent",
            Self::Filter => "filter",
            Self::Procol => "procol",
            Self::Sirene => "sirene",
            Self::SireneUl => "sirene_ul",
            Self::Paydex => "paydex",
            Self::Ellisphere => "ellisphere",
        }
    }
}

impl fmt::Display for ValidFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types whose mere presence makes them complete, in `complete_types` order.
pub const DEFAULT_COMPLETE_TYPES: &[ValidFileType] = &[
    ValidFileType::Apconso,
    ValidFileType::Apdemande,
    ValidFileType::Effectif,
    ValidFileType::EffectifEnt,
    ValidFileType::Sirene,
    ValidFileType::SireneUl,
];

/// Types that are complete once a gzipped file reaches the size, in bytes.
pub const GZIPPED_SIZE_THRESHOLDS: &[(ValidFileType, u64)] =
    &[(ValidFileType::Debit, 254_781_489)];

const EXACT_NAMES: &[(&str, ValidFileType)] = &[
    ("act_partielle_conso_depuis2014_FRANCE.csv", ValidFileType::Apconso),
    ("act_partielle_ddes_depuis2015_FRANCE.csv", ValidFileType::Apdemande),
    ("Sigfaible_etablissement_utf8.csv", ValidFileType::AdminUrssaf),
    ("Sigfaible_effectif_siren.csv", ValidFileType::EffectifEnt),
    ("Sigfaible_pcoll.csv", ValidFileType::Procol),
    ("Sigfaible_cotisdues.csv", ValidFileType::Cotisation),
    ("Sigfaible_delais.csv", ValidFileType::Delai),
    ("Sigfaible_ccsf.csv", ValidFileType::Ccsf),
    ("sigfaible_etablissement_utf8.csv", ValidFileType::AdminUrssaf),
    ("sigfaible_effectif_siren.csv", ValidFileType::EffectifEnt),
    ("sigfaible_pcoll.csv", ValidFileType::Procol),
    ("sigfaible_cotisdues.csv", ValidFileType::Cotisation),
    ("sigfaible_delais.csv", ValidFileType::Delai),
    ("sigfaible_ccsf.csv", ValidFileType::Ccsf),
    ("sireneUL.csv", ValidFileType::SireneUl),
    ("StockEtablissement_utf8_geo.csv", ValidFileType::Sirene),
];

static NAME_PATTERNS: Lazy<Vec<(Regex, ValidFileType)>> = Lazy::new(|| {
    [
        (r"_debits", ValidFileType::Debit),
        (r"^[Dd]iane", ValidFileType::Diane),
        (r"effectif_", ValidFileType::Effectif),
        (r"^filter_", ValidFileType::Filter),
        (r"^E_[0-9]{12}_Retro-Paydex_[0-9]{8}\.csv$", ValidFileType::Paydex),
    ]
    .into_iter()
    .map(|(pattern, file_type)| (Regex::new(pattern).expect("valid file name pattern"), file_type))
    .collect()
});

/// Type of a file given its name, or `None` when the name is not recognized.
///
/// A `.gz` suffix is ignored, so `Sigfaible_pcoll.csv.gz` is a `procol` file.
pub fn extract_file_type_from_filename(filename: &str) -> Option<ValidFileType> {
    let name = filename.strip_suffix(".gz").unwrap_or(filename);

    if let Some((_, file_type)) = EXACT_NAMES.iter().find(|(exact, _)| *exact == name) {
        return Some(*file_type);
    }

    NAME_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(name))
        .map(|(_, file_type)| *file_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names() {
        let cases = [
            ("act_partielle_conso_depuis2014_FRANCE.csv", ValidFileType::Apconso),
            ("act_partielle_ddes_depuis2015_FRANCE.csv", ValidFileType::Apdemande),
            ("Sigfaible_etablissement_utf8.csv", ValidFileType::AdminUrssaf),
            ("Sigfaible_effectif_siren.csv", ValidFileType::EffectifEnt),
            ("Sigfaible_pcoll.csv", ValidFileType::Procol),
            ("Sigfaible_cotisdues.csv", ValidFileType::Cotisation),
            ("Sigfaible_delais.csv", ValidFileType::Delai),
            ("Sigfaible_ccsf.csv", ValidFileType::Ccsf),
            ("sireneUL.csv", ValidFileType::SireneUl),
            ("StockEtablissement_utf8_geo.csv", ValidFileType::Sirene),
        ];
        for (name, expected) in cases {
            assert_eq!(extract_file_type_from_filename(name), Some(expected), "{name}");
        }
    }

    #[test]
    fn test_patterns() {
        let cases = [
            ("Sigfaible_debits.csv", ValidFileType::Debit),
            ("sigfaibles_debits.csv", ValidFileType::Debit),
            ("Diane_Expert_2019.txt", ValidFileType::Diane),
            ("diane_req_2002.csv", ValidFileType::Diane),
            ("sigfaibles_effectif_siret.csv", ValidFileType::Effectif),
            ("Sigfaible_effectif_siret.csv", ValidFileType::Effectif),
            ("filter_siren_2002.csv", ValidFileType::Filter),
            ("E_202011095813_Retro-Paydex_20201207.csv", ValidFileType::Paydex),
        ];
        for (name, expected) in cases {
            assert_eq!(extract_file_type_from_filename(name), Some(expected), "{name}");
        }
    }

    #[test]
    fn test_gz_suffix_keeps_type() {
        for name in ["Sigfaible_pcoll.csv", "sigfaible_pcoll.csv", "Sigfaible_debits.csv"] {
            assert_eq!(
                extract_file_type_from_filename(&format!("{name}.gz")),
                extract_file_type_from_filename(name)
            );
        }
    }

    #[test]
    fn test_unrecognized() {
        for name in [
            "",
            "unsupported.csv",
            "Sigfaible_pcoll.csv.bak",
            "my_filter_siren.csv",
            "E_2020110958_Retro-Paydex_20201207.csv",
            "E_202011095813_Retro-Paydex_20201207.csv.zip",
            "72e5d6a0.info",
        ] {
            assert_eq!(extract_file_type_from_filename(name), None, "{name}");
        }
    }

    #[test]
    fn test_serialized_names() {
        for file_type in [ValidFileType::AdminUrssaf, ValidFileType::EffectifEnt, ValidFileType::SireneUl] {
            assert_eq!(
                serde_json::to_string(&file_type).unwrap(),
                format!("\"{}\"", file_type.as_str())
            );
        }
    }
}
