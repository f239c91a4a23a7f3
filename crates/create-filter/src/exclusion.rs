//! SIREN exclusion built from a SIRENE "unité légale" file.
//!
//! Public bodies and education (legal forms below, or main activity in NAF
//! divisions 84 and 85) are left out of the perimeter.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::{FilterError, Result};

const EXCLUDED_CATEGORIES_JURIDIQUES: &[&str] = &[
    "7490", "7430", "7470", "7410", "7379", "7348", "7346", "7210", "7220", "4140", "7373",
    "7366", "7389", "4110", "4120", "7383", "4160",
];

const EXCLUDED_ACTIVITY_PREFIXES: &[&str] = &["84", "85"];

#[derive(Debug, Deserialize)]
struct UniteLegale {
    siren: String,
    #[serde(rename = "categorieJuridiqueUniteLegale", default)]
    categorie_juridique: String,
    #[serde(rename = "activitePrincipaleUniteLegale", default)]
    activite_principale: String,
}

pub fn is_excluded_categorie_juridique(categorie_juridique: &str) -> bool {
    EXCLUDED_CATEGORIES_JURIDIQUES.contains(&categorie_juridique)
}

pub fn is_excluded_activity(activity: &str) -> bool {
    EXCLUDED_ACTIVITY_PREFIXES
        .iter()
        .any(|prefix| activity.starts_with(prefix))
}

/// Set of SIRENs to leave out of a perimeter
#[derive(Debug, Default, Clone)]
pub struct SirenExclusion {
    excluded: HashSet<String>,
}

impl SirenExclusion {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| FilterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let exclusion = Self::from_reader(BufReader::new(file))?;
        info!(path = ?path, excluded = exclusion.len(), "Loaded SIREN exclusion list");
        Ok(exclusion)
    }

    /// Read a comma-delimited unité légale CSV; columns are matched by name.
    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        let mut excluded = HashSet::new();
        for row in reader.deserialize() {
            let ul: UniteLegale = row?;
            if is_excluded_categorie_juridique(&ul.categorie_juridique)
                || is_excluded_activity(&ul.activite_principale)
            {
                excluded.insert(ul.siren);
            }
        }
        Ok(Self { excluded })
    }

    pub fn keep(&self, siren: &str) -> bool {
        !self.excluded.contains(siren)
    }

    pub fn len(&self) -> usize {
        self.excluded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }
}
