//! End-to-end perimeter filtering over headcount files on disk

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use sf_create_filter::{
    create_filter, detect_date_fin_effectif, FilterError, HeadcountSource, PerimeterParams,
    SirenExclusion,
};
use tempfile::TempDir;

const EFFECTIF: &str = "\
compte;siret;rais_soc;ape_ins;dep;eff201011;eff201012;eff201013;eff201021;eff201022;base;UR_EMET
000000000000000001;11111111100001;ALPHA;1234Z;75;4;4;12;;;116;075077
000000000000000002;22222222200001;BETA;1234Z;92;4;4;5;;;116;075077
000000000000000003;33333333300001;GAMMA;1234Z;13;30;4;5;;;116;075077
000000000000000004;44444444400001;DELTA;1234Z;2A;2;10;;;;116;075077
000000000000000005;5555555550000;EPSILON;1234Z;75;50;50;50;;;116;075077
";

fn write_plain(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn write_gzipped(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
    path.to_str().unwrap().to_string()
}

fn run(path: &str, params: PerimeterParams, exclusion: Option<&SirenExclusion>) -> Vec<String> {
    let mut out = Vec::new();
    create_filter(&mut out, &HeadcountSource::new(path), &params, exclusion).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn params(nb_mois: usize) -> PerimeterParams {
    PerimeterParams {
        nb_mois,
        ..PerimeterParams::default()
    }
}

#[test]
fn test_trailing_empty_months_are_trimmed() {
    let tmp = TempDir::new().unwrap();
    let path = write_plain(tmp.path(), "effectif.csv", EFFECTIF);

    // Last two month columns are empty everywhere, so the window covers
    // eff201012 and eff201013 only.
    assert_eq!(run(&path, params(2), None), vec!["111111111", "444444444"]);
    assert_eq!(
        run(&path, params(3), None),
        vec!["111111111", "333333333", "444444444"]
    );
}

#[test]
fn test_default_params_only_read_headcount_columns() {
    let tmp = TempDir::new().unwrap();
    let path = write_plain(tmp.path(), "effectif.csv", EFFECTIF);

    // 100 months reach past the series; dep, rais_soc and siret must not count.
    assert_eq!(
        run(&path, PerimeterParams::default(), None),
        vec!["111111111", "333333333", "444444444"]
    );
}

#[test]
fn test_low_headcounts_are_not_emitted() {
    let tmp = TempDir::new().unwrap();
    let path = write_plain(
        tmp.path(),
        "effectif.csv",
        "compte;siret;eff201011;eff201012;base;UR_EMET\n\
         000000000000000001;11111111100001;1;1;116;075077\n",
    );
    let params = PerimeterParams {
        n_leading_cols: 2,
        ..PerimeterParams::default()
    };
    assert!(run(&path, params, None).is_empty());
}

#[test]
fn test_two_identifier_columns_without_ignored_columns() {
    let tmp = TempDir::new().unwrap();
    let path = write_plain(
        tmp.path(),
        "effectif.csv",
        "siren;siret;eff201011;eff201012;eff201013;eff201021;eff201022\n\
         111111111;11111111100001;10;9;12;;\n\
         222222222;22222222200001;3;9;5;;\n",
    );
    let params = PerimeterParams {
        nb_mois: 3,
        min_effectif: 10,
        n_ignored_records: 0,
        n_leading_cols: 2,
    };
    assert_eq!(run(&path, params, None), vec!["111111111"]);
}

#[test]
fn test_gzip_prefix_and_suffix() {
    let tmp = TempDir::new().unwrap();
    let path = write_gzipped(tmp.path(), "effectif.csv.gz", EFFECTIF);

    let expected = vec!["111111111", "444444444"];
    assert_eq!(run(&path, params(2), None), expected);
    assert_eq!(run(&format!("gzip:{}", path), params(2), None), expected);
}

#[test]
fn test_sirene_exclusion() {
    let tmp = TempDir::new().unwrap();
    let path = write_plain(tmp.path(), "effectif.csv", EFFECTIF);
    let ul = write_plain(
        tmp.path(),
        "ul.csv",
        "siren,categorieJuridiqueUniteLegale,activitePrincipaleUniteLegale\n\
         111111111,7210,62.01Z\n\
         444444444,5710,62.01Z\n",
    );
    let exclusion = SirenExclusion::from_path(Path::new(&ul)).unwrap();

    let mut out = Vec::new();
    let stats = create_filter(
        &mut out,
        &HeadcountSource::new(&path),
        &params(2),
        Some(&exclusion),
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "444444444\n");
    assert_eq!(stats.rows_read, 5);
    assert_eq!(stats.rows_emitted, 1);
    assert_eq!(stats.rows_excluded, 1);
    assert_eq!(stats.rows_bad_siret, 1);
    assert_eq!(stats.trailing_missing, 2);
}

#[test]
fn test_header_only_file_emits_nothing() {
    let tmp = TempDir::new().unwrap();
    let path = write_plain(
        tmp.path(),
        "effectif.csv",
        "compte;siret;rais_soc;ape_ins;dep;eff201011;base;UR_EMET\n",
    );
    assert!(run(&path, params(2), None).is_empty());
}

#[test]
fn test_empty_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = write_plain(tmp.path(), "effectif.csv", "");
    let mut out = Vec::new();
    let err = create_filter(&mut out, &HeadcountSource::new(&path), &params(2), None).unwrap_err();
    assert!(matches!(err, FilterError::EmptyFile(_)));
}

#[test]
fn test_detect_date_fin_effectif_on_gzipped_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_gzipped(tmp.path(), "effectif.csv.gz", EFFECTIF);
    let date = detect_date_fin_effectif(&HeadcountSource::new(&path), 5, 2).unwrap();
    // eff201013 is the last month with data
    assert_eq!(date, NaiveDate::from_ymd_opt(2010, 3, 1).unwrap());
}
