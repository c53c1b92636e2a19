use log::{debug, info, warn};

use camp_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::camp::config_reader::*;
use crate::camp::io_common::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_json;
pub mod io_xlsx;

/// A record as read from a source, before it is interpreted.
pub type Record = JSMap<String, JSValue>;

#[derive(Debug, Snafu)]
pub enum CampError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the report"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("File {path} does not contain a list of records"))]
    NotARecordList { path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} does not have any data"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Unknown provider {provider:?} for {path}"))]
    UnknownProvider { provider: String, path: String },
    #[snafu(display("No roster source: use --config or --roster"))]
    MissingRoster {},
    #[snafu(display("Could not find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Invalid camp topology"))]
    InvalidTopology { source: ReportErrors },
    #[snafu(display("Error writing the report to {path}"))]
    WritingReport {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CampResult<T> = Result<T, CampError>;

fn cell_to_json(cell: &CellValue) -> JSValue {
    match cell {
        CellValue::Text(s) => json!(s),
        CellValue::Int(i) => json!(i),
        CellValue::Float(f) => json!(f),
    }
}

fn report_to_json(report: &ReportModel) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for sheet in report.sheets.iter() {
        let rows: Vec<JSValue> = sheet
            .rows
            .iter()
            .map(|row| JSValue::Array(row.iter().map(cell_to_json).collect()))
            .collect();
        l.push(json!({
            "sheetName": sheet.name,
            "headerRow": sheet.header,
            "dataRows": rows
        }));
    }
    l
}

fn build_summary_js(config: &CampConfig, report: &ReportModel) -> JSValue {
    let c = OutputConfig {
        camp: config.output_settings.camp_name.clone(),
        date: config.output_settings.camp_date.clone(),
    };
    json!({
        "config": c,
        "sheets": report_to_json(report) })
}

fn read_records(root: &Path, cfs: &FileSource) -> CampResult<Vec<Record>> {
    let p: PathBuf = root.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read file {:?}", p2);
    match cfs.provider.as_str() {
        "json" => io_json::read_json_records(p2),
        "csv" => io_csv::read_csv_records(p2),
        "xlsx" => io_xlsx::read_excel_records(p2, cfs),
        x => UnknownProviderSnafu {
            provider: x,
            path: p2,
        }
        .fail(),
    }
}

/// Reads all the candidate sources of one kind and keeps the one with the
/// most records. A source that cannot be read counts as empty.
fn read_best_source(root: &Path, sources: &[FileSource], kind: &str) -> Vec<Record> {
    let mut best: Vec<Record> = Vec::new();
    let mut best_name: Option<String> = None;
    for cfs in sources.iter() {
        match read_records(root, cfs) {
            Ok(recs) => {
                info!(
                    "{} source {}: {} records",
                    kind,
                    simplify_file_name(&cfs.file_path),
                    recs.len()
                );
                if best_name.is_none() || recs.len() > best.len() {
                    best = recs;
                    best_name = Some(cfs.file_path.clone());
                }
            }
            Err(e) => {
                warn!(
                    "{} source {} could not be read, ignoring it: {}",
                    kind, cfs.file_path, e
                );
            }
        }
    }
    match best_name {
        Some(name) => info!("Using {} source {:?}", kind, name),
        None if !sources.is_empty() => warn!("No {} source could be read", kind),
        None => debug!("No {} source configured", kind),
    }
    best
}

fn validate_roster(records: &[Record]) -> Vec<RosterRecord> {
    let mut res: Vec<RosterRecord> = Vec::new();
    for (idx, rec) in records.iter().enumerate() {
        let id = match read_string(rec, &["id", "student_id", "studentId"]) {
            Some(id) => id,
            None => {
                warn!("validate_roster: record {} has no id, skipping: {:?}", idx, rec);
                continue;
            }
        };
        res.push(RosterRecord {
            id,
            name: read_string(rec, &["name"]),
            korean_name: read_string(rec, &["koreanName", "korean_name"]),
            english_name: read_string(rec, &["englishName", "english_name"]),
            church_name: read_string(rec, &["churchName", "church_name"]),
            student_group: read_string(rec, &["studentGroup", "student_group", "group"]),
            team: read_string(rec, &["team"]),
            attended: read_bool(rec, &["attended"]),
        });
    }
    res
}

fn validate_stamps(records: &[Record]) -> Vec<StampRecord> {
    let mut res: Vec<StampRecord> = Vec::new();
    for (idx, rec) in records.iter().enumerate() {
        let student_id = match read_string(rec, &["student_id", "studentId", "id"]) {
            Some(id) => id,
            None => {
                warn!("validate_stamps: record {} has no student id, skipping: {:?}", idx, rec);
                continue;
            }
        };
        res.push(StampRecord {
            student_id,
            stamp_count: read_int(rec, &["stamp_count", "stampCount"]),
            korean_pin_complete: read_bool(rec, &["korean_pin_complete", "koreanPinComplete"]),
            english_pin_complete: read_bool(rec, &["english_pin_complete", "englishPinComplete"]),
            student_group: read_string(rec, &["studentGroup", "student_group", "group"]),
            team: read_string(rec, &["team"]),
            updated_at: read_string(rec, &["updated_at", "updatedAt"]),
        });
    }
    res
}

fn validate_level_tests(records: &[Record]) -> Vec<LevelTestRecord> {
    let mut res: Vec<LevelTestRecord> = Vec::new();
    for (idx, rec) in records.iter().enumerate() {
        let student_id = match read_string(rec, &["student_id", "studentId"]) {
            Some(id) => id,
            None => {
                warn!(
                    "validate_level_tests: record {} has no student id, skipping: {:?}",
                    idx, rec
                );
                continue;
            }
        };
        res.push(LevelTestRecord {
            student_id,
            total_score: read_f64(rec, &["total_score", "totalScore"]).unwrap_or(0.0),
            max_score: read_f64(rec, &["max_score", "maxScore"]).unwrap_or(0.0),
            percentage: read_f64(rec, &["percentage"]).unwrap_or(0.0),
            test_date: read_string(rec, &["test_date", "testDate"]),
        });
    }
    res
}

/// Builds the configuration when no file is given, from the command line.
fn config_from_args(args: &Args) -> CampResult<CampConfig> {
    let roster = args.roster.clone().context(MissingRosterSnafu {})?;
    let to_sources = |paths: &[String]| -> CampResult<Vec<FileSource>> {
        paths
            .iter()
            .map(|p| FileSource::from_path(p, args.excel_worksheet_name.clone()))
            .collect()
    };
    Ok(CampConfig {
        output_settings: OutputSettings {
            camp_name: "camp".to_string(),
            camp_date: None,
            output_path: None,
        },
        roster_sources: to_sources(&[roster])?,
        stamp_sources: to_sources(&args.stamps)?,
        level_test_sources: to_sources(&args.level_tests)?,
    })
}

/// Reads the sources of the configuration and computes the report.
pub fn build_report(config: &CampConfig, root: &Path) -> CampResult<JSValue> {
    let roster = validate_roster(&read_best_source(root, &config.roster_sources, "roster"));
    let stamps = validate_stamps(&read_best_source(root, &config.stamp_sources, "stamp"));
    let level_tests = validate_level_tests(&read_best_source(
        root,
        &config.level_test_sources,
        "level test",
    ));
    info!(
        "data: {} roster entries, {} stamp sheets, {} level tests",
        roster.len(),
        stamps.len(),
        level_tests.len()
    );

    let report = run_camp_report(&roster, &stamps, &level_tests, &Topology::CAMP)
        .context(InvalidTopologySnafu {})?;
    Ok(build_summary_js(config, &report))
}

fn write_output(out: Option<String>, contents: &str) -> CampResult<()> {
    match out {
        Some(path) if path != "stdout" => {
            info!("Writing report to {:?}", path);
            fs::write(&path, contents).context(WritingReportSnafu { path })
        }
        _ => {
            println!("{}", contents);
            Ok(())
        }
    }
}

fn check_reference(pretty_js_report: &str, reference_path: &str) -> CampResult<()> {
    let reference = read_summary(reference_path)?;
    let pretty_js_reference =
        serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_js_reference != pretty_js_report {
        warn!("Found differences with the reference report");
        print_diff(pretty_js_reference.as_str(), pretty_js_report, "\n");
        whatever!("Difference detected between the computed report and the reference report")
    }
    info!("The report matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_with_config(
    config: &CampConfig,
    root: &Path,
    out: Option<String>,
    reference: Option<String>,
) -> CampResult<()> {
    let result_js = build_report(config, root)?;
    let pretty_js_report =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
    write_output(out, &pretty_js_report)?;

    // The reference report, if provided for comparison
    if let Some(reference_p) = reference {
        check_reference(&pretty_js_report, &reference_p)?;
    }
    Ok(())
}

pub fn run_report(args: &Args) -> CampResult<()> {
    let (config, root): (CampConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {
                    path: config_path.clone(),
                })?
                .to_path_buf();
            (config, root)
        }
        None => (config_from_args(args)?, PathBuf::new()),
    };

    // The command line takes precedence over the configuration file.
    let out = args.out.clone().or_else(|| {
        config
            .output_settings
            .output_path
            .as_ref()
            .map(|p| root.join(p).display().to_string())
    });
    run_with_config(&config, &root, out, args.reference.clone())
}

fn run_report_test(test_name: &str, config_lpath: &str, reference_lpath: &str) -> CampResult<()> {
    let test_dir =
        option_env!("CAMP_TEST_DIR").unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests"));
    info!("Running test {}", test_name);
    let config_path = format!("{}/{}/{}", test_dir, test_name, config_lpath);
    let config = read_config(&config_path)?;
    let root: PathBuf = [test_dir, test_name].iter().collect();
    run_with_config(
        &config,
        &root,
        None,
        Some(format!("{}/{}/{}", test_dir, test_name, reference_lpath)),
    )
}

pub fn test_wrapper(test_name: &str) {
    let res = run_report_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_report.json", test_name).as_str(),
    );
    if let Err(e) = &res {
        eprintln!("An error occurred {}", e);
    }
    assert!(res.is_ok(), "test {} failed", test_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn camp_basic() {
        init();
        test_wrapper("camp_basic");
    }

    #[test]
    fn camp_empty_sources() {
        init();
        test_wrapper("camp_empty_sources");
    }

    #[test]
    fn largest_source_is_kept() {
        init();
        let root: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "camp_basic"]
            .iter()
            .collect();
        let sources = vec![
            FileSource::from_path("does_not_exist.json", None).unwrap(),
            FileSource::from_path("stamps_backup.json", None).unwrap(),
            FileSource::from_path("stamps.csv", None).unwrap(),
        ];
        let best = read_best_source(&root, &sources, "stamp");
        assert_eq!(best.len(), 7);
        let only_missing = read_best_source(&root, &sources[..1], "stamp");
        assert!(only_missing.is_empty());
    }

    #[test]
    fn records_without_id_are_skipped() {
        let recs: Vec<Record> = vec![
            json!({"id": "s1", "studentGroup": "Red", "team": 2})
                .as_object()
                .cloned()
                .unwrap(),
            json!({"name": "no id"}).as_object().cloned().unwrap(),
        ];
        let roster = validate_roster(&recs);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].team.as_deref(), Some("2"));
        assert_eq!(roster[0].student_group.as_deref(), Some("Red"));
    }

    #[test]
    fn provider_is_guessed_from_extension() {
        assert_eq!(FileSource::from_path("a/b.CSV", None).unwrap().provider, "csv");
        assert_eq!(
            FileSource::from_path("roster.xlsx", Some("Sheet1".to_string()))
                .unwrap()
                .provider,
            "xlsx"
        );
        assert!(FileSource::from_path("roster.txt", None).is_err());
    }
}
