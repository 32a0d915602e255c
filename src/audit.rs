use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use vote_resolution::{run_audit, AuditErrors, AuditRules, ClusteringMode, VoteRecord};

use crate::args::Args;
use crate::audit::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_text;
mod report;

#[derive(Debug, Snafu)]
pub enum AuditError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Missing parent directory for {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("The audit could not be run"))]
    Audit { source: AuditErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AuditResult<T> = Result<T, AuditError>;

fn read_records(root_path: &Path, source: &RecordSource) -> AuditResult<Vec<VoteRecord>> {
    let p: PathBuf = root_path.join(&source.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read record file {:?}", p2);
    let records = match source.provider.as_str() {
        "text" | "" => io_text::read_text_records(&p2)?,
        "csv" => io_csv::read_csv_records(&p2)?,
        x => whatever!("Provider not implemented {:?}", x),
    };
    info!("Read {} records from {:?}", records.len(), p2);
    Ok(records)
}

fn validate_rules(config: &RulesConfig, args: &Args) -> AuditResult<AuditRules> {
    let defaults = AuditRules::DEFAULT_RULES;
    let clustering = match args.clustering.as_ref().or(config.clustering_mode.as_ref()) {
        Some(s) => parse_clustering_mode(s)?,
        None => defaults.clustering,
    };
    let window_seconds = args
        .window_seconds
        .or(config.window_seconds)
        .unwrap_or(defaults.window_seconds);
    if window_seconds < 0 {
        whatever!("windowSeconds may not be negative, but it was {}", window_seconds)
    }
    Ok(AuditRules {
        max_edit_distance: args
            .max_edit_distance
            .or(config.max_edit_distance)
            .unwrap_or(defaults.max_edit_distance),
        window_seconds,
        clustering,
    })
}

fn parse_clustering_mode(s: &str) -> AuditResult<ClusteringMode> {
    match s {
        "greedyAnchor" => Ok(ClusteringMode::GreedyAnchor),
        "transitive" => Ok(ClusteringMode::Transitive),
        x => whatever!("Cannot use clustering mode {:?}: currently not implemented", x),
    }
}

fn write_file(path: &str, contents: &str) -> AuditResult<()> {
    fs::write(path, contents).context(WritingFileSnafu { path })?;
    info!("Wrote {:?}", path);
    Ok(())
}

/// Runs the audit described by the command line arguments.
pub fn run(args: &Args) -> AuditResult<()> {
    let start = Instant::now();

    let (config, root_p): (AuditConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu { path: config_path })?
                .to_path_buf();
            (config, root_p)
        }
        None => (AuditConfig::default(), PathBuf::from(".")),
    };
    debug!("config: {:?}", config);

    let rules = validate_rules(&config.rules, args)?;

    // An explicit input replaces the sources of the configuration.
    let (sources, sources_root): (Vec<RecordSource>, PathBuf) = match &args.input {
        Some(input) => (
            vec![RecordSource {
                provider: args.input_type.clone().unwrap_or_else(|| "text".to_string()),
                file_path: input.clone(),
            }],
            PathBuf::from("."),
        ),
        None => (config.record_sources.clone(), root_p.clone()),
    };
    if sources.is_empty() {
        whatever!("No record sources: use --input or a configuration file with recordSources")
    }

    let mut records: Vec<VoteRecord> = Vec::new();
    for source in sources.iter() {
        let mut file_records = read_records(&sources_root, source)?;
        records.append(&mut file_records);
    }

    let outcome = run_audit(&records, &rules).context(AuditSnafu {})?;
    let elapsed = start.elapsed();

    let top_n = args
        .top
        .or(config.output_settings.top_n)
        .unwrap_or(report::DEFAULT_TOP_N);
    let text = report::text_report(&outcome, &rules, top_n, elapsed);
    println!("{}", text);

    let report_path: Option<String> = match &args.report {
        Some(p) => Some(p.clone()),
        None => config.output_settings.report_file.as_ref().map(|f| {
            let dir = config
                .output_settings
                .output_directory
                .as_ref()
                .map(|d| root_p.join(d))
                .unwrap_or_else(|| root_p.clone());
            dir.join(f).display().to_string()
        }),
    };
    if let Some(p) = report_path {
        write_file(&p, &text)?;
    }

    let summary_js = report::build_summary_js(&config, &rules, &outcome);
    let pretty_js_summary = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_summary),
        Some(p) => write_file(p, &pretty_js_summary)?,
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref: JSValue = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("The summary matches the reference {:?}", summary_p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn run_audit_test(test_name: &str) -> AuditResult<()> {
        let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/audit_data");
        info!("Running test {}", test_name);
        let args = Args {
            config: Some(format!("{}/{}/{}_config.json", test_dir, test_name, test_name)),
            reference: Some(format!(
                "{}/{}/{}_expected_summary.json",
                test_dir, test_name, test_name
            )),
            ..Args::default()
        };
        run(&args)
    }

    #[test]
    fn basic_text() {
        init();
        run_audit_test("basic_text").unwrap();
    }

    #[test]
    fn transitive_csv() {
        init();
        run_audit_test("transitive_csv").unwrap();
    }

    #[test]
    fn reference_mismatch_fails() {
        init();
        // Same records as basic_text, but names are not merged any more.
        let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/audit_data/basic_text");
        let args = Args {
            config: Some(format!("{}/basic_text_config.json", test_dir)),
            reference: Some(format!("{}/basic_text_expected_summary.json", test_dir)),
            max_edit_distance: Some(0),
            ..Args::default()
        };
        assert!(matches!(run(&args), Err(AuditError::Whatever { .. })));
    }

    #[test]
    fn missing_sources() {
        init();
        assert!(matches!(
            run(&Args::default()),
            Err(AuditError::Whatever { .. })
        ));
    }

    #[test]
    fn command_line_overrides_config() {
        let config = RulesConfig {
            max_edit_distance: Some(3),
            window_seconds: Some(60),
            clustering_mode: Some("transitive".to_string()),
        };
        let args = Args {
            window_seconds: Some(600),
            ..Args::default()
        };
        let rules = validate_rules(&config, &args).unwrap();
        assert_eq!(rules.max_edit_distance, 3);
        assert_eq!(rules.window_seconds, 600);
        assert_eq!(rules.clustering, ClusteringMode::Transitive);

        let rules = validate_rules(&RulesConfig::default(), &Args::default()).unwrap();
        assert_eq!(rules, AuditRules::DEFAULT_RULES);

        let args = Args {
            clustering: Some("unionFind".to_string()),
            ..Args::default()
        };
        assert!(validate_rules(&RulesConfig::default(), &args).is_err());
    }
}
