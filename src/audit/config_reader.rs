use crate::audit::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "reportFile")]
    pub report_file: Option<String>,
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: Option<String>,
    #[serde(rename = "maxEditDistance")]
    pub max_edit_distance: usize,
    #[serde(rename = "windowSeconds")]
    pub window_seconds: i64,
    #[serde(rename = "clusteringMode")]
    pub clustering_mode: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RecordSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    #[serde(rename = "maxEditDistance")]
    pub max_edit_distance: Option<usize>,
    #[serde(rename = "windowSeconds")]
    pub window_seconds: Option<i64>,
    #[serde(rename = "clusteringMode")]
    pub clustering_mode: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "recordSources", default)]
    pub record_sources: Vec<RecordSource>,
    #[serde(default)]
    pub rules: RulesConfig,
}

pub fn read_config(path: &str) -> AuditResult<AuditConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: AuditConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> AuditResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

pub fn clustering_mode_name(mode: ClusteringMode) -> &'static str {
    match mode {
        ClusteringMode::GreedyAnchor => "greedyAnchor",
        ClusteringMode::Transitive => "transitive",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config() {
        let js = r#"{
            "recordSources": [{ "provider": "csv", "filePath": "votes.csv" }],
            "rules": { "windowSeconds": 600 }
        }"#;
        let config: AuditConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings, OutputSettings::default());
        assert_eq!(config.record_sources[0].provider, "csv");
        assert_eq!(config.record_sources[0].file_path, "votes.csv");
        assert_eq!(config.rules.window_seconds, Some(600));
        assert_eq!(config.rules.max_edit_distance, None);
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [ClusteringMode::GreedyAnchor, ClusteringMode::Transitive] {
            assert_eq!(parse_clustering_mode(clustering_mode_name(mode)).unwrap(), mode);
        }
    }
}
