use clap::Parser;

/// This program merges the misspelled candidate names of a vote log and looks for suspicious votes.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the audit configuration, in JSON format.
    /// See the manual of the vote_resolution library for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the JSON summary of an audit. If provided, voteaudit will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the JSON summary of the audit will be written to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the votes. Setting this option overrides the record sources
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default text) The type of the input: text or csv.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path) If specified, the text report is also written to this file.
    #[clap(long, value_parser)]
    pub report: Option<String>,

    /// (default 50) The number of candidates shown in the ranking of the text report.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// (default 2) The largest number of edits between two spellings of the same name.
    #[clap(long, value_parser)]
    pub max_edit_distance: Option<usize>,

    /// (default 3600) The length in seconds of the window used to detect bursts of votes.
    #[clap(long, value_parser)]
    pub window_seconds: Option<i64>,

    /// (default greedyAnchor) How the names are merged: greedyAnchor or transitive.
    #[clap(long, value_parser)]
    pub clustering: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
