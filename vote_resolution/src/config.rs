// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// One vote, as extracted from the record stream.
///
/// The name is the free-text spelling typed by the voter. The timestamp
/// (Unix seconds) and the submitter IP are absent when the reader could not
/// make sense of them.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRecord {
    pub raw_name: String,
    pub timestamp: Option<i64>,
    pub ip: Option<String>,
}

impl VoteRecord {
    pub fn new(raw_name: &str, timestamp: Option<i64>, ip: Option<&str>) -> VoteRecord {
        VoteRecord {
            raw_name: raw_name.to_string(),
            timestamp,
            ip: ip.map(|s| s.to_string()),
        }
    }
}

// ******** Output data structures *********

/// A distinct raw spelling and how many records used it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawNameStats {
    pub name: String,
    pub frequency: u64,
}

/// All the votes attributed to a single candidate identity, once the
/// near-duplicate spellings have been merged.
///
/// Invariants:
/// - `total_votes` is the sum of the counts in `votes_by_ip`
/// - `total_votes >= variant_names.len()`
/// - `timeline` is sorted by timestamp and contains every timestamped vote
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CanonicalGroup {
    pub canonical_name: String,
    /// All the raw spellings mapped to this group (including the canonical one),
    /// in order of first appearance in the record stream.
    pub variant_names: Vec<String>,
    pub total_votes: u64,
    /// Votes per submitter IP, in order of first appearance. The `None` key
    /// collects the votes without a known IP.
    pub votes_by_ip: Vec<(Option<String>, u64)>,
    /// The timestamped votes, in ascending time order.
    pub timeline: Vec<(i64, Option<String>)>,
}

impl CanonicalGroup {
    pub fn timestamps(&self) -> Vec<i64> {
        self.timeline.iter().map(|(t, _)| *t).collect()
    }
}

/// The outcome of the name resolution.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Resolution {
    /// Every raw spelling, mapped to the name of its group.
    pub canonical_for: HashMap<String, String>,
    /// The groups, in the order in which they first appear in the record stream.
    pub groups: Vec<CanonicalGroup>,
}

/// The fraud indicators computed for one group.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FraudSignals {
    /// The IP with the largest number of votes, if any vote had a known IP.
    pub max_single_ip: Option<String>,
    pub max_single_ip_count: u64,
    /// The start of the densest window, if any vote had a timestamp.
    pub best_window_start: Option<i64>,
    pub best_window_count: u64,
    pub best_window_unique_ips: u64,
}

/// A group flagged by one of the fraud scans.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Suspect {
    pub name: String,
    pub total_votes: u64,
    pub signals: FraudSignals,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AuditOutcome {
    /// (canonical name, total votes), by decreasing number of votes.
    pub ranking: Vec<(String, u64)>,
    pub resolution: Resolution,
    /// The signals of each group, in the same order as `resolution.groups`.
    pub signals: Vec<FraudSignals>,
    /// The group with the most votes coming from a single IP.
    pub ip_suspect: Option<Suspect>,
    /// The group with the most votes inside a single time window.
    pub burst_suspect: Option<Suspect>,
}

/// Errors that prevent the audit from running.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AuditErrors {
    /// A record was submitted without any name.
    EmptyName,
    InvalidRules(String),
}

impl Error for AuditErrors {}

impl Display for AuditErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditErrors::EmptyName => write!(f, "AuditError: empty candidate name"),
            AuditErrors::InvalidRules(msg) => write!(f, "AuditError: invalid rules: {}", msg),
        }
    }
}

// ********* Configuration **********

/// How the raw spellings are grouped together.
///
/// - GreedyAnchor processes the spellings by decreasing frequency. A spelling
/// joins the closest existing group, or starts its own group. Only the first
/// spelling of each group is used for matching, so merges do not chain.
///
/// - Transitive merges every pair of spellings within the edit distance, and
/// keeps merging until no pair is left. `A ~ B ~ C` ends up in a single group
/// even if `A` and `C` are far apart. This is more aggressive.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ClusteringMode {
    GreedyAnchor,
    Transitive,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AuditRules {
    /// The largest edit distance for two spellings to be considered the same name.
    pub max_edit_distance: usize,
    /// The length of the burst window, in seconds. Both ends are inclusive.
    pub window_seconds: i64,
    pub clustering: ClusteringMode,
}

impl AuditRules {
    pub const DEFAULT_RULES: AuditRules = AuditRules {
        max_edit_distance: 2,
        window_seconds: 3600,
        clustering: ClusteringMode::GreedyAnchor,
    };

    pub(crate) fn validate(&self) -> Result<(), AuditErrors> {
        if self.window_seconds < 0 {
            return Err(AuditErrors::InvalidRules(format!(
                "window_seconds must not be negative, got {}",
                self.window_seconds
            )));
        }
        Ok(())
    }
}
