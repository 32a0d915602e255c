/*!
Merges the misspelled candidate names of a vote log into a single identity per
candidate, and looks for two patterns of ballot stuffing: many votes coming
from the same IP, and many votes cast within a short period of time.

```
use vote_resolution::builder::Builder;
use vote_resolution::AuditRules;
# use vote_resolution::AuditErrors;

let mut builder = Builder::new(&AuditRules::DEFAULT_RULES)?;
builder.add_vote("Alice", Some(1_600_000_000), Some("10.0.0.1"))?;
builder.add_vote("Alise", Some(1_600_000_010), Some("10.0.0.1"))?;
builder.add_vote("Bob", None, None)?;

let outcome = builder.run()?;
assert_eq!(outcome.ranking[0], ("Alice".to_string(), 2));
# Ok::<(), AuditErrors>(())
```

See the [manual](manual/index.html) for the details of the algorithms.
*/

mod bktree;
pub mod builder;
mod config;
mod distance;
pub mod manual;
mod resolver;
mod signals;

use log::{debug, info};

pub use crate::bktree::{BkTree, Match};
pub use crate::config::*;
pub use crate::distance::bounded_distance;
pub use crate::resolver::{raw_name_stats, resolve};
pub use crate::signals::compute_signals;

/// Runs the full audit over the given records.
///
/// Arguments:
/// * `records` the votes, in the order in which they were recorded. The order
/// only matters to break ties.
/// * `rules` the parameters of the name matching and of the burst detection
pub fn run_audit(records: &[VoteRecord], rules: &AuditRules) -> Result<AuditOutcome, AuditErrors> {
    info!(
        "run_audit: Processing {:?} records, rules: {:?}",
        records.len(),
        rules
    );
    rules.validate()?;
    if records.iter().any(|r| r.raw_name.trim().is_empty()) {
        return Err(AuditErrors::EmptyName);
    }

    let resolution = resolve(records, rules);

    let signals: Vec<FraudSignals> = resolution
        .groups
        .iter()
        .map(|g| compute_signals(g, rules.window_seconds))
        .collect();

    // The groups are in order of first appearance, which the stable sort keeps for ties.
    let mut ranking: Vec<(String, u64)> = resolution
        .groups
        .iter()
        .map(|g| (g.canonical_name.clone(), g.total_votes))
        .collect();
    ranking.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    for (name, count) in ranking.iter() {
        debug!("run_audit: {} {}", count, name);
    }

    let ip_suspect = find_suspect(&resolution.groups, &signals, |s| s.max_single_ip_count);
    let burst_suspect = find_suspect(&resolution.groups, &signals, |s| s.best_window_count);
    if let Some(s) = &ip_suspect {
        info!(
            "run_audit: single IP suspect: {} ({} votes from {:?})",
            s.name, s.signals.max_single_ip_count, s.signals.max_single_ip
        );
    }
    if let Some(s) = &burst_suspect {
        info!(
            "run_audit: burst suspect: {} ({} votes in {}s)",
            s.name, s.signals.best_window_count, rules.window_seconds
        );
    }

    Ok(AuditOutcome {
        ranking,
        resolution,
        signals,
        ip_suspect,
        burst_suspect,
    })
}

// The group with the largest positive score. Ties go to the first group.
fn find_suspect(
    groups: &[CanonicalGroup],
    signals: &[FraudSignals],
    score: impl Fn(&FraudSignals) -> u64,
) -> Option<Suspect> {
    let mut best: Option<usize> = None;
    let mut best_score: u64 = 0;
    for (idx, s) in signals.iter().enumerate() {
        if score(s) > best_score {
            best_score = score(s);
            best = Some(idx);
        }
    }
    best.map(|idx| Suspect {
        name: groups[idx].canonical_name.clone(),
        total_votes: groups[idx].total_votes,
        signals: signals[idx].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn records_from(counts: &[(&str, u64)]) -> Vec<VoteRecord> {
        let mut res = Vec::new();
        for (name, count) in counts {
            for _ in 0..*count {
                res.push(VoteRecord::new(name, None, None));
            }
        }
        res
    }

    #[test]
    fn empty_audit() {
        init();
        let outcome = run_audit(&[], &AuditRules::DEFAULT_RULES).unwrap();
        assert!(outcome.ranking.is_empty());
        assert!(outcome.resolution.groups.is_empty());
        assert_eq!(outcome.ip_suspect, None);
        assert_eq!(outcome.burst_suspect, None);
    }

    #[test]
    fn merged_ranking() {
        init();
        let records = records_from(&[("Bob", 3), ("Alise", 1), ("Alice", 5)]);
        let outcome = run_audit(&records, &AuditRules::DEFAULT_RULES).unwrap();
        assert_eq!(
            outcome.ranking,
            vec![("Alice".to_string(), 6), ("Bob".to_string(), 3)]
        );
        let alice = &outcome.resolution.groups[1];
        assert_eq!(alice.canonical_name, "Alice");
        assert_eq!(
            alice.variant_names,
            vec!["Alise".to_string(), "Alice".to_string()]
        );
    }

    #[test]
    fn ranking_ties_keep_order_of_appearance() {
        init();
        let records = records_from(&[("Zed", 2), ("Bob", 2), ("Anna", 3)]);
        let outcome = run_audit(&records, &AuditRules::DEFAULT_RULES).unwrap();
        assert_eq!(
            outcome.ranking,
            vec![
                ("Anna".to_string(), 3),
                ("Zed".to_string(), 2),
                ("Bob".to_string(), 2)
            ]
        );
    }

    #[test]
    fn finds_both_suspects() {
        init();
        let mut records = Vec::new();
        // Stuffed from a single IP, spread over a day.
        for i in 0..9 {
            records.push(VoteRecord::new("Mallory", Some(i * 7200), Some("1.2.3.4")));
        }
        records.push(VoteRecord::new("Malory", Some(100_000), Some("5.6.7.8")));
        // A burst from many IPs.
        for i in 0..6 {
            let ip = format!("10.0.0.{}", i);
            records.push(VoteRecord::new("Trudy", Some(50_000 + i), Some(ip.as_str())));
        }
        records.push(VoteRecord::new("Trudy", Some(90_000), Some("10.0.0.1")));
        records.push(VoteRecord::new("Walter", None, None));

        let outcome = run_audit(&records, &AuditRules::DEFAULT_RULES).unwrap();
        assert_eq!(outcome.ranking[0], ("Mallory".to_string(), 10));

        let ip_suspect = outcome.ip_suspect.unwrap();
        assert_eq!(ip_suspect.name, "Mallory");
        assert_eq!(ip_suspect.total_votes, 10);
        assert_eq!(ip_suspect.signals.max_single_ip_count, 9);
        assert_eq!(ip_suspect.signals.max_single_ip, Some("1.2.3.4".to_string()));

        let burst = outcome.burst_suspect.unwrap();
        assert_eq!(burst.name, "Trudy");
        assert_eq!(burst.total_votes, 7);
        assert_eq!(burst.signals.best_window_count, 6);
        assert_eq!(burst.signals.best_window_unique_ips, 6);
    }

    #[test]
    fn no_suspect_without_data() {
        init();
        let records = records_from(&[("Alice", 3), ("Bob", 2)]);
        let outcome = run_audit(&records, &AuditRules::DEFAULT_RULES).unwrap();
        assert_eq!(outcome.ip_suspect, None);
        assert_eq!(outcome.burst_suspect, None);
    }

    #[test]
    fn rejects_empty_names() {
        init();
        let records = vec![VoteRecord::new("  ", None, None)];
        assert_eq!(
            run_audit(&records, &AuditRules::DEFAULT_RULES),
            Err(AuditErrors::EmptyName)
        );
    }

    #[test]
    fn rejects_negative_windows() {
        init();
        let rules = AuditRules {
            window_seconds: -1,
            ..AuditRules::DEFAULT_RULES
        };
        assert!(matches!(
            run_audit(&[], &rules),
            Err(AuditErrors::InvalidRules(_))
        ));
    }
}
