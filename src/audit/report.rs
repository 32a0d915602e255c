// Rendering of the audit outcome: a text report for humans, and a JSON summary.

use std::fmt::Write;
use std::time::Duration;

use serde_json::json;
use serde_json::Value as JSValue;
use vote_resolution::{AuditOutcome, AuditRules, Suspect};

use crate::audit::config_reader::*;

pub const DEFAULT_TOP_N: usize = 50;

fn suspect_ip_js(s: &Suspect) -> JSValue {
    json!({
        "name": s.name,
        "totalVotes": s.total_votes,
        "maxSingleIp": s.signals.max_single_ip,
        "maxSingleIpCount": s.signals.max_single_ip_count,
    })
}

fn suspect_burst_js(s: &Suspect) -> JSValue {
    json!({
        "name": s.name,
        "totalVotes": s.total_votes,
        "windowStart": s.signals.best_window_start,
        "windowVotes": s.signals.best_window_count,
        "uniqueIps": s.signals.best_window_unique_ips,
    })
}

pub fn build_summary_js(config: &AuditConfig, rules: &AuditRules, outcome: &AuditOutcome) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        max_edit_distance: rules.max_edit_distance,
        window_seconds: rules.window_seconds,
        clustering_mode: clustering_mode_name(rules.clustering).to_string(),
    };
    let ranking: Vec<JSValue> = outcome
        .ranking
        .iter()
        .map(|(name, count)| json!({"name": name, "votes": count}))
        .collect();
    let variants: Vec<JSValue> = outcome
        .resolution
        .groups
        .iter()
        .filter(|g| g.variant_names.len() > 1)
        .map(|g| json!({"name": g.canonical_name, "variants": g.variant_names}))
        .collect();
    json!({
        "config": c,
        "ranking": ranking,
        "variants": variants,
        "ipSuspect": outcome.ip_suspect.as_ref().map(suspect_ip_js),
        "burstSuspect": outcome.burst_suspect.as_ref().map(suspect_burst_js),
    })
}

/// The human-readable report. Names are shown in lowercase.
pub fn text_report(
    outcome: &AuditOutcome,
    rules: &AuditRules,
    top_n: usize,
    elapsed: Duration,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, outcome, rules, top_n, elapsed);
    out
}

fn write_report(
    out: &mut String,
    outcome: &AuditOutcome,
    rules: &AuditRules,
    top_n: usize,
    elapsed: Duration,
) -> std::fmt::Result {
    writeln!(out, "final ranking (top {}):", top_n)?;
    for (idx, (name, count)) in outcome.ranking.iter().take(top_n).enumerate() {
        writeln!(out, "{}. {} - {} votes", idx + 1, name.to_lowercase(), count)?;
    }

    writeln!(out)?;
    writeln!(out, "merged name variants:")?;
    for g in outcome.resolution.groups.iter() {
        if g.variant_names.len() > 1 {
            let variants: Vec<String> = g.variant_names.iter().map(|v| v.to_lowercase()).collect();
            writeln!(
                out,
                "{} => {}",
                g.canonical_name.to_lowercase(),
                variants.join(", ")
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "suspect #1 - votes from a single ip:")?;
    match &outcome.ip_suspect {
        Some(s) => {
            writeln!(out, "name: {}", s.name.to_lowercase())?;
            writeln!(out, "total votes: {}", s.total_votes)?;
            writeln!(
                out,
                "max votes from one ip: {} (ip: {})",
                s.signals.max_single_ip_count,
                s.signals.max_single_ip.as_deref().unwrap_or("unknown")
            )?;
        }
        None => writeln!(out, "none found")?,
    }

    writeln!(out)?;
    writeln!(
        out,
        "suspect #2 - bursts of votes (window {} seconds):",
        rules.window_seconds
    )?;
    match &outcome.burst_suspect {
        Some(s) => {
            writeln!(out, "name: {}", s.name.to_lowercase())?;
            writeln!(out, "total votes: {}", s.total_votes)?;
            writeln!(
                out,
                "max votes in a {}s window: {}",
                rules.window_seconds, s.signals.best_window_count
            )?;
            writeln!(out, "unique ips in that window: {}", s.signals.best_window_unique_ips)?;
        }
        None => writeln!(out, "none found")?,
    }

    writeln!(out)?;
    write!(out, "elapsed time: {:.3} seconds", elapsed.as_secs_f64())
}
