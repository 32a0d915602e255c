use log::debug;

use std::collections::HashSet;

use crate::config::*;

/// Computes the fraud indicators of one group.
///
/// The burst window covers `[start, start + window_seconds]`, both ends included.
pub fn compute_signals(group: &CanonicalGroup, window_seconds: i64) -> FraudSignals {
    let (max_single_ip, max_single_ip_count) = ip_concentration(group);
    let (best_window_start, best_window_count) = densest_window(&group.timestamps(), window_seconds);
    let best_window_unique_ips = match best_window_start {
        Some(start) => unique_ips_between(group, start, start.saturating_add(window_seconds)),
        None => 0,
    };
    let res = FraudSignals {
        max_single_ip,
        max_single_ip_count,
        best_window_start,
        best_window_count,
        best_window_unique_ips,
    };
    debug!("compute_signals: {:?}: {:?}", group.canonical_name, res);
    res
}

// The votes without a known IP never count as a single IP.
fn ip_concentration(group: &CanonicalGroup) -> (Option<String>, u64) {
    let mut best: Option<&String> = None;
    let mut best_count: u64 = 0;
    for (ip, count) in group.votes_by_ip.iter() {
        if let Some(ip) = ip {
            if *count > best_count {
                best = Some(ip);
                best_count = *count;
            }
        }
    }
    (best.cloned(), best_count)
}

/// The window with the largest number of timestamps, as (start, count).
///
/// The timestamps must be sorted.
fn densest_window(timestamps: &[i64], window_seconds: i64) -> (Option<i64>, u64) {
    let mut best: Option<i64> = None;
    let mut best_count: usize = 0;
    let mut right: usize = 0;
    for (left, start) in timestamps.iter().enumerate() {
        let end = start.saturating_add(window_seconds);
        right = right.max(left);
        while right < timestamps.len() && timestamps[right] <= end {
            right += 1;
        }
        if right - left > best_count {
            best_count = right - left;
            best = Some(*start);
        }
    }
    (best, best_count as u64)
}

fn unique_ips_between(group: &CanonicalGroup, start: i64, end: i64) -> u64 {
    let ips: HashSet<&String> = group
        .timeline
        .iter()
        .filter(|(t, _)| *t >= start && *t <= end)
        .filter_map(|(_, ip)| ip.as_ref())
        .collect();
    ips.len() as u64
}
