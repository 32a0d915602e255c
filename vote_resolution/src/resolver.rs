use log::{debug, info};

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::bktree::BkTree;
use crate::config::*;

/// Counts the records of each distinct spelling, in order of first appearance.
pub fn raw_name_stats(records: &[VoteRecord]) -> Vec<RawNameStats> {
    let mut res: Vec<RawNameStats> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for r in records.iter() {
        match positions.get(r.raw_name.as_str()) {
            Some(idx) => {
                res[*idx].frequency += 1;
            }
            None => {
                positions.insert(r.raw_name.as_str(), res.len());
                res.push(RawNameStats {
                    name: r.raw_name.clone(),
                    frequency: 1,
                });
            }
        }
    }
    res
}

/// Merges the spellings of the records into groups, and gathers the votes of
/// each group.
pub fn resolve(records: &[VoteRecord], rules: &AuditRules) -> Resolution {
    let stats = raw_name_stats(records);
    info!(
        "resolve: {} records, {} distinct spellings, mode {:?}",
        records.len(),
        stats.len(),
        rules.clustering
    );

    // Most frequent first. The sort is stable: equal frequencies stay in order
    // of first appearance.
    let mut by_frequency: Vec<RawNameStats> = stats;
    by_frequency.sort_by_key(|s| Reverse(s.frequency));

    let canonical_for = match rules.clustering {
        ClusteringMode::GreedyAnchor => greedy_canonicals(&by_frequency, rules.max_edit_distance),
        ClusteringMode::Transitive => transitive_canonicals(&by_frequency, rules.max_edit_distance),
    };
    let groups = aggregate(records, &canonical_for);
    info!("resolve: {} groups", groups.len());
    Resolution {
        canonical_for,
        groups,
    }
}

struct Anchor {
    name: String,
    total: u64,
}

// Each spelling joins the closest anchor within the radius, or becomes a new anchor.
// Only anchors are inserted in the tree.
fn greedy_canonicals(by_frequency: &[RawNameStats], radius: usize) -> HashMap<String, String> {
    let mut tree = BkTree::new();
    let mut anchors: Vec<Anchor> = Vec::new();
    let mut anchor_ids: HashMap<String, usize> = HashMap::new();
    let mut canonical_for: HashMap<String, String> = HashMap::new();

    for s in by_frequency.iter() {
        let hits = tree.query(&s.name, radius);
        // Closest first, then the largest group, then the oldest group.
        let best: Option<(usize, usize)> = hits
            .iter()
            .filter_map(|m| anchor_ids.get(&m.word).map(|aid| (m.distance, *aid)))
            .min_by_key(|(d, aid)| (*d, Reverse(anchors[*aid].total), *aid));
        match best {
            Some((d, aid)) => {
                let anchor = &mut anchors[aid];
                debug!(
                    "greedy: {:?} ({}) -> {:?} (distance {})",
                    s.name, s.frequency, anchor.name, d
                );
                anchor.total += s.frequency;
                canonical_for.insert(s.name.clone(), anchor.name.clone());
            }
            None => {
                tree.insert(&s.name);
                anchor_ids.insert(s.name.clone(), anchors.len());
                anchors.push(Anchor {
                    name: s.name.clone(),
                    total: s.frequency,
                });
                canonical_for.insert(s.name.clone(), s.name.clone());
            }
        }
    }
    canonical_for
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    fn new(size: usize) -> UnionFind {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut x = x;
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb;
        } else if self.rank[rb] < self.rank[ra] {
            self.parent[rb] = ra;
        } else {
            self.parent[rb] = ra;
            self.rank[ra] += 1;
        }
    }
}

// All the spellings are indexed and every pair within the radius is merged.
// The most frequent spelling of each component names it.
fn transitive_canonicals(by_frequency: &[RawNameStats], radius: usize) -> HashMap<String, String> {
    let mut tree = BkTree::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (idx, s) in by_frequency.iter().enumerate() {
        positions.insert(s.name.as_str(), idx);
        tree.insert(&s.name);
    }

    let mut uf = UnionFind::new(by_frequency.len());
    for (idx, s) in by_frequency.iter().enumerate() {
        for m in tree.query(&s.name, radius) {
            if let Some(other) = positions.get(m.word.as_str()) {
                uf.union(idx, *other);
            }
        }
    }

    // The spellings are sorted, so the first member seen for each root is the
    // most frequent one.
    let mut leaders: HashMap<usize, usize> = HashMap::new();
    let mut canonical_for: HashMap<String, String> = HashMap::new();
    for (idx, s) in by_frequency.iter().enumerate() {
        let root = uf.find(idx);
        let leader = *leaders.entry(root).or_insert(idx);
        if leader != idx {
            debug!(
                "transitive: {:?} ({}) -> {:?}",
                s.name, s.frequency, by_frequency[leader].name
            );
        }
        canonical_for.insert(s.name.clone(), by_frequency[leader].name.clone());
    }
    canonical_for
}

struct GroupBuilder {
    group: CanonicalGroup,
    ip_positions: HashMap<Option<String>, usize>,
}

// Replays the records to gather the votes of each group.
fn aggregate(
    records: &[VoteRecord],
    canonical_for: &HashMap<String, String>,
) -> Vec<CanonicalGroup> {
    let mut builders: Vec<GroupBuilder> = Vec::new();
    let mut group_ids: HashMap<&str, usize> = HashMap::new();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for r in records.iter() {
        let canonical: &str = canonical_for
            .get(&r.raw_name)
            .map(|s| s.as_str())
            .unwrap_or(r.raw_name.as_str());
        let gid = *group_ids.entry(canonical).or_insert_with(|| {
            builders.push(GroupBuilder {
                group: CanonicalGroup {
                    canonical_name: canonical.to_string(),
                    variant_names: Vec::new(),
                    total_votes: 0,
                    votes_by_ip: Vec::new(),
                    timeline: Vec::new(),
                },
                ip_positions: HashMap::new(),
            });
            builders.len() - 1
        });
        let b = &mut builders[gid];
        if seen_names.insert(r.raw_name.as_str()) {
            b.group.variant_names.push(r.raw_name.clone());
        }
        b.group.total_votes += 1;
        match b.ip_positions.get(&r.ip) {
            Some(pos) => {
                b.group.votes_by_ip[*pos].1 += 1;
            }
            None => {
                b.ip_positions.insert(r.ip.clone(), b.group.votes_by_ip.len());
                b.group.votes_by_ip.push((r.ip.clone(), 1));
            }
        }
        if let Some(t) = r.timestamp {
            b.group.timeline.push((t, r.ip.clone()));
        }
    }

    builders
        .into_iter()
        .map(|b| {
            let mut g = b.group;
            g.timeline.sort_by_key(|(t, _)| *t);
            g
        })
        .collect()
}
