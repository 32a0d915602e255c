use std::collections::BTreeMap;

use log::debug;

use crate::distance::{bounded_distance_chars, normalize, UNBOUNDED};

type NodeId = usize;

#[derive(Eq, PartialEq, Debug, Clone)]
struct Node {
    word: String,
    // The normalized form of the word, computed once at insertion.
    key: Vec<char>,
    // Edge value (distance between the child and this node) -> child.
    children: BTreeMap<usize, NodeId>,
}

/// A word found by a query, with its distance to the query.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Match {
    pub word: String,
    pub distance: usize,
}

/// A BK-tree over the case-insensitive Levenshtein distance.
///
/// The nodes are stored in an arena and refer to each other by index.
/// The root is the first word inserted. The tree is never rebalanced.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct BkTree {
    nodes: Vec<Node>,
}

impl BkTree {
    pub fn new() -> BkTree {
        BkTree { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a word.
    ///
    /// Returns false if the word (or another spelling of it that only differs by
    /// case) was already in the tree, in which case nothing changes.
    pub fn insert(&mut self, word: &str) -> bool {
        let key = normalize(word);
        if self.nodes.is_empty() {
            self.push_node(word, key);
            return true;
        }
        let mut current: NodeId = 0;
        loop {
            let d = bounded_distance_chars(&key, &self.nodes[current].key, UNBOUNDED);
            if d == 0 {
                debug!("insert: {:?} already present as {:?}", word, self.nodes[current].word);
                return false;
            }
            match self.nodes[current].children.get(&d) {
                Some(child) => {
                    current = *child;
                }
                None => {
                    let new_id = self.push_node(word, key);
                    self.nodes[current].children.insert(d, new_id);
                    return true;
                }
            }
        }
    }

    fn push_node(&mut self, word: &str, key: Vec<char>) -> NodeId {
        self.nodes.push(Node {
            word: word.to_string(),
            key,
            children: BTreeMap::new(),
        });
        self.nodes.len() - 1
    }

    /// All the words within `radius` of `word`.
    ///
    /// The result is the same as checking every word of the tree, but only the
    /// branches that may contain a match are visited.
    pub fn query(&self, word: &str, radius: usize) -> Vec<Match> {
        let mut res: Vec<Match> = Vec::new();
        if self.nodes.is_empty() {
            return res;
        }
        let key = normalize(word);
        let mut stack: Vec<NodeId> = vec![0];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            // The distance only needs to be exact up to the point where a child
            // could still fall in the band [d - radius, d + radius].
            let max_edge = node.children.keys().next_back().copied().unwrap_or(0);
            let cutoff = radius.max(max_edge.saturating_add(radius));
            let d = bounded_distance_chars(&key, &node.key, cutoff);
            if d <= radius {
                res.push(Match {
                    word: node.word.clone(),
                    distance: d,
                });
            }
            let low = d.saturating_sub(radius);
            let high = d.saturating_add(radius);
            for (_, child) in node.children.range(low..=high) {
                stack.push(*child);
            }
        }
        res
    }
}
