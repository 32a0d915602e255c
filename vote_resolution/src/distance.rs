/// A cutoff large enough to always get the exact distance.
pub(crate) const UNBOUNDED: usize = usize::MAX;

/// The form under which names are compared: lowercase, one element per
/// unicode scalar value.
pub(crate) fn normalize(s: &str) -> Vec<char> {
    s.chars().flat_map(|c| c.to_lowercase()).collect()
}

/// Levenshtein distance between two names, ignoring case.
///
/// Insertions, deletions and substitutions of a character all cost 1.
/// The computation stops as soon as the distance is known to be greater than
/// `cutoff`, in which case `cutoff + 1` is returned. The returned value is
/// hence always in `[0, cutoff + 1]`.
///
/// ```
/// use vote_resolution::bounded_distance;
///
/// assert_eq!(bounded_distance("Alice", "alise", 2), 1);
/// assert_eq!(bounded_distance("Alice", "Bob", 2), 3);
/// ```
pub fn bounded_distance(a: &str, b: &str, cutoff: usize) -> usize {
    bounded_distance_chars(&normalize(a), &normalize(b), cutoff)
}

pub(crate) fn bounded_distance_chars(a: &[char], b: &[char], cutoff: usize) -> usize {
    let beyond = cutoff.saturating_add(1);
    let n = a.len();
    let m = b.len();
    // The length difference is a lower bound of the distance.
    if n.abs_diff(m) > cutoff {
        return beyond;
    }
    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr: Vec<usize> = vec![0; m + 1];
    for i in 1..=n {
        curr[0] = i;
        let mut row_min = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let val = (curr[j - 1] + 1).min(prev[j] + 1).min(prev[j - 1] + cost);
            curr[j] = val;
            row_min = row_min.min(val);
        }
        // The following rows can never go below the minimum of this one.
        if row_min > cutoff {
            return beyond;
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[m].min(beyond)
}
